use std::{
    fmt,
    path::{Path, PathBuf},
    process::Stdio,
};

use exlabel_core::LabelError;
use exlabel_model::{Env, IntegrationContext};
use tokio::process::Command;
use tracing::trace;

use crate::labeller::{args::split_arguments, config::ExecLabellerConfig, env::materialize};

/// Everything needed to launch the labelling process once.
///
/// Built fresh for every label computation and dropped afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    executable: String,
    arguments: String,
    working_directory: PathBuf,
    env: Env,
}

impl ProcessSpec {
    /// Assemble the spec from static config and the build context.
    ///
    /// The argument string is copied verbatim; the environment comes from [`materialize`].
    pub fn build(cfg: &ExecLabellerConfig, ctx: &IntegrationContext) -> Result<Self, LabelError> {
        Ok(Self {
            executable: cfg.executable.clone(),
            arguments: cfg.build_args.clone(),
            working_directory: cfg.resolve_working_directory(ctx.working_directory()),
            env: materialize(ctx.parameters())?,
        })
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    /// Raw argument string, exactly as configured.
    pub fn arguments(&self) -> &str {
        &self.arguments
    }

    pub fn working_directory(&self) -> &Path {
        &self.working_directory
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    /// Argument string split into argv.
    pub fn argv(&self) -> Vec<String> {
        split_arguments(&self.arguments)
    }

    /// Build the command: no shell, stdin closed, both output streams piped.
    ///
    /// Parameter variables are added on top of the inherited environment.
    /// The child is killed if the handle is dropped before it exits.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.args(self.argv())
            .current_dir(&self.working_directory)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        for kv in &self.env {
            cmd.env(kv.key(), kv.value());
        }
        cmd
    }

    /// Emit a trace-level log with the essential fields; values of the environment are not logged.
    pub fn trace_state(&self) {
        trace!(
            executable = %self.executable,
            arguments = %self.arguments,
            cwd = %self.working_directory.display(),
            env_len = self.env.len(),
            env_keys = ?self.env.keys().collect::<Vec<_>>(),
            "process spec resolved"
        );
    }
}

impl fmt::Display for ProcessSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ProcessSpec(executable='{}', arguments='{}', cwd={}, env={})",
            self.executable,
            self.arguments,
            self.working_directory.display(),
            self.env.len(),
        )
    }
}
