use std::{
    fmt,
    path::{Path, PathBuf},
};

use exlabel_core::LabelError;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Static configuration of an [`crate::ExecLabeller`].
///
/// Deserialized from the host's configuration file:
/// ```json
/// { "executable": "git", "buildArgs": "describe --tags", "baseDirectory": "/srv/repo" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecLabellerConfig {
    /// Program to launch (e.g. `"git"`, `"/usr/local/bin/next-version"`).
    pub executable: String,
    /// Literal argument string, split into argv at launch without shell expansion.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub build_args: String,
    /// Working directory override.
    ///
    /// If `None` or empty, the integration context's working directory is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_directory: Option<PathBuf>,
}

impl ExecLabellerConfig {
    /// Create a config that runs `executable` with no arguments.
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            build_args: String::new(),
            base_directory: None,
        }
    }

    /// Set the argument string and return updated config.
    pub fn with_build_args(mut self, args: impl Into<String>) -> Self {
        self.build_args = args.into();
        self
    }

    /// Set the working directory override and return updated config.
    pub fn with_base_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_directory = Some(dir.into());
        self
    }

    /// Validate the configuration before any process is spawned.
    ///
    /// Rules:
    /// - `executable` is not empty or whitespace-only.
    pub fn validate(&self) -> Result<(), LabelError> {
        if self.executable.trim().is_empty() {
            return Err(LabelError::Configuration("executable is empty".into()));
        }
        Ok(())
    }

    /// Pick the working directory for a run: the override when set and non-empty, else `context_dir`.
    pub fn resolve_working_directory(&self, context_dir: &Path) -> PathBuf {
        match &self.base_directory {
            Some(dir) if !dir.as_os_str().is_empty() => dir.clone(),
            _ => context_dir.to_path_buf(),
        }
    }

    /// Emit a trace-level log with the configuration fields.
    pub fn trace_state(&self) {
        trace!(
            executable = %self.executable,
            build_args = %self.build_args,
            base_directory = ?self.base_directory,
            "exec labeller config resolved"
        );
    }
}

impl fmt::Display for ExecLabellerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ExecLabellerConfig(executable='{}', build_args='{}', base_directory={:?})",
            self.executable, self.build_args, self.base_directory,
        )
    }
}
