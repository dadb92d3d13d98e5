//! `exlabel`: compute a build label by running an external program.
//!
//! ```text
//! exlabel --config label.json --workdir /home/ci/ws -p '$BuildDate=20240101' -p '$Project=core'
//! ```
//! The label is printed on stdout; logs go to stderr.
mod config;

use std::path::PathBuf;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use exlabel_core::{IntegrationTask, LabelTask};
use exlabel_exec::ExecLabeller;
use exlabel_model::{IntegrationContext, Parameter};
use exlabel_observe::{LoggerConfig, LoggerLevel, init_local_offset, init_logger};

use crate::config::FileConfig;

#[derive(Parser)]
#[command(name = "exlabel")]
#[command(about = "Generate a build label from an external program", version)]
struct Cli {
    /// Path to the JSON config file
    #[arg(long, short = 'c')]
    config: PathBuf,

    /// Build working directory (default: current directory)
    #[arg(long, short = 'w')]
    workdir: Option<PathBuf>,

    /// Build parameter, marker included (e.g. '$BuildDate=20240101'); repeatable, order is kept
    #[arg(long = "param", short = 'p', value_name = "NAME=VALUE")]
    params: Vec<Parameter>,

    /// Log filter overriding the config file (e.g. "exlabel_exec=debug,info")
    #[arg(long)]
    log_level: Option<LoggerLevel>,
}

impl Cli {
    /// Logger settings from the file, with `--log-level` taking precedence.
    fn logger_config(&self, file: &LoggerConfig) -> LoggerConfig {
        match &self.log_level {
            Some(level) => file.clone().with_level(level.clone()),
            None => file.clone(),
        }
    }

    /// Build context from `--workdir` (or the current directory) and the `--param` list.
    fn context(&self) -> anyhow::Result<IntegrationContext> {
        let workdir = match &self.workdir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        Ok(IntegrationContext::new(workdir).with_parameters(self.params.clone()))
    }
}

fn main() -> anyhow::Result<()> {
    // Must run before the runtime spawns threads.
    init_local_offset();

    let cli = Cli::parse();
    let file = FileConfig::load(&cli.config)?;
    init_logger(&cli.logger_config(&file.logger))?;

    let label = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(run(&cli, file))?;
    println!("{label}");
    Ok(())
}

/// Label the build once and return the label.
async fn run(cli: &Cli, file: FileConfig) -> anyhow::Result<String> {
    let mut ctx = cli.context()?;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received; cancelling labelling");
            trigger.cancel();
        }
    });

    let labeller = ExecLabeller::new(file.labeller)?.with_cancellation(cancel);
    let task = LabelTask::new(labeller);
    task.run(&mut ctx).await?;

    info!(label = %ctx.label(), "build labelled");
    Ok(ctx.label().to_string())
}
