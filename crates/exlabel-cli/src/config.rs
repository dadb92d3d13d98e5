use std::{fs, path::Path};

use anyhow::Context;
use exlabel_exec::ExecLabellerConfig;
use exlabel_observe::LoggerConfig;
use serde::Deserialize;

/// Contents of the `--config` file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileConfig {
    pub labeller: ExecLabellerConfig,
    #[serde(default)]
    pub logger: LoggerConfig,
}

impl FileConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let cfg: FileConfig = serde_json::from_str(raw)?;
        cfg.labeller.validate()?;
        Ok(cfg)
    }
}
