use std::io::IsTerminal;

use serde::{Deserialize, Serialize};

use crate::logger::object::{LoggerFormat, LoggerLevel, LoggerTimeZone};

/// Logger configuration, usually read from the `logger` section of the exlabel config file.
///
/// ```json
/// { "format": "json", "level": "exlabel_exec=debug,info", "tz": "local" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoggerConfig {
    /// Output format.
    pub format: LoggerFormat,
    /// Filter expression (e.g. `"info"`, `"exlabel_exec=trace,info"`).
    pub level: LoggerLevel,
    /// Timezone for timestamps.
    pub tz: LoggerTimeZone,
    /// Include module/target names in output.
    pub with_targets: bool,
    /// Colored output; only honoured when stderr is a terminal.
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: LoggerLevel::default(),
            tz: LoggerTimeZone::default(),
            with_targets: true,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    /// Replace the level filter and return updated config.
    pub fn with_level(mut self, level: LoggerLevel) -> Self {
        self.level = level;
        self
    }

    /// Color is used only if enabled in config AND stderr (where logs go) is a terminal.
    ///
    /// Call during logger initialization, not while parsing config.
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stderr().is_terminal()
    }
}
