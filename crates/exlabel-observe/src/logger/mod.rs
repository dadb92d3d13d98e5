mod config;
mod error;
mod log;
mod object;

pub use config::LoggerConfig;
pub use error::{LoggerError, LoggerResult};
pub use object::LoggerFormat;
pub use object::LoggerLevel;
pub use object::LoggerRfc3339;
pub use object::{LoggerTimeZone, init_local_offset};

/// Initializes the global tracing subscriber with the given configuration.
///
/// Libraries in this workspace only emit `tracing` events; installing a
/// subscriber is left to the binary, once, at startup.
///
/// # Important: Local Timezone
/// For `LoggerTimeZone::Local`, call [`init_local_offset`] in `main()` before
/// the tokio runtime starts any threads.
///
/// # Examples
/// ```rust
/// use exlabel_observe::{LoggerConfig, init_logger};
///
/// let config = LoggerConfig::default();
/// init_logger(&config).expect("failed to initialize logger");
///
/// tracing::info!("logger initialized");
/// ```
pub fn init_logger(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    match cfg.format {
        LoggerFormat::Text => log::logger_text(cfg),
        LoggerFormat::Json => log::logger_json(cfg),
        LoggerFormat::Journald => log::logger_journald(cfg),
    }
}
