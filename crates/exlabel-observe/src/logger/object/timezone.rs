use std::{fmt, str::FromStr, sync::OnceLock};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::UtcOffset;

use crate::logger::error::LoggerError;

/// Local offset detected at startup.
static LOCAL_OFFSET: OnceLock<UtcOffset> = OnceLock::new();

/// Timezone for log timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoggerTimeZone {
    #[default]
    Utc,
    /// System timezone, as detected by [`init_local_offset`].
    Local,
}

impl LoggerTimeZone {
    /// Offset to apply to UTC timestamps.
    pub fn offset(&self) -> UtcOffset {
        match self {
            LoggerTimeZone::Utc => UtcOffset::UTC,
            LoggerTimeZone::Local => *LOCAL_OFFSET.get().unwrap_or(&UtcOffset::UTC),
        }
    }
}

impl FromStr for LoggerTimeZone {
    type Err = LoggerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utc" => Ok(Self::Utc),
            "local" => Ok(Self::Local),
            _ => Err(LoggerError::InvalidTimeZone(s.to_string())),
        }
    }
}

impl fmt::Display for LoggerTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LoggerTimeZone::Utc => "utc",
            LoggerTimeZone::Local => "local",
        })
    }
}

impl Serialize for LoggerTimeZone {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for LoggerTimeZone {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Detect the local UTC offset once.
///
/// **Must** run in `main()` before any threads are spawned (before the tokio
/// runtime): detection fails in multi-threaded processes on most Unix
/// platforms. Falls back to UTC on failure.
pub fn init_local_offset() {
    let _ = LOCAL_OFFSET.set(UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC));
}
