use std::io;

use thiserror::Error;

/// Failures a labeller can report back to the pipeline.
///
/// None of them are retried; the pipeline is expected to fail the build with the error message.
#[derive(Debug, Error)]
pub enum LabelError {
    /// The external process could not be started.
    #[error("failed to launch '{executable}': {source}")]
    Launch {
        executable: String,
        #[source]
        source: io::Error,
    },

    /// The process started but did not exit with code 0.
    ///
    /// `code` is `None` when the process was terminated by a signal.
    #[error("process ended with error [{}], stderr [{stderr}]", display_code(.code))]
    Execution { code: Option<i32>, stderr: String },

    /// Reading an output stream or waiting for the process failed after launch.
    #[error("failed to capture {what}: {source}")]
    Capture {
        what: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("invalid labeller configuration: {0}")]
    Configuration(String),

    #[error("labelling was cancelled")]
    Cancelled,
}

impl LabelError {
    /// Short, low-cardinality error category for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            LabelError::Launch { .. } => "launch_failed",
            LabelError::Execution { .. } => "non_zero_exit",
            LabelError::Capture { .. } => "capture_failed",
            LabelError::Configuration(_) => "invalid_config",
            LabelError::Cancelled => "canceled",
        }
    }

    /// Exit code for execution failures, if the process produced one.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            LabelError::Execution { code, .. } => *code,
            _ => None,
        }
    }
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "terminated by signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execution_message_carries_code_and_stderr() {
        let err = LabelError::Execution {
            code: Some(2),
            stderr: "bad input".into(),
        };
        assert_eq!(
            err.to_string(),
            "process ended with error [2], stderr [bad input]"
        );
        assert_eq!(err.exit_code(), Some(2));
    }

    #[test]
    fn execution_by_signal_has_no_code() {
        let err = LabelError::Execution {
            code: None,
            stderr: String::new(),
        };
        assert!(err.to_string().contains("terminated by signal"));
        assert_eq!(err.exit_code(), None);
    }

    #[test]
    fn launch_keeps_io_source() {
        let err = LabelError::Launch {
            executable: "/nope".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("/nope"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn kinds_are_distinct() {
        let errs = [
            LabelError::Launch {
                executable: "x".into(),
                source: io::Error::other("x"),
            },
            LabelError::Execution {
                code: Some(1),
                stderr: String::new(),
            },
            LabelError::Capture {
                what: "stdout",
                source: io::Error::other("x"),
            },
            LabelError::Configuration("x".into()),
            LabelError::Cancelled,
        ];
        let mut kinds: Vec<_> = errs.iter().map(|e| e.kind()).collect();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), errs.len());
    }
}
