//! External-process labeller.
//!
//! [`ExecLabeller`] computes a build label by running a configured executable
//! with the build parameters exposed as environment variables, and takes the
//! process's standard output as the label.
mod metrics;
pub use metrics::{EXEC_LABELLER, outcome_of};

pub mod labeller;
pub use labeller::{ExecLabeller, ExecLabellerConfig, ProcessOutcome, ProcessSpec};
