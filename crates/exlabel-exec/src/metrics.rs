//! Metrics helpers for the exec labeller.

use exlabel_core::{LabelError, LabelOutcome};

/// Labeller name reported to logs and metrics.
pub const EXEC_LABELLER: &str = "exec";

/// Convert a labelling result to a [`LabelOutcome`] for metrics.
pub fn outcome_of<T>(result: &Result<T, LabelError>) -> LabelOutcome {
    match result {
        Ok(_) => LabelOutcome::Success,
        Err(LabelError::Cancelled) => LabelOutcome::Canceled,
        Err(_) => LabelOutcome::Failure,
    }
}
