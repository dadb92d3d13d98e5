use std::sync::Arc;

/// Labelling outcome for metrics classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelOutcome {
    /// Label produced.
    Success,
    /// Launch, execution, capture or configuration failure.
    Failure,
    /// Cancelled before the process exited.
    Canceled,
}

impl LabelOutcome {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            LabelOutcome::Success => "success",
            LabelOutcome::Failure => "failure",
            LabelOutcome::Canceled => "canceled",
        }
    }
}

/// Backend metrics collection interface.
///
/// Implementations are injected into labellers at construction time. Every
/// event defaults to a no-op, so a backend only overrides what it records.
pub trait MetricsBackend: Send + Sync + 'static {
    /// Record that a labeller started computing a label.
    fn record_label_started(&self, _labeller: &str) {}
    /// Record completion with outcome and wall-clock duration in milliseconds.
    fn record_label_completed(&self, _labeller: &str, _outcome: LabelOutcome, _duration_ms: u64) {}
    /// Record a labeller failure by category (see `LabelError::kind`).
    fn record_labeller_error(&self, _labeller: &str, _error_kind: &str) {}
}

/// Shared handle to metrics backend.
pub type MetricsHandle = Arc<dyn MetricsBackend>;
