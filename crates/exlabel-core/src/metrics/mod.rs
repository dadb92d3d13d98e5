//! Metrics collection abstraction for labellers.
//!
//! Backends (prometheus, statsd, etc) implement [`MetricsBackend`] and are handed to labellers as a [`MetricsHandle`].
mod backend;
pub use backend::{LabelOutcome, MetricsBackend, MetricsHandle};

use std::sync::Arc;

/// Backend that records nothing; the default for every labeller.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsBackend for NoOpMetrics {}

/// Create a no-op metrics handle.
#[inline]
pub fn noop_metrics() -> MetricsHandle {
    Arc::new(NoOpMetrics)
}
