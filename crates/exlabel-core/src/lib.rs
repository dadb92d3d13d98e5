pub mod error;
pub mod labeller;
pub mod metrics;

pub use error::LabelError;
pub use labeller::{IntegrationTask, LabelTask, Labeller};
pub use metrics::{LabelOutcome, MetricsBackend, MetricsHandle, NoOpMetrics, noop_metrics};

pub mod prelude {
    pub use crate::error::LabelError;
    pub use crate::labeller::{IntegrationTask, LabelTask, Labeller};
    pub use crate::metrics::MetricsHandle;
}
