use std::sync::Arc;

use prometheus::{CounterVec, HistogramOpts, HistogramVec, Opts, Registry, proto::MetricFamily};

use exlabel_core::{LabelOutcome, MetricsBackend};

/// Prometheus metrics backend.
///
/// ## Label cardinality
/// All labels are bounded:
/// - `labeller`: labeller name, e.g. "exec"
/// - `outcome`: "success", "failure", "canceled"
/// - `error_kind`: "launch_failed", "non_zero_exit", "capture_failed", "invalid_config", "canceled"
#[derive(Clone)]
pub struct PrometheusMetrics {
    labels_started: CounterVec,
    labels_completed: CounterVec,
    label_duration: HistogramVec,
    labeller_errors: CounterVec,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    /// Create a backend registering its collectors in `registry`.
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let labels_started = CounterVec::new(
            Opts::new("labels_started_total", "Total number of label computations started")
                .namespace("exlabel"),
            &["labeller"],
        )?;
        registry.register(Box::new(labels_started.clone()))?;

        let labels_completed = CounterVec::new(
            Opts::new(
                "labels_completed_total",
                "Total number of label computations completed",
            )
            .namespace("exlabel"),
            &["labeller", "outcome"],
        )?;
        registry.register(Box::new(labels_completed.clone()))?;

        // Label programs are usually quick (`git describe`), but may hit the network.
        let label_duration = HistogramVec::new(
            HistogramOpts::new("label_duration_seconds", "Label computation duration in seconds")
                .namespace("exlabel")
                .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
            &["labeller"],
        )?;
        registry.register(Box::new(label_duration.clone()))?;

        let labeller_errors = CounterVec::new(
            Opts::new("labeller_errors_total", "Total labeller failures by kind")
                .namespace("exlabel"),
            &["labeller", "error_kind"],
        )?;
        registry.register(Box::new(labeller_errors.clone()))?;

        Ok(Self {
            labels_started,
            labels_completed,
            label_duration,
            labeller_errors,
            registry,
        })
    }

    /// Create a backend with its own registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    /// Gather all metrics for exposition.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Underlying registry, for registering host metrics alongside.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_label_started(&self, labeller: &str) {
        self.labels_started.with_label_values(&[labeller]).inc();
    }

    fn record_label_completed(&self, labeller: &str, outcome: LabelOutcome, duration_ms: u64) {
        self.labels_completed
            .with_label_values(&[labeller, outcome.as_label()])
            .inc();

        let duration_seconds = duration_ms as f64 / 1000.0;
        self.label_duration
            .with_label_values(&[labeller])
            .observe(duration_seconds);
    }

    fn record_labeller_error(&self, labeller: &str, error_kind: &str) {
        self.labeller_errors
            .with_label_values(&[labeller, error_kind])
            .inc();
    }
}
