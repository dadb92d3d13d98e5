//! Prometheus metrics backend for exlabel labellers.
//!
//! [`PrometheusMetrics`] implements [`exlabel_core::MetricsBackend`]; hand it
//! to a labeller and expose [`PrometheusMetrics::gather`] from whatever HTTP
//! server or push gateway client the host already has.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use exlabel_core::MetricsBackend;
//! use exlabel_prometheus::{Encoder, PrometheusMetrics, TextEncoder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = PrometheusMetrics::new()?;
//! let handle: Arc<dyn MetricsBackend> = Arc::new(metrics.clone());
//! handle.record_label_started("exec");
//!
//! let mut buf = Vec::new();
//! TextEncoder::new().encode(&metrics.gather(), &mut buf)?;
//! assert!(String::from_utf8(buf)?.contains("exlabel_labels_started_total"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `exlabel_labels_started_total{labeller}` - Counter
//! - `exlabel_labels_completed_total{labeller, outcome}` - Counter
//! - `exlabel_label_duration_seconds{labeller}` - Histogram
//! - `exlabel_labeller_errors_total{labeller, error_kind}` - Counter

mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};
