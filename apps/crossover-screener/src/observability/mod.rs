//! Observability module for metrics and logging.
//!
//! Prometheus metrics export and tracing subscriber setup for the screener.

mod logging;
mod metrics;

pub use metrics::{
    MetricsConfig, MetricsError, init_metrics, record_batch_duration, record_fetch_attempt,
    record_snapshot_write, record_ticker_evaluation, set_run_progress,
};
pub use logging::{TracingError, init_tracing};
