//! Prometheus metrics for the screener.
//!
//! Recording functions are no-ops until [`init_metrics`] installs an
//! exporter, so library code can call them unconditionally.
//!
//! # Example
//!
//! ```ignore
//! use crossover_screener::observability::{init_metrics, MetricsConfig};
//!
//! init_metrics(&MetricsConfig::default())?;
//! record_ticker_evaluation("ok");
//! ```

use std::net::{Ipv4Addr, SocketAddr};

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Configuration for the metrics exporter.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Address to bind the metrics HTTP listener.
    pub listen_addr: SocketAddr,
    /// Histogram buckets for latency measurements (in seconds).
    pub latency_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 9090)),
            // Fetches and batches, 10ms to 5min
            latency_buckets: vec![
                0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0,
            ],
        }
    }
}

impl MetricsConfig {
    /// Create a new metrics configuration with custom address.
    #[must_use]
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            listen_addr: addr,
            ..Default::default()
        }
    }
}

/// Initialize the Prometheus metrics exporter.
///
/// This starts an HTTP server that exposes metrics at `/metrics`.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(config.listen_addr)
        .set_buckets(&config.latency_buckets)
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!(
        addr = %config.listen_addr,
        "Prometheus metrics exporter started"
    );

    Ok(())
}

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to configure metrics exporter.
    #[error("metrics configuration error: {0}")]
    Configuration(String),
    /// Failed to install metrics exporter.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

/// Record the outcome of one ticker evaluation.
///
/// # Arguments
///
/// * `outcome` - `"ok"` or a failure label (e.g. `"no_data"`, `"retries_exhausted"`)
pub fn record_ticker_evaluation(outcome: &str) {
    counter!(
        "screener_ticker_evaluations_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Record one price fetch attempt.
///
/// # Arguments
///
/// * `status` - `"ok"` or an error kind (e.g. `"network"`, `"rate_limited"`)
/// * `latency_seconds` - Time spent in the fetch
pub fn record_fetch_attempt(status: &str, latency_seconds: f64) {
    counter!(
        "screener_fetch_attempts_total",
        "status" => status.to_string()
    )
    .increment(1);

    histogram!("screener_fetch_latency_seconds").record(latency_seconds);
}

/// Record how long a batch took to drain.
pub fn record_batch_duration(seconds: f64) {
    histogram!("screener_batch_duration_seconds").record(seconds);
}

/// Record a snapshot write attempt.
pub fn record_snapshot_write(status: &str) {
    counter!(
        "screener_snapshot_writes_total",
        "status" => status.to_string()
    )
    .increment(1);
}

/// Update the current run's progress gauges.
pub fn set_run_progress(completed: usize, failed: usize) {
    gauge!("screener_run_completed_tickers").set(completed as f64);
    gauge!("screener_run_failed_tickers").set(failed as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_listens_on_9090() {
        let config = MetricsConfig::default();
        assert_eq!(config.listen_addr.port(), 9090);
        assert!(config.latency_buckets.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn recording_without_exporter_is_noop() {
        record_ticker_evaluation("ok");
        record_fetch_attempt("network", 0.2);
        record_batch_duration(1.5);
        record_snapshot_write("ok");
        set_run_progress(3, 1);
    }
}
