//! Batch runner configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::retry::RetryPolicy;

/// Batch runner configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Tickers per batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Maximum concurrent evaluations within a batch.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
    /// Additional fetch attempts per ticker.
    #[serde(default = "default_retries")]
    pub retries: u32,
    /// Trailing days of price history.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
    /// Backoff unit; retry `n` waits `n` times this (milliseconds).
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
    /// Upper bound for a single backoff (milliseconds).
    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,
    /// Backoff jitter factor in `[0, 1]`.
    #[serde(default)]
    pub backoff_jitter: f64,
    /// Attempts per snapshot write before the run aborts.
    #[serde(default = "default_store_write_attempts")]
    pub store_write_attempts: u32,
    /// Seconds between scheduled runs; 0 runs once.
    #[serde(default)]
    pub run_interval_secs: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            max_workers: default_max_workers(),
            retries: default_retries(),
            lookback_days: default_lookback_days(),
            backoff_base_ms: default_backoff_base_ms(),
            backoff_max_ms: default_backoff_max_ms(),
            backoff_jitter: 0.0,
            store_write_attempts: default_store_write_attempts(),
            run_interval_secs: 0,
        }
    }
}

impl RunnerConfig {
    /// Retry policy for price fetches.
    #[must_use]
    pub const fn fetch_retry_policy(&self) -> RetryPolicy {
        self.policy(self.retries)
    }

    /// Retry policy for snapshot writes.
    #[must_use]
    pub const fn write_retry_policy(&self) -> RetryPolicy {
        self.policy(self.store_write_attempts.saturating_sub(1))
    }

    /// Interval between scheduled runs, if any.
    #[must_use]
    pub const fn run_interval(&self) -> Option<Duration> {
        if self.run_interval_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.run_interval_secs))
        }
    }

    const fn policy(&self, retries: u32) -> RetryPolicy {
        RetryPolicy {
            retries,
            base_delay: Duration::from_millis(self.backoff_base_ms),
            max_delay: Duration::from_millis(self.backoff_max_ms),
            jitter_factor: self.backoff_jitter,
        }
    }
}

const fn default_batch_size() -> usize {
    100
}

const fn default_max_workers() -> usize {
    4
}

const fn default_retries() -> u32 {
    2
}

const fn default_lookback_days() -> u32 {
    365
}

const fn default_backoff_base_ms() -> u64 {
    800
}

const fn default_backoff_max_ms() -> u64 {
    10_000
}

const fn default_store_write_attempts() -> u32 {
    3
}
