//! Retry policy with linear backoff for price fetches and snapshot writes.
//!
//! The delay before retry `n` (1-based) is `base_delay × n`, capped at
//! `max_delay`, with optional symmetric jitter. With the default 800ms base
//! and two retries a failing ticker waits 0.8s then 1.6s before giving up.
//!
//! # Example
//!
//! ```rust
//! use crossover_screener::application::retry::{BackoffCalculator, RetryPolicy};
//! use std::time::Duration;
//!
//! let policy = RetryPolicy::new(2, Duration::from_millis(800));
//! let mut backoff = BackoffCalculator::new(&policy);
//!
//! assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(800)));
//! assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(1600)));
//! assert_eq!(backoff.next_backoff(), None);
//! ```

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Retry policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Additional attempts after the first (default: 2).
    pub retries: u32,
    /// Delay unit multiplied by the retry number (default: 800ms).
    pub base_delay: Duration,
    /// Upper bound for any single delay (default: 10s).
    pub max_delay: Duration,
    /// Jitter factor for randomization (default: 0.0 = none).
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 2,
            base_delay: Duration::from_millis(800),
            max_delay: Duration::from_secs(10),
            jitter_factor: 0.0,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the given retry count and base delay.
    #[must_use]
    pub fn new(retries: u32, base_delay: Duration) -> Self {
        Self {
            retries,
            base_delay,
            ..Default::default()
        }
    }

    /// A policy that retries immediately (tests, local stores).
    #[must_use]
    pub const fn immediate(retries: u32) -> Self {
        Self {
            retries,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            jitter_factor: 0.0,
        }
    }

    /// Total attempts including the first.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}

/// Calculator for linear backoff with optional jitter.
#[derive(Debug)]
pub struct BackoffCalculator {
    retries_used: u32,
    max_retries: u32,
    base_delay_ms: u64,
    max_delay_ms: u64,
    jitter_factor: f64,
}

impl BackoffCalculator {
    /// Create a new backoff calculator from a retry policy.
    #[must_use]
    pub const fn new(policy: &RetryPolicy) -> Self {
        Self {
            retries_used: 0,
            max_retries: policy.retries,
            base_delay_ms: policy.base_delay.as_millis() as u64,
            max_delay_ms: policy.max_delay.as_millis() as u64,
            jitter_factor: policy.jitter_factor,
        }
    }

    /// Get the delay before the next retry.
    ///
    /// Returns `None` once every retry has been handed out.
    pub fn next_backoff(&mut self) -> Option<Duration> {
        if self.retries_used >= self.max_retries {
            return None;
        }
        self.retries_used += 1;

        let base_ms = self
            .base_delay_ms
            .saturating_mul(u64::from(self.retries_used))
            .min(self.max_delay_ms);
        let jittered_ms = self.apply_jitter(base_ms).min(self.max_delay_ms);

        Some(Duration::from_millis(jittered_ms))
    }

    /// Get the delay before the next retry, preferring a provider hint.
    ///
    /// The hint still consumes a retry and is capped at the policy maximum.
    pub fn next_backoff_with_hint(&mut self, hint: Option<Duration>) -> Option<Duration> {
        let computed = self.next_backoff()?;
        Some(hint.map_or(computed, |h| {
            h.min(Duration::from_millis(self.max_delay_ms))
        }))
    }

    /// Apply jitter to a delay.
    ///
    /// Uniform in `[delay × (1 - jitter), delay × (1 + jitter)]`.
    fn apply_jitter(&self, delay_ms: u64) -> u64 {
        if self.jitter_factor <= 0.0 || delay_ms == 0 {
            return delay_ms;
        }

        let mut rng = rand::rng();
        let jitter_range = delay_ms as f64 * self.jitter_factor;
        let min = (delay_ms as f64 - jitter_range).max(0.0);
        let max = delay_ms as f64 + jitter_range;

        rng.random_range(min..=max) as u64
    }

    /// Retries handed out so far.
    #[must_use]
    pub const fn retries_used(&self) -> u32 {
        self.retries_used
    }

    /// Check if more retries are available.
    #[must_use]
    pub const fn has_remaining_retries(&self) -> bool {
        self.retries_used < self.max_retries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.retries, 2);
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.base_delay, Duration::from_millis(800));
        assert_eq!(policy.max_delay, Duration::from_secs(10));
    }

    #[test]
    fn test_linear_backoff_sequence() {
        let policy = RetryPolicy::new(4, Duration::from_millis(800));
        let mut backoff = BackoffCalculator::new(&policy);

        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(800)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(1600)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(2400)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(3200)));

        // Retries exhausted
        assert!(backoff.next_backoff().is_none());
        assert!(!backoff.has_remaining_retries());
    }

    #[test]
    fn test_max_delay_cap() {
        let policy = RetryPolicy {
            retries: 5,
            base_delay: Duration::from_secs(4),
            max_delay: Duration::from_secs(10),
            jitter_factor: 0.0,
        };
        let mut backoff = BackoffCalculator::new(&policy);

        assert_eq!(backoff.next_backoff(), Some(Duration::from_secs(4)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_secs(8)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_secs(10))); // Capped
    }

    #[test]
    fn test_zero_retries() {
        let mut backoff = BackoffCalculator::new(&RetryPolicy::new(0, Duration::from_secs(1)));
        assert!(backoff.next_backoff().is_none());
    }

    #[test]
    fn test_jitter_range() {
        let policy = RetryPolicy {
            retries: 1,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(10),
            jitter_factor: 0.2,
        };

        for _ in 0..100 {
            let mut backoff = BackoffCalculator::new(&policy);
            let delay = backoff.next_backoff().unwrap();
            assert!(
                delay >= Duration::from_millis(800) && delay <= Duration::from_millis(1200),
                "Delay {delay:?} not in expected range 800-1200ms"
            );
        }
    }

    #[test]
    fn test_hint_preferred_and_capped() {
        let policy = RetryPolicy::new(2, Duration::from_millis(800));
        let mut backoff = BackoffCalculator::new(&policy);

        assert_eq!(
            backoff.next_backoff_with_hint(Some(Duration::from_secs(3))),
            Some(Duration::from_secs(3))
        );
        assert_eq!(
            backoff.next_backoff_with_hint(Some(Duration::from_secs(120))),
            Some(Duration::from_secs(10))
        );
        assert_eq!(backoff.retries_used(), 2);
        assert!(backoff.next_backoff_with_hint(Some(Duration::from_secs(1))).is_none());
    }

    #[test]
    fn test_immediate_policy() {
        let mut backoff = BackoffCalculator::new(&RetryPolicy::immediate(2));
        assert_eq!(backoff.next_backoff(), Some(Duration::ZERO));
        assert_eq!(backoff.next_backoff(), Some(Duration::ZERO));
        assert!(backoff.next_backoff().is_none());
    }
}
