//! Evaluate Ticker Use Case
//!
//! Fetch one ticker's daily history with bounded retries, then run the
//! crossover backtest on it. Never fails past its own boundary: every
//! problem comes back as a typed [`EvaluationFailure`].

use std::sync::Arc;
use std::time::Instant;

use crate::application::ports::{PriceSourceError, PriceSourcePort};
use crate::application::retry::{BackoffCalculator, RetryPolicy};
use crate::domain::{CrossoverParams, PriceSeries, RunWindow, TickerResult, TickerSymbol, evaluate_crossover};
use crate::observability::record_fetch_attempt;

/// Why a ticker produced no result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvaluationFailure {
    /// The fetch succeeded but returned no usable rows.
    #[error("No usable price data")]
    NoData,

    /// The backtest produced non-finite numbers.
    #[error("Crossover metrics are not finite")]
    DegenerateMetrics,

    /// Every fetch attempt failed.
    #[error("Fetch failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Attempts made, including the first.
        attempts: u32,
        /// Error from the final attempt.
        last_error: PriceSourceError,
    },

    /// The evaluation task panicked or was cancelled.
    #[error("Evaluation worker failed: {message}")]
    WorkerPanicked {
        /// Panic or cancellation details.
        message: String,
    },
}

impl EvaluationFailure {
    /// Short label for metrics and logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::NoData => "no_data",
            Self::DegenerateMetrics => "degenerate",
            Self::RetriesExhausted { .. } => "retries_exhausted",
            Self::WorkerPanicked { .. } => "worker_panicked",
        }
    }
}

/// Outcome of evaluating one ticker.
pub type TickerOutcome = Result<TickerResult, EvaluationFailure>;

/// Use case for fetching and evaluating a single ticker.
pub struct EvaluateTickerUseCase<P>
where
    P: PriceSourcePort,
{
    price_source: Arc<P>,
    retry_policy: RetryPolicy,
    params: CrossoverParams,
}

impl<P> EvaluateTickerUseCase<P>
where
    P: PriceSourcePort,
{
    /// Create a new `EvaluateTickerUseCase`.
    pub const fn new(price_source: Arc<P>, retry_policy: RetryPolicy, params: CrossoverParams) -> Self {
        Self {
            price_source,
            retry_policy,
            params,
        }
    }

    /// Retry policy applied to fetches.
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Fetch and evaluate one ticker over the window.
    pub async fn execute(&self, ticker: &TickerSymbol, window: RunWindow) -> TickerOutcome {
        let series = self.fetch_with_retry(ticker, window).await?;

        if series.is_empty() {
            tracing::debug!(ticker = %ticker, "No data returned");
            return Err(EvaluationFailure::NoData);
        }

        let metrics =
            evaluate_crossover(&series, self.params).ok_or(EvaluationFailure::DegenerateMetrics)?;

        tracing::debug!(
            ticker = %ticker,
            rows = series.len(),
            return_pct = metrics.return_pct,
            "Ticker evaluated"
        );

        Ok(TickerResult::new(ticker.clone(), metrics))
    }

    async fn fetch_with_retry(
        &self,
        ticker: &TickerSymbol,
        window: RunWindow,
    ) -> Result<PriceSeries, EvaluationFailure> {
        let mut backoff = BackoffCalculator::new(&self.retry_policy);
        let mut attempt = 0_u32;

        loop {
            attempt += 1;
            let started = Instant::now();

            tracing::debug!(ticker = %ticker, attempt, "Fetching daily history");

            match self.price_source.fetch_daily_history(ticker, window).await {
                Ok(series) => {
                    record_fetch_attempt("ok", started.elapsed().as_secs_f64());
                    return Ok(series);
                }
                Err(e) => {
                    record_fetch_attempt(e.kind(), started.elapsed().as_secs_f64());

                    let Some(delay) = backoff.next_backoff_with_hint(e.retry_after()) else {
                        return Err(EvaluationFailure::RetriesExhausted {
                            attempts: attempt,
                            last_error: e,
                        });
                    };

                    tracing::warn!(
                        ticker = %ticker,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
