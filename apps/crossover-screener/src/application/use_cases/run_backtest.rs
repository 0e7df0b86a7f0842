//! Run Backtest Use Case
//!
//! The batch scheduler. Resolves the ticker universe, partitions it into
//! contiguous batches and evaluates each batch with at most `max_workers`
//! evaluations in flight. Batches run strictly one after another, and
//! evaluations never outlive the run that started them.
//!
//! The snapshot is written before the first batch (zero results), after
//! every batch, and once more at the end with `finished_at` set. A reader
//! polling the store therefore sees a growing result set whose
//! `completed_count` always matches `results.len()`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio::task::{self, JoinSet};
use tracing::Instrument;
use uuid::Uuid;

use super::evaluate_ticker::{EvaluateTickerUseCase, EvaluationFailure, TickerOutcome};
use crate::application::dto::{RunRequest, RunSummary, TickerFailure};
use crate::application::ports::{PriceSourcePort, SnapshotStorePort, StoreError, TickerUniversePort};
use crate::application::retry::{BackoffCalculator, RetryPolicy};
use crate::domain::{
    BatchPlan, CrossoverParams, RunMetadata, RunWindow, Snapshot, TickerResult, TickerSource,
    TickerSymbol, normalize_universe,
};
use crate::observability::{record_batch_duration, record_snapshot_write, record_ticker_evaluation, set_run_progress};

/// Errors that abort a run.
///
/// Per-ticker failures never show up here; they are counted in the snapshot.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The snapshot could not be written after every attempt.
    #[error("Snapshot write failed after {attempts} attempts: {source}")]
    Persistence {
        /// Attempts made.
        attempts: u32,
        /// Error from the final attempt.
        #[source]
        source: StoreError,
    },

    /// The run settings cannot drive a run.
    #[error("Invalid run settings: {message}")]
    Config {
        /// Error details.
        message: String,
    },
}

/// Scheduler settings.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Tickers per batch.
    pub batch_size: usize,
    /// Maximum evaluations in flight within a batch.
    pub max_workers: usize,
    /// Default trailing days of history.
    pub lookback_days: u32,
    /// Retry policy for price fetches.
    pub fetch_retry: RetryPolicy,
    /// Retry policy for snapshot writes.
    pub write_retry: RetryPolicy,
    /// Crossover windows.
    pub crossover: CrossoverParams,
    /// Tickers used when the universe is unavailable or empty.
    pub fallback_tickers: Vec<String>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            batch_size: 100,
            max_workers: 4,
            lookback_days: 365,
            fetch_retry: RetryPolicy::default(),
            write_retry: RetryPolicy::new(2, RetryPolicy::default().base_delay),
            crossover: CrossoverParams::default(),
            fallback_tickers: ["AAPL", "MSFT", "GOOGL", "AMZN", "META", "NVDA"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl RunSettings {
    /// Check the settings can drive a run.
    pub fn validate(&self) -> Result<(), RunError> {
        if self.batch_size == 0 {
            return Err(RunError::Config {
                message: "batch_size must be at least 1".to_string(),
            });
        }
        if self.max_workers == 0 {
            return Err(RunError::Config {
                message: "max_workers must be at least 1".to_string(),
            });
        }
        validate_lookback(self.lookback_days)
    }
}

fn validate_lookback(lookback_days: u32) -> Result<(), RunError> {
    if lookback_days == 0 {
        return Err(RunError::Config {
            message: "lookback_days must be at least 1".to_string(),
        });
    }
    Ok(())
}

/// Use case for running the batched crossover backtest.
pub struct RunBacktestUseCase<P, S, U>
where
    P: PriceSourcePort + 'static,
    S: SnapshotStorePort,
    U: TickerUniversePort,
{
    evaluator: Arc<EvaluateTickerUseCase<P>>,
    store: Arc<S>,
    universe: Arc<U>,
    settings: RunSettings,
}

impl<P, S, U> RunBacktestUseCase<P, S, U>
where
    P: PriceSourcePort + 'static,
    S: SnapshotStorePort,
    U: TickerUniversePort,
{
    /// Create a new `RunBacktestUseCase`.
    pub fn new(price_source: Arc<P>, store: Arc<S>, universe: Arc<U>, settings: RunSettings) -> Self {
        let evaluator = EvaluateTickerUseCase::new(
            price_source,
            settings.fetch_retry.clone(),
            settings.crossover,
        );
        Self {
            evaluator: Arc::new(evaluator),
            store,
            universe,
            settings,
        }
    }

    /// Scheduler settings.
    pub const fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// Execute one run.
    pub async fn execute(&self, request: RunRequest) -> Result<RunSummary, RunError> {
        let run_id = Uuid::new_v4();
        self.run(run_id, request)
            .instrument(tracing::info_span!("run", %run_id))
            .await
    }

    async fn run(&self, run_id: Uuid, request: RunRequest) -> Result<RunSummary, RunError> {
        self.settings.validate()?;

        let started_at = Utc::now();
        let lookback_days = request.lookback_days.unwrap_or(self.settings.lookback_days);
        validate_lookback(lookback_days)?;
        let (tickers, source) = self.resolve_tickers(request.tickers).await;
        let window = RunWindow::trailing(lookback_days, started_at.date_naive());
        let plan = BatchPlan::new(&tickers, self.settings.batch_size);

        let mut meta = RunMetadata {
            run_id,
            total_tickers: tickers.len(),
            batch_size: self.settings.batch_size,
            max_workers: self.settings.max_workers,
            retries: self.settings.fetch_retry.retries,
            lookback_days,
            start_date: window.start,
            end_date: window.end,
            total_batches: plan.len(),
            completed_batches: 0,
            completed_count: 0,
            failed_count: 0,
            source,
            started_at,
            finished_at: None,
        };

        tracing::info!(
            total_tickers = meta.total_tickers,
            total_batches = meta.total_batches,
            ?source,
            start_date = %window.start,
            end_date = %window.end,
            "Run started"
        );

        let mut results: Vec<TickerResult> = Vec::with_capacity(tickers.len());
        let mut failures: Vec<TickerFailure> = Vec::new();
        set_run_progress(0, 0);

        self.publish(&results, &meta).await?;

        for (index, batch) in plan.batches().enumerate() {
            let batch_no = index + 1;
            let started = Instant::now();

            let outcomes = self
                .run_batch(batch, window)
                .instrument(tracing::info_span!("batch", batch = batch_no, size = batch.len()))
                .await;

            for (ticker, outcome) in outcomes {
                match outcome {
                    Ok(result) => {
                        record_ticker_evaluation("ok");
                        results.push(result);
                    }
                    Err(reason) => {
                        record_ticker_evaluation(reason.label());
                        tracing::warn!(ticker = %ticker, reason = %reason, "Ticker skipped");
                        failures.push(TickerFailure { ticker, reason });
                    }
                }
            }
            results.sort_by(TickerResult::rank_cmp);

            meta.completed_batches += 1;
            meta.completed_count = results.len();
            meta.failed_count = failures.len();

            record_batch_duration(started.elapsed().as_secs_f64());
            set_run_progress(meta.completed_count, meta.failed_count);
            tracing::info!(
                batch = batch_no,
                of = meta.total_batches,
                completed = meta.completed_count,
                failed = meta.failed_count,
                "Batch complete"
            );

            self.publish(&results, &meta).await?;
        }

        meta.finished_at = Some(Utc::now());
        let snapshot = self.publish(&results, &meta).await?;

        tracing::info!(
            completed = meta.completed_count,
            failed = meta.failed_count,
            "Run finished"
        );

        Ok(RunSummary { snapshot, failures })
    }

    /// Requested tickers first, then the universe, then the fallback list.
    async fn resolve_tickers(&self, requested: Option<Vec<String>>) -> (Vec<TickerSymbol>, TickerSource) {
        if let Some(raw) = requested.filter(|tickers| !tickers.is_empty()) {
            return (normalize_universe(raw), TickerSource::Request);
        }

        match self.universe.load().await {
            Ok(raw) => {
                let tickers = normalize_universe(raw);
                if !tickers.is_empty() {
                    return (tickers, TickerSource::Universe);
                }
                tracing::warn!("Ticker universe is empty, using fallback list");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Ticker universe unavailable, using fallback list");
            }
        }

        (
            normalize_universe(&self.settings.fallback_tickers),
            TickerSource::Fallback,
        )
    }

    /// Evaluate one batch; returns once every evaluation has resolved.
    ///
    /// Evaluations run as tasks owned by a `JoinSet`, so dropping this future
    /// (an aborted run) cancels them too.
    async fn run_batch(&self, batch: &[TickerSymbol], window: RunWindow) -> Vec<(TickerSymbol, TickerOutcome)> {
        let mut pending = batch.iter().cloned();
        let mut tasks = JoinSet::new();
        let mut in_flight: HashMap<task::Id, TickerSymbol> = HashMap::with_capacity(self.settings.max_workers);
        let mut outcomes = Vec::with_capacity(batch.len());

        loop {
            while tasks.len() < self.settings.max_workers {
                let Some(ticker) = pending.next() else {
                    break;
                };
                let evaluator = Arc::clone(&self.evaluator);
                let symbol = ticker.clone();
                let handle = tasks.spawn(
                    async move { evaluator.execute(&symbol, window).await }.in_current_span(),
                );
                in_flight.insert(handle.id(), ticker);
            }

            let Some(joined) = tasks.join_next_with_id().await else {
                break;
            };
            let (id, outcome) = match joined {
                Ok((id, outcome)) => (id, outcome),
                Err(e) => (
                    e.id(),
                    Err(EvaluationFailure::WorkerPanicked {
                        message: e.to_string(),
                    }),
                ),
            };
            if let Some(ticker) = in_flight.remove(&id) {
                outcomes.push((ticker, outcome));
            }
        }

        outcomes
    }

    /// Write a ranked snapshot, retrying per the write policy.
    async fn publish(&self, results: &[TickerResult], meta: &RunMetadata) -> Result<Snapshot, RunError> {
        let snapshot = Snapshot::ranked(results.to_vec(), meta.clone(), Utc::now());
        let mut backoff = BackoffCalculator::new(&self.settings.write_retry);
        let mut attempt = 0_u32;

        loop {
            attempt += 1;
            match self.store.write(&snapshot).await {
                Ok(()) => {
                    record_snapshot_write("ok");
                    return Ok(snapshot);
                }
                Err(e) => {
                    record_snapshot_write("error");

                    let Some(delay) = backoff.next_backoff() else {
                        tracing::error!(attempts = attempt, error = %e, "Snapshot write failed, aborting run");
                        return Err(RunError::Persistence {
                            attempts: attempt,
                            source: e,
                        });
                    };

                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Snapshot write failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
