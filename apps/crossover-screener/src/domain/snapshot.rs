//! Ranked results and the persisted run snapshot.
//!
//! The JSON shape produced here is the compatibility surface for whatever
//! renders the ranking:
//!
//! ```json
//! {
//!   "last_update": "2025-01-02T03:04:05.123456Z",
//!   "results": [{"ticker": "AAPL", "return": 12.5, "buy_hold": 20.0, "strategy": 32.5}],
//!   "meta": {"total_tickers": 6, "batch_size": 100, "...": "..."}
//! }
//! ```

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::signal::CrossoverMetrics;
use super::ticker::TickerSymbol;

/// Backtest outcome for one successfully evaluated ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerResult {
    /// Evaluated ticker.
    pub ticker: TickerSymbol,
    /// Strategy outperformance over buy-and-hold, in percentage points.
    #[serde(rename = "return")]
    pub return_pct: f64,
    /// Buy-and-hold cumulative return in percent.
    #[serde(rename = "buy_hold")]
    pub buy_hold_pct: f64,
    /// Strategy cumulative return in percent.
    #[serde(rename = "strategy")]
    pub strategy_pct: f64,
}

impl TickerResult {
    /// Create a result from crossover metrics.
    #[must_use]
    pub const fn new(ticker: TickerSymbol, metrics: CrossoverMetrics) -> Self {
        Self {
            ticker,
            return_pct: metrics.return_pct,
            buy_hold_pct: metrics.buy_hold_pct,
            strategy_pct: metrics.strategy_pct,
        }
    }

    /// Descending order by outperformance, ties broken by ticker.
    #[must_use]
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .return_pct
            .total_cmp(&self.return_pct)
            .then_with(|| self.ticker.cmp(&other.ticker))
    }
}

/// Where a run's ticker list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TickerSource {
    /// Supplied by the caller that triggered the run.
    Request,
    /// Loaded from the configured ticker universe.
    Universe,
    /// Universe unavailable or empty; the fallback list was used.
    Fallback,
}

/// Run parameters and progress counters.
///
/// Counters only ever increase during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Unique run identifier.
    pub run_id: Uuid,
    /// Number of tickers in the resolved universe.
    pub total_tickers: usize,
    /// Tickers per batch.
    pub batch_size: usize,
    /// Maximum evaluations in flight within a batch.
    pub max_workers: usize,
    /// Additional fetch attempts per ticker.
    pub retries: u32,
    /// Trailing days of history requested.
    pub lookback_days: u32,
    /// First day of the requested history.
    pub start_date: NaiveDate,
    /// Last day of the requested history.
    pub end_date: NaiveDate,
    /// `ceil(total_tickers / batch_size)`.
    pub total_batches: usize,
    /// Batches fully drained so far.
    pub completed_batches: usize,
    /// Tickers with a result so far; always equals the result count.
    pub completed_count: usize,
    /// Tickers that failed or produced no data so far.
    pub failed_count: usize,
    /// Origin of the ticker list.
    pub source: TickerSource,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Set on the final write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunMetadata {
    /// Whether the run has written its terminal snapshot.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    /// Tickers accounted for, successful or not.
    #[must_use]
    pub const fn processed_count(&self) -> usize {
        self.completed_count + self.failed_count
    }
}

/// The sole persisted artifact: ranked results plus run metadata.
///
/// Each write fully replaces the previous snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Write time.
    pub last_update: DateTime<Utc>,
    /// Results sorted descending by outperformance.
    pub results: Vec<TickerResult>,
    /// Run metadata.
    pub meta: RunMetadata,
}

impl Snapshot {
    /// Build a snapshot, ranking the given results.
    #[must_use]
    pub fn ranked(mut results: Vec<TickerResult>, meta: RunMetadata, last_update: DateTime<Utc>) -> Self {
        results.sort_by(TickerResult::rank_cmp);
        Self {
            last_update,
            results,
            meta,
        }
    }

    /// The best `n` results.
    #[must_use]
    pub fn top(&self, n: usize) -> &[TickerResult] {
        &self.results[..n.min(self.results.len())]
    }

    /// Whether counters match data and results are ranked without duplicates.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let ranked = self
            .results
            .windows(2)
            .all(|pair| pair[0].return_pct >= pair[1].return_pct);

        let mut tickers: Vec<&TickerSymbol> = self.results.iter().map(|r| &r.ticker).collect();
        tickers.sort();
        tickers.dedup();

        self.meta.completed_count == self.results.len()
            && ranked
            && tickers.len() == self.results.len()
    }
}
