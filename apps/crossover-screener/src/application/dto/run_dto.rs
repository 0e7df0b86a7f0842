//! Run DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::use_cases::EvaluationFailure;
use crate::domain::{Snapshot, TickerSource, TickerSymbol};

/// Request to start a run.
///
/// Unset fields fall back to the configured universe and lookback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    /// Explicit tickers; `None` or an empty list loads the universe.
    #[serde(default)]
    pub tickers: Option<Vec<String>>,
    /// Trailing days of history; `None` uses the configured default.
    #[serde(default)]
    pub lookback_days: Option<u32>,
}

impl RunRequest {
    /// Run over the configured universe with default settings.
    #[must_use]
    pub fn universe() -> Self {
        Self::default()
    }

    /// Run over an explicit ticker list.
    #[must_use]
    pub fn for_tickers<I, S>(tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tickers: Some(tickers.into_iter().map(Into::into).collect()),
            lookback_days: None,
        }
    }

    /// Override the lookback.
    #[must_use]
    pub fn with_lookback_days(mut self, lookback_days: u32) -> Self {
        self.lookback_days = Some(lookback_days);
        self
    }
}

/// A ticker that produced no result, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerFailure {
    /// Ticker that failed.
    pub ticker: TickerSymbol,
    /// Why it failed.
    pub reason: EvaluationFailure,
}

/// Outcome of a finished run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// The terminal snapshot as written.
    pub snapshot: Snapshot,
    /// Per-ticker failures in processing order.
    pub failures: Vec<TickerFailure>,
}

impl RunSummary {
    /// Run identifier.
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.snapshot.meta.run_id
    }

    /// Origin of the ticker list.
    #[must_use]
    pub const fn source(&self) -> TickerSource {
        self.snapshot.meta.source
    }

    /// Tickers with a result.
    #[must_use]
    pub const fn completed_count(&self) -> usize {
        self.snapshot.meta.completed_count
    }

    /// Tickers without a result.
    #[must_use]
    pub const fn failed_count(&self) -> usize {
        self.snapshot.meta.failed_count
    }
}
