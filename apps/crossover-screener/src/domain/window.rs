//! Date range covered by a run.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Inclusive `[start, end]` range of daily history to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunWindow {
    /// First day.
    pub start: NaiveDate,
    /// Last day.
    pub end: NaiveDate,
}

impl RunWindow {
    /// The `lookback_days` calendar days ending at `end`.
    #[must_use]
    pub fn trailing(lookback_days: u32, end: NaiveDate) -> Self {
        let start = end
            .checked_sub_days(Days::new(u64::from(lookback_days)))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end }
    }

    /// Calendar days spanned.
    #[must_use]
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}
