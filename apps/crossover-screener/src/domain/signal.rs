//! Simple moving-average crossover backtest.
//!
//! The strategy holds the asset on day `t` only when the short SMA was above
//! the long SMA at the close of day `t - 1`. Holding decisions therefore never
//! see the return they are applied to.
//!
//! Both legs compound their daily returns multiplicatively:
//!
//! ```text
//! buy_hold = Π (1 + r_t) - 1
//! strategy = Π (1 + signal_{t-1} · r_t) - 1
//! outperformance = (strategy - buy_hold) × 100
//! ```
//!
//! Rows before the long window fills have no long average; the signal is
//! flat (0) there. A series shorter than the long window is never invested.

use serde::{Deserialize, Serialize};

use super::price_series::PriceSeries;

/// Default short SMA window.
pub const DEFAULT_SHORT_WINDOW: usize = 50;

/// Default long SMA window.
pub const DEFAULT_LONG_WINDOW: usize = 200;

/// SMA window lengths for the crossover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossoverParams {
    /// Short (fast) window in periods.
    pub short_window: usize,
    /// Long (slow) window in periods.
    pub long_window: usize,
}

impl Default for CrossoverParams {
    fn default() -> Self {
        Self {
            short_window: DEFAULT_SHORT_WINDOW,
            long_window: DEFAULT_LONG_WINDOW,
        }
    }
}

/// Cumulative returns of one backtest, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossoverMetrics {
    /// Strategy outperformance over buy-and-hold, in percentage points.
    pub return_pct: f64,
    /// Buy-and-hold cumulative return in percent.
    pub buy_hold_pct: f64,
    /// Strategy cumulative return in percent.
    pub strategy_pct: f64,
}

impl CrossoverMetrics {
    /// Build from cumulative fractional returns (0.25 = +25%).
    #[must_use]
    pub fn from_cumulative(strategy: f64, buy_hold: f64) -> Self {
        Self {
            return_pct: (strategy - buy_hold) * 100.0,
            buy_hold_pct: buy_hold * 100.0,
            strategy_pct: strategy * 100.0,
        }
    }

    /// Whether every component is a finite number.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.return_pct.is_finite() && self.buy_hold_pct.is_finite() && self.strategy_pct.is_finite()
    }
}

/// Trailing simple moving average; `None` until `window` rows are available.
#[must_use]
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }

    for (offset, chunk) in values.windows(window).enumerate() {
        out[offset + window - 1] = Some(chunk.iter().sum::<f64>() / window as f64);
    }
    out
}

/// Per-row crossover signal: `true` when the short SMA is strictly above the long SMA.
#[must_use]
pub fn crossover_signal(closes: &[f64], params: CrossoverParams) -> Vec<bool> {
    let short = rolling_mean(closes, params.short_window);
    let long = rolling_mean(closes, params.long_window);

    short
        .iter()
        .zip(&long)
        .map(|pair| matches!(pair, (Some(s), Some(l)) if s > l))
        .collect()
}

/// Run the crossover backtest over a price series.
///
/// Returns `None` for an empty series or when the compounded returns are not
/// finite; callers treat both as "no result" rather than an error.
#[must_use]
pub fn evaluate_crossover(series: &PriceSeries, params: CrossoverParams) -> Option<CrossoverMetrics> {
    if series.is_empty() {
        return None;
    }

    let closes = series.closes();
    let signal = crossover_signal(&closes, params);

    let mut buy_hold = 1.0_f64;
    let mut strategy = 1.0_f64;

    for t in 1..closes.len() {
        let prev = closes[t - 1];
        // pct_change is undefined off a zero close
        if prev == 0.0 {
            continue;
        }
        let period_return = closes[t] / prev - 1.0;

        buy_hold *= 1.0 + period_return;
        if signal[t - 1] {
            strategy *= 1.0 + period_return;
        }
    }

    let metrics = CrossoverMetrics::from_cumulative(strategy - 1.0, buy_hold - 1.0);
    metrics.is_finite().then_some(metrics)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use proptest::prelude::*;

    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
    }

    fn series(closes: &[f64]) -> PriceSeries {
        PriceSeries::from_closes(start(), closes)
    }

    #[test]
    fn rolling_mean_leading_rows_undefined() {
        let means = rolling_mean(&[1.0, 2.0, 3.0, 4.0], 3);
        assert_eq!(means, vec![None, None, Some(2.0), Some(3.0)]);
    }

    #[test]
    fn rolling_mean_window_longer_than_input() {
        assert!(rolling_mean(&[1.0, 2.0], 3).iter().all(Option::is_none));
    }

    #[test]
    fn empty_series_has_no_result() {
        assert!(evaluate_crossover(&PriceSeries::empty(), CrossoverParams::default()).is_none());
    }

    #[test]
    fn single_row_is_flat() {
        let metrics = evaluate_crossover(&series(&[10.0]), CrossoverParams::default()).unwrap();
        assert_eq!(metrics.buy_hold_pct, 0.0);
        assert_eq!(metrics.strategy_pct, 0.0);
        assert_eq!(metrics.return_pct, 0.0);
    }

    #[test]
    fn buy_hold_is_first_to_last_change() {
        let closes: Vec<f64> = (0..150).map(|i| 100.0 + f64::from(i)).collect();
        let metrics = evaluate_crossover(&series(&closes), CrossoverParams::default()).unwrap();
        let expected = (249.0 / 100.0 - 1.0) * 100.0;
        assert!((metrics.buy_hold_pct - expected).abs() < TOLERANCE);
    }

    #[test]
    fn short_series_never_invested() {
        let closes: Vec<f64> = (0..199).map(|i| 50.0 + f64::from(i) * 0.3).collect();
        let metrics = evaluate_crossover(&series(&closes), CrossoverParams::default()).unwrap();
        assert_eq!(metrics.strategy_pct, 0.0);
        assert!((metrics.return_pct + metrics.buy_hold_pct).abs() < TOLERANCE);
    }

    #[test]
    fn monotonic_rise_turns_signal_on_after_warmup() {
        let closes: Vec<f64> = (0..400).map(|i| 100.0 + f64::from(i) * 0.5).collect();
        let signal = crossover_signal(&closes, CrossoverParams::default());

        assert!(signal[..199].iter().all(|on| !on));
        assert!(signal[199..].iter().all(|on| *on));

        // Invested from day 200 onward: 299.5 / 199.5 - 1
        let metrics = evaluate_crossover(&series(&closes), CrossoverParams::default()).unwrap();
        let expected = (299.5 / 199.5 - 1.0) * 100.0;
        assert!((metrics.strategy_pct - expected).abs() < 1e-6);
        assert!(metrics.strategy_pct > 0.0);
    }

    #[test]
    fn exiting_before_a_decline_outperforms() {
        let mut closes: Vec<f64> = (0..250).map(|i| 100.0 + f64::from(i) * 0.4).collect();
        closes.extend((1..=100).map(|i| 200.0 - f64::from(i) * 1.5));

        let metrics = evaluate_crossover(&series(&closes), CrossoverParams::default()).unwrap();
        assert!((metrics.buy_hold_pct + 50.0).abs() < 1e-6);
        assert!(metrics.strategy_pct > metrics.buy_hold_pct);
        assert!(metrics.return_pct > 0.0);
    }

    #[test]
    fn signal_is_lagged_by_one_period() {
        // Signal on at the last row only must not capture the last return.
        let params = CrossoverParams {
            short_window: 1,
            long_window: 2,
        };
        let closes = [10.0, 10.0, 20.0];
        let signal = crossover_signal(&closes, params);
        assert_eq!(signal, vec![false, false, true]);

        let metrics = evaluate_crossover(&series(&closes), params).unwrap();
        assert_eq!(metrics.strategy_pct, 0.0);
        assert!((metrics.buy_hold_pct - 100.0).abs() < TOLERANCE);
    }

    #[test]
    fn zero_close_skips_undefined_return() {
        let params = CrossoverParams {
            short_window: 1,
            long_window: 2,
        };
        let metrics = evaluate_crossover(&series(&[0.0, 5.0, 10.0]), params).unwrap();
        assert!((metrics.buy_hold_pct - 100.0).abs() < TOLERANCE);
    }

    proptest! {
        #[test]
        fn outperformance_is_strategy_minus_buy_hold(
            closes in prop::collection::vec(1.0f64..500.0, 1..320)
        ) {
            let metrics = evaluate_crossover(&series(&closes), CrossoverParams::default()).unwrap();
            let diff = metrics.strategy_pct - metrics.buy_hold_pct;
            prop_assert!((metrics.return_pct - diff).abs() < 1e-6 * (1.0 + diff.abs()));
        }

        #[test]
        fn fewer_rows_than_long_window_means_flat_strategy(
            closes in prop::collection::vec(1.0f64..500.0, 1..200)
        ) {
            let metrics = evaluate_crossover(&series(&closes), CrossoverParams::default()).unwrap();
            prop_assert_eq!(metrics.strategy_pct, 0.0);
        }

        #[test]
        fn evaluation_is_deterministic(
            closes in prop::collection::vec(1.0f64..500.0, 0..320)
        ) {
            let input = series(&closes);
            let first = evaluate_crossover(&input, CrossoverParams::default());
            let second = evaluate_crossover(&input, CrossoverParams::default());
            prop_assert_eq!(first, second);
        }
    }
}
