//! Scripted price source for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{PriceSourceError, PriceSourcePort};
use crate::domain::{PriceSeries, RunWindow, TickerSymbol};

/// What the mock does when a symbol is fetched.
#[derive(Debug, Clone)]
enum Script {
    Series(PriceSeries),
    Fail(PriceSourceError),
    Flaky {
        failures: u32,
        error: PriceSourceError,
        series: PriceSeries,
    },
    Panic,
}

/// Mock price source for testing.
///
/// Unscripted symbols return the default series (empty unless set).
/// Tracks per-symbol call counts and the peak number of concurrent fetches.
#[derive(Debug, Default)]
pub struct MockPriceSource {
    scripts: RwLock<HashMap<String, Script>>,
    default_series: RwLock<PriceSeries>,
    calls: RwLock<HashMap<String, u32>>,
    latency: RwLock<Duration>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

/// Decrements the in-flight count on drop, including on panic.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockPriceSource {
    /// Create a new mock price source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Series returned for unscripted symbols.
    pub fn set_default_series(&self, series: PriceSeries) {
        *self.default_series.write().unwrap_or_else(PoisonError::into_inner) = series;
    }

    /// Always return `series` for `symbol`.
    pub fn set_series(&self, symbol: &str, series: PriceSeries) {
        self.script(symbol, Script::Series(series));
    }

    /// Always fail `symbol` with `error`.
    pub fn set_failure(&self, symbol: &str, error: PriceSourceError) {
        self.script(symbol, Script::Fail(error));
    }

    /// Fail `symbol` `failures` times, then return `series`.
    pub fn set_flaky(&self, symbol: &str, failures: u32, error: PriceSourceError, series: PriceSeries) {
        self.script(
            symbol,
            Script::Flaky {
                failures,
                error,
                series,
            },
        );
    }

    /// Panic when `symbol` is fetched.
    pub fn set_panic(&self, symbol: &str) {
        self.script(symbol, Script::Panic);
    }

    /// Delay every fetch by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.write().unwrap_or_else(PoisonError::into_inner) = latency;
    }

    /// Fetches made for `symbol`.
    #[must_use]
    pub fn calls(&self, symbol: &str) -> u32 {
        self.calls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(symbol)
            .copied()
            .unwrap_or(0)
    }

    /// Fetches made across all symbols.
    #[must_use]
    pub fn total_calls(&self) -> u32 {
        self.calls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .sum()
    }

    /// Highest number of fetches observed in flight at once.
    #[must_use]
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn script(&self, symbol: &str, script: Script) {
        self.scripts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(symbol.to_uppercase(), script);
    }

    fn record_call(&self, symbol: &str) -> u32 {
        let mut calls = self.calls.write().unwrap_or_else(PoisonError::into_inner);
        let count = calls.entry(symbol.to_string()).or_insert(0);
        *count += 1;
        *count
    }
}

#[async_trait]
impl PriceSourcePort for MockPriceSource {
    async fn fetch_daily_history(
        &self,
        ticker: &TickerSymbol,
        _window: RunWindow,
    ) -> Result<PriceSeries, PriceSourceError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlight(&self.in_flight);
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        let latency = *self.latency.read().unwrap_or_else(PoisonError::into_inner);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let call = self.record_call(ticker.as_str());
        let script = self
            .scripts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(ticker.as_str())
            .cloned();

        match script {
            None => Ok(self
                .default_series
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()),
            Some(Script::Series(series)) => Ok(series),
            Some(Script::Fail(error)) => Err(error),
            Some(Script::Flaky {
                failures,
                error,
                series,
            }) => {
                if call <= failures {
                    Err(error)
                } else {
                    Ok(series)
                }
            }
            Some(Script::Panic) => panic!("scripted panic for {ticker}"),
        }
    }
}
