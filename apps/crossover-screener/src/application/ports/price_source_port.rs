//! Price Source Port (Driven Port)
//!
//! Interface for fetching daily price history from an external provider.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{PriceSeries, RunWindow, TickerSymbol};

/// Price source error.
///
/// Every variant is transient from the screener's point of view: the
/// fetch-and-evaluate step retries all of them the same way.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceSourceError {
    /// Connection, TLS or timeout failure.
    #[error("Price source connection error: {message}")]
    Network {
        /// Error details.
        message: String,
    },

    /// Rate limited.
    #[error("Rate limited by price source")]
    RateLimited {
        /// Seconds to wait before retrying, when the provider said so.
        retry_after_secs: Option<u64>,
    },

    /// Symbol not found.
    #[error("Symbol not found: {symbol}")]
    NotFound {
        /// The unknown symbol.
        symbol: String,
    },

    /// Unexpected HTTP status or provider-reported error.
    #[error("Price source API error ({status}): {message}")]
    Api {
        /// HTTP status code (0 when the error came from the payload).
        status: u16,
        /// Error details.
        message: String,
    },

    /// Response body could not be decoded.
    #[error("Malformed price data: {message}")]
    Parse {
        /// Error details.
        message: String,
    },
}

impl PriceSourceError {
    /// Provider-requested delay before the next attempt.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited {
                retry_after_secs: Some(secs),
            } => Some(Duration::from_secs(*secs)),
            _ => None,
        }
    }

    /// Short label for metrics and logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network",
            Self::RateLimited { .. } => "rate_limited",
            Self::NotFound { .. } => "not_found",
            Self::Api { .. } => "api",
            Self::Parse { .. } => "parse",
        }
    }
}

/// Port for fetching daily closing prices.
///
/// Implementations request a daily interval over the inclusive window and
/// return an empty series when the provider has no rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceSourcePort: Send + Sync {
    /// Fetch daily history for one ticker.
    async fn fetch_daily_history(
        &self,
        ticker: &TickerSymbol,
        window: RunWindow,
    ) -> Result<PriceSeries, PriceSourceError>;
}
