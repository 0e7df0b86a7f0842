//! Ticker symbol value object and universe normalization.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

/// A normalized ticker symbol (trimmed, uppercase).
///
/// Any non-blank text is accepted; the price source decides whether the
/// symbol exists.
///
/// Examples:
/// - Equity: "AAPL", "MSFT", "BRK-B"
/// - Index: "^GSPC"
/// - FX pair: "EURUSD=X"
/// - NSE listing: "M&M.NS"
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TickerSymbol(String);

impl TickerSymbol {
    /// Parse and normalize a raw ticker.
    ///
    /// # Errors
    ///
    /// Returns error if the ticker is empty after trimming.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let normalized = raw.trim().to_uppercase();

        if normalized.is_empty() {
            return Err(DomainError::invalid_ticker("Ticker cannot be empty"));
        }

        Ok(Self(normalized))
    }

    /// Get the ticker string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TickerSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TickerSymbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TickerSymbol {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for TickerSymbol {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<TickerSymbol> for String {
    fn from(value: TickerSymbol) -> Self {
        value.0
    }
}

/// Normalize a raw ticker universe.
///
/// Each entry is trimmed and uppercased; blank entries are dropped and
/// duplicates are removed keeping the first occurrence, so the input order
/// is preserved.
pub fn normalize_universe<I, S>(raw: I) -> Vec<TickerSymbol>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut tickers = Vec::new();

    for entry in raw {
        if let Ok(ticker) = TickerSymbol::parse(entry.as_ref()) {
            if seen.insert(ticker.clone()) {
                tickers.push(ticker);
            }
        }
    }

    tickers
}
