//! Fixed in-process ticker universe.

use async_trait::async_trait;

use crate::application::ports::{TickerUniversePort, UniverseError};

/// Universe that always returns the same list.
#[derive(Debug, Clone, Default)]
pub struct StaticTickerUniverse {
    tickers: Vec<String>,
}

impl StaticTickerUniverse {
    /// Universe over the given entries.
    #[must_use]
    pub fn new<I, S>(tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tickers: tickers.into_iter().map(Into::into).collect(),
        }
    }

    /// Universe with no entries.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            tickers: Vec::new(),
        }
    }
}

#[async_trait]
impl TickerUniversePort for StaticTickerUniverse {
    async fn load(&self) -> Result<Vec<String>, UniverseError> {
        Ok(self.tickers.clone())
    }
}
