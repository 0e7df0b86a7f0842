//! Ticker universe configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Ticker universe configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniverseConfig {
    /// Ticker file; unset means the fallback list is used.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Tickers used when the universe is unavailable or empty.
    #[serde(default = "default_fallback")]
    pub fallback: Vec<String>,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            path: None,
            fallback: default_fallback(),
        }
    }
}

fn default_fallback() -> Vec<String> {
    ["AAPL", "MSFT", "GOOGL", "AMZN", "META", "NVDA"]
        .into_iter()
        .map(String::from)
        .collect()
}
