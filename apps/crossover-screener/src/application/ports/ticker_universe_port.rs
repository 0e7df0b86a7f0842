//! Ticker Universe Port (Driven Port)
//!
//! Source of the symbols a run screens when the caller supplies none.

use async_trait::async_trait;

/// Ticker universe error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UniverseError {
    /// Universe file could not be read.
    #[error("Failed to read ticker universe '{path}': {message}")]
    Io {
        /// Universe location.
        path: String,
        /// Error details.
        message: String,
    },

    /// No universe is configured.
    #[error("Ticker universe unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },
}

/// Port for loading the raw ticker universe.
///
/// Entries are returned as written; normalization and de-duplication happen
/// in the scheduler.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TickerUniversePort: Send + Sync {
    /// Load the raw universe in source order.
    async fn load(&self) -> Result<Vec<String>, UniverseError>;
}
