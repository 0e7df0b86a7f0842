//! Ticker universe read from a text file.
//!
//! Symbols are separated by newlines or commas. Blank entries are skipped and
//! `#` starts a comment that runs to the end of the line:
//!
//! ```text
//! # mega caps
//! AAPL, MSFT
//! nvda   # normalized later
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::application::ports::{TickerUniversePort, UniverseError};

/// Universe loaded from an optional file path.
#[derive(Debug, Clone, Default)]
pub struct FileTickerUniverse {
    path: Option<PathBuf>,
}

impl FileTickerUniverse {
    /// Universe backed by `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Universe with no file configured; every load reports it unavailable.
    #[must_use]
    pub const fn unconfigured() -> Self {
        Self { path: None }
    }

    /// Configured path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Split file contents into raw symbol entries.
#[must_use]
pub fn parse_entries(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(|line| line.split_once('#').map_or(line, |(before, _)| before))
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(String::from)
        .collect()
}

#[async_trait]
impl TickerUniversePort for FileTickerUniverse {
    async fn load(&self) -> Result<Vec<String>, UniverseError> {
        let Some(path) = &self.path else {
            return Err(UniverseError::Unavailable {
                message: "no ticker file configured".to_string(),
            });
        };

        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| UniverseError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        let entries = parse_entries(&contents);
        tracing::debug!(path = %path.display(), entries = entries.len(), "Ticker universe loaded");
        Ok(entries)
    }
}
