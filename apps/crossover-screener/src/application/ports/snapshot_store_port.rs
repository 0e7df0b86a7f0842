//! Snapshot Store Port (Driven Port)
//!
//! Durable home of the ranked snapshot. The batch scheduler is the only
//! writer during a run; anything else only reads.

use async_trait::async_trait;

use crate::domain::Snapshot;

/// Snapshot store error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Filesystem or backend failure.
    #[error("Snapshot I/O error at '{path}': {message}")]
    Io {
        /// Location being written.
        path: String,
        /// Error details.
        message: String,
    },

    /// Snapshot could not be encoded.
    #[error("Snapshot serialization error: {0}")]
    Serialization(String),
}

/// Port for persisting and reading the run snapshot.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnapshotStorePort: Send + Sync {
    /// Replace the stored snapshot.
    ///
    /// Readers observe either the previous snapshot or the new one, never a
    /// partial write.
    async fn write(&self, snapshot: &Snapshot) -> Result<(), StoreError>;

    /// Last fully written snapshot.
    ///
    /// Returns `None` when nothing was written yet or the stored data is
    /// unreadable; corruption is never surfaced as an error.
    async fn read(&self) -> Option<Snapshot>;
}
