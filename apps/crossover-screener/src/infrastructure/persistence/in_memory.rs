//! In-memory snapshot store for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::application::ports::{SnapshotStorePort, StoreError};
use crate::domain::Snapshot;

/// In-memory implementation of `SnapshotStorePort`.
///
/// Keeps every written snapshot in order so tests can inspect the
/// progression of a run. Not for production use.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    history: RwLock<Vec<Snapshot>>,
    failures_remaining: AtomicU32,
}

impl InMemorySnapshotStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `count` writes.
    pub fn fail_next_writes(&self, count: u32) {
        self.failures_remaining.store(count, Ordering::SeqCst);
    }

    /// Every snapshot written, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<Snapshot> {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of successful writes.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl SnapshotStorePort for InMemorySnapshotStore {
    async fn write(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let should_fail = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(StoreError::Io {
                path: "memory".to_string(),
                message: "injected write failure".to_string(),
            });
        }

        self.history
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(snapshot.clone());
        Ok(())
    }

    async fn read(&self) -> Option<Snapshot> {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDate, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::domain::{RunMetadata, TickerSource};

    fn snapshot(completed_batches: usize) -> Snapshot {
        let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        Snapshot::ranked(
            Vec::new(),
            RunMetadata {
                run_id: Uuid::nil(),
                total_tickers: 0,
                batch_size: 100,
                max_workers: 4,
                retries: 2,
                lookback_days: 365,
                start_date: day,
                end_date: day,
                total_batches: 0,
                completed_batches,
                completed_count: 0,
                failed_count: 0,
                source: TickerSource::Fallback,
                started_at: DateTime::<Utc>::UNIX_EPOCH,
                finished_at: None,
            },
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn read_returns_latest_write() {
        let store = InMemorySnapshotStore::new();
        assert!(store.read().await.is_none());

        store.write(&snapshot(1)).await.unwrap();
        store.write(&snapshot(2)).await.unwrap();

        assert_eq!(store.write_count(), 2);
        assert_eq!(store.read().await.unwrap().meta.completed_batches, 2);
    }

    #[tokio::test]
    async fn injected_failures_are_consumed() {
        let store = InMemorySnapshotStore::new();
        store.fail_next_writes(2);

        assert!(store.write(&snapshot(1)).await.is_err());
        assert!(store.write(&snapshot(1)).await.is_err());
        assert!(store.write(&snapshot(1)).await.is_ok());
        assert_eq!(store.history().len(), 1);
    }
}
