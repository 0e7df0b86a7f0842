//! JSON file snapshot store.
//!
//! Writes stage the full document in a sibling `*.json.tmp` file and rename
//! it over the target, so readers see either the old or the new snapshot.
//! The staged file is flushed to disk before the rename.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::application::ports::{SnapshotStorePort, StoreError};
use crate::domain::Snapshot;

/// Snapshot store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileSnapshotStore {
    path: PathBuf,
}

impl JsonFileSnapshotStore {
    /// Create a store writing to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }

    async fn stage(staging: &Path, body: &[u8]) -> std::io::Result<()> {
        let mut file = tokio::fs::File::create(staging).await?;
        file.write_all(body).await?;
        file.sync_all().await
    }

    fn io_error(&self, e: &std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            message: e.to_string(),
        }
    }
}

#[async_trait]
impl SnapshotStorePort for JsonFileSnapshotStore {
    async fn write(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let body = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(&e))?;
        }

        let staging = self.staging_path();
        if let Err(e) = Self::stage(&staging, &body).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(self.io_error(&e));
        }

        if let Err(e) = tokio::fs::rename(&staging, &self.path).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(self.io_error(&e));
        }

        tracing::debug!(
            path = %self.path.display(),
            results = snapshot.results.len(),
            "Snapshot written"
        );
        Ok(())
    }

    async fn read(&self) -> Option<Snapshot> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Snapshot unreadable");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Snapshot corrupt, treating as absent");
                None
            }
        }
    }
}
