//! File-based store — the whole lot as one JSON document.
//!
//! The snapshot is loaded once on open and rewritten after every change.
//! Writes go to a sibling temp file first and are renamed into place, so a
//! crash mid-write leaves the previous snapshot intact.
//!
//! Storage location: `~/.parkinglot/parking_lot.json` unless configured.

use async_trait::async_trait;
use parkinglot_core::error::StoreError;
use parkinglot_core::store::{LotChange, LotSnapshot, LotStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// A file-backed lot store holding a single JSON snapshot.
pub struct FileStore {
    path: PathBuf,
    snapshot: Arc<RwLock<Option<LotSnapshot>>>,
}

impl FileStore {
    /// Open the store at `path`.
    ///
    /// A missing file means no lot has been created yet. A file that does
    /// not parse is an error rather than an empty lot.
    pub fn open(path: PathBuf) -> Result<Self, StoreError> {
        let snapshot = Self::load_from_disk(&path)?;
        debug!(
            path = %path.display(),
            created = snapshot.is_some(),
            "File lot store loaded"
        );
        Ok(Self {
            path,
            snapshot: Arc::new(RwLock::new(snapshot)),
        })
    }

    fn load_from_disk(path: &Path) -> Result<Option<LotSnapshot>, StoreError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::Storage(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )))
            }
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| StoreError::Corrupt(format!("{}: {e}", path.display())))
    }

    /// Write the snapshot to disk.
    async fn flush(&self, snapshot: &LotSnapshot) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StoreError::Storage(format!("Failed to create store directory: {e}"))
            })?;
        }

        let content = serde_json::to_string_pretty(snapshot)
            .map_err(|e| StoreError::Storage(format!("Failed to serialize lot: {e}")))?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content.as_bytes())
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to write lot file: {e}")))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to replace lot file: {e}")))?;

        Ok(())
    }
}

#[async_trait]
impl LotStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn load(&self) -> Result<Option<LotSnapshot>, StoreError> {
        Ok(self.snapshot.read().await.clone())
    }

    async fn apply(&self, change: &LotChange) -> Result<(), StoreError> {
        let mut guard = self.snapshot.write().await;
        let mut next = guard.clone().unwrap_or_default();
        next.apply(change);
        // The cache only moves once the file on disk has.
        self.flush(&next).await?;
        *guard = Some(next);
        Ok(())
    }
}
