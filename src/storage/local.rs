//! Local filesystem snapshot store.
//!
//! Keeps the snapshot as one pretty-printed JSON document and replaces it
//! atomically on save (write to a temp sibling, flush, then rename), so a
//! crash mid-write never leaves a half-written snapshot behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::Snapshot;
use crate::storage::SnapshotStore;

/// Snapshot store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct LocalSnapshotStore {
    path: PathBuf,
}

impl LocalSnapshotStore {
    /// Create a store for the given snapshot path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The snapshot file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the parent directory exists. Bare filenames have an empty
    /// parent, which needs no creation.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.ensure_dir().await?;

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Read raw bytes, returning None if the file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl SnapshotStore for LocalSnapshotStore {
    async fn load(&self) -> Result<Snapshot> {
        let bytes = match self.read_bytes().await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                log::debug!("No snapshot at {:?}, starting cold", self.path);
                return Ok(Snapshot::new());
            }
            Err(e) => {
                log::warn!(
                    "Snapshot at {:?} unreadable ({}), starting cold",
                    self.path,
                    e
                );
                return Ok(Snapshot::new());
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                log::warn!(
                    "Snapshot at {:?} is corrupt ({}), starting cold",
                    self.path,
                    e
                );
                Ok(Snapshot::new())
            }
        }
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(snapshot).map_err(AppError::persist)?;
        self.write_bytes(&bytes).await.map_err(AppError::persist)?;
        log::info!(
            "Snapshot saved: {} records to {:?}",
            snapshot.len(),
            self.path
        );
        Ok(())
    }
}
