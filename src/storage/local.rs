//! Local snapshot file.
//!
//! The snapshot holds the full listing collection from the most recent
//! successful fetch. Each write replaces the file wholesale: the JSON is
//! written to a temporary sibling and renamed over the target, so readers
//! never observe a partially written snapshot.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::ListingCollection;

/// Mode for the snapshot file: owner read/write, group/other read.
#[cfg(unix)]
const SNAPSHOT_MODE: u32 = 0o644;

/// Snapshot file writer/reader.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
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

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(SNAPSHOT_MODE))
                .await?;
        }

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Serialize the collection as indented JSON and replace the snapshot.
    pub async fn write_snapshot(&self, listings: &ListingCollection) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(listings)?;
        self.write_bytes(&bytes).await?;
        log::debug!(
            "Snapshot of {} listings written to {}",
            listings.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Read the current snapshot, returning None if there is none yet.
    pub async fn read_snapshot(&self) -> Result<Option<ListingCollection>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}
