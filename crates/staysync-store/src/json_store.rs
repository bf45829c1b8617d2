//! JSON file snapshot store (secondary/driven adapter)
//!
//! Persists the full booking snapshot as one JSON array. Writes go to a
//! temporary file in the same directory followed by a rename, so a crash
//! mid-write never leaves a truncated snapshot behind and an aborted
//! reconciliation pass observes either the old file or the new one.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, instrument};

use staysync_core::domain::booking::Booking;
use staysync_core::ports::local_store::ILocalStore;

/// `ILocalStore` backed by a single JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait::async_trait]
impl ILocalStore for JsonFileStore {
    /// Reads the snapshot; a missing file is an empty snapshot
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn read(&self) -> anyhow::Result<Vec<Booking>> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("Snapshot file missing, treating as empty");
                return Ok(Vec::new());
            }
            Err(err) => {
                return Err(err).context(format!(
                    "Failed to read snapshot: {}",
                    self.path.display()
                ))
            }
        };

        let bookings: Vec<Booking> = serde_json::from_slice(&content).with_context(|| {
            format!("Failed to parse snapshot: {}", self.path.display())
        })?;
        debug!(bookings = bookings.len(), "Snapshot loaded");
        Ok(bookings)
    }

    /// Replaces the snapshot atomically (temp file + rename)
    #[instrument(skip(self, bookings), fields(path = %self.path.display(), bookings = bookings.len()))]
    async fn write(&self, bookings: &[Booking]) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = serde_json::to_vec_pretty(bookings).context("Failed to encode snapshot")?;

        let temp = self.temp_path();
        tokio::fs::write(&temp, &content)
            .await
            .with_context(|| format!("Failed to write temp snapshot: {}", temp.display()))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .with_context(|| format!("Failed to replace snapshot: {}", self.path.display()))?;

        debug!("Snapshot written");
        Ok(())
    }
}
