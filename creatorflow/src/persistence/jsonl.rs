//! Append-only JSON Lines persistence sink.

use super::{PersistenceSink, ACTIVITY_COLLECTION, CAMPAIGN_COLLECTION, CONTENT_COLLECTION};
use crate::core::{ActivityLogEntry, CampaignRecord, ContentRecord};
use crate::errors::PersistenceError;
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

/// Writes each collection to `<dir>/<collection>.jsonl`, one record per line.
#[derive(Debug)]
pub struct JsonlFileSink {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlFileSink {
    /// Creates a sink rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the directory records are written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file backing a collection.
    #[must_use]
    pub fn collection_path(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{collection}.jsonl"))
    }

    async fn append<T: Serialize + Sync>(
        &self,
        collection: &str,
        record: &T,
    ) -> Result<(), PersistenceError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let _guard = self.write_lock.lock().await;
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.collection_path(collection);
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;

        debug!(collection, path = %path.display(), "Appended record");
        Ok(())
    }
}

#[async_trait]
impl PersistenceSink for JsonlFileSink {
    async fn create_content(&self, record: &ContentRecord) -> Result<(), PersistenceError> {
        self.append(CONTENT_COLLECTION, record).await
    }

    async fn append_activity(&self, entry: &ActivityLogEntry) -> Result<(), PersistenceError> {
        self.append(ACTIVITY_COLLECTION, entry).await
    }

    async fn create_campaign(&self, record: &CampaignRecord) -> Result<(), PersistenceError> {
        self.append(CAMPAIGN_COLLECTION, record).await
    }
}
