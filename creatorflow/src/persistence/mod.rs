//! Persistence sink for generated content and activity logs.
//!
//! From the pipeline's point of view the store is append-only: records are
//! created, never updated or deleted.

mod jsonl;
mod memory;

pub use jsonl::JsonlFileSink;
pub use memory::InMemorySink;

use crate::core::{ActivityLogEntry, CampaignRecord, ContentRecord};
use crate::errors::PersistenceError;
use async_trait::async_trait;

/// Collection holding generated content.
pub const CONTENT_COLLECTION: &str = "content";

/// Collection holding the activity log.
pub const ACTIVITY_COLLECTION: &str = "activity_log";

/// Collection holding campaigns.
pub const CAMPAIGN_COLLECTION: &str = "campaigns";

/// An external record store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PersistenceSink: Send + Sync {
    /// Stores a content record.
    async fn create_content(&self, record: &ContentRecord) -> Result<(), PersistenceError>;

    /// Appends an activity log entry.
    async fn append_activity(&self, entry: &ActivityLogEntry) -> Result<(), PersistenceError>;

    /// Stores a generated campaign.
    async fn create_campaign(&self, record: &CampaignRecord) -> Result<(), PersistenceError>;
}

/// A sink that accepts and discards every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpSink;

#[async_trait]
impl PersistenceSink for NoOpSink {
    async fn create_content(&self, _record: &ContentRecord) -> Result<(), PersistenceError> {
        Ok(())
    }

    async fn append_activity(&self, _entry: &ActivityLogEntry) -> Result<(), PersistenceError> {
        Ok(())
    }

    async fn create_campaign(&self, _record: &CampaignRecord) -> Result<(), PersistenceError> {
        Ok(())
    }
}
