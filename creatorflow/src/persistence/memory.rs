//! In-memory persistence sink.

use super::{PersistenceSink, CAMPAIGN_COLLECTION, CONTENT_COLLECTION};
use crate::core::{ActivityLogEntry, CampaignRecord, ContentRecord, StageId};
use crate::errors::PersistenceError;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;

/// Keeps every record in memory. Useful for tests and local previews.
#[derive(Debug, Default)]
pub struct InMemorySink {
    content: DashMap<String, ContentRecord>,
    campaigns: DashMap<String, CampaignRecord>,
    activity: RwLock<Vec<ActivityLogEntry>>,
    content_order: RwLock<Vec<String>>,
}

impl InMemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all content records in insertion order.
    #[must_use]
    pub fn content(&self) -> Vec<ContentRecord> {
        self.content_order
            .read()
            .iter()
            .filter_map(|id| self.content.get(id).map(|r| r.value().clone()))
            .collect()
    }

    /// Returns content records produced by one stage, oldest first.
    #[must_use]
    pub fn content_for_stage(&self, stage: StageId) -> Vec<ContentRecord> {
        self.content()
            .into_iter()
            .filter(|r| r.stage_id == stage)
            .collect()
    }

    /// Returns the activity log.
    #[must_use]
    pub fn activity(&self) -> Vec<ActivityLogEntry> {
        self.activity.read().clone()
    }

    /// Returns a campaign by id.
    #[must_use]
    pub fn get_campaign(&self, id: &str) -> Option<CampaignRecord> {
        self.campaigns.get(id).map(|r| r.value().clone())
    }

    /// Returns the number of stored campaigns.
    #[must_use]
    pub fn campaign_count(&self) -> usize {
        self.campaigns.len()
    }
}

#[async_trait]
impl PersistenceSink for InMemorySink {
    async fn create_content(&self, record: &ContentRecord) -> Result<(), PersistenceError> {
        match self.content.entry(record.id.clone()) {
            Entry::Occupied(_) => {
                return Err(PersistenceError::write(
                    CONTENT_COLLECTION,
                    format!("record '{}' already exists", record.id),
                ));
            }
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
            }
        }
        // Taken after the shard lock is released; `content()` locks in the other order.
        self.content_order.write().push(record.id.clone());
        Ok(())
    }

    async fn append_activity(&self, entry: &ActivityLogEntry) -> Result<(), PersistenceError> {
        self.activity.write().push(entry.clone());
        Ok(())
    }

    async fn create_campaign(&self, record: &CampaignRecord) -> Result<(), PersistenceError> {
        match self.campaigns.entry(record.id.clone()) {
            Entry::Occupied(_) => Err(PersistenceError::write(
                CAMPAIGN_COLLECTION,
                format!("campaign '{}' already exists", record.id),
            )),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::UserId;
    use crate::core::Stage;

    fn record(id: &str, stage: StageId) -> ContentRecord {
        let mut record = ContentRecord::for_stage(&Stage::for_id(stage), "body", "camp", &UserId::new("u"));
        record.id = id.to_string();
        record
    }

    #[tokio::test]
    async fn test_content_keeps_insertion_order() {
        let sink = InMemorySink::new();
        sink.create_content(&record("b", StageId::Planning)).await.unwrap();
        sink.create_content(&record("a", StageId::Creative)).await.unwrap();

        let ids: Vec<String> = sink.content().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(sink.content_for_stage(StageId::Creative).len(), 1);
    }

    #[tokio::test]
    async fn test_records_are_immutable() {
        let sink = InMemorySink::new();
        sink.create_content(&record("x", StageId::Planning)).await.unwrap();

        let err = sink.create_content(&record("x", StageId::Planning)).await.unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(sink.content().len(), 1);
    }

    #[tokio::test]
    async fn test_activity_is_append_only() {
        let sink = InMemorySink::new();
        let stage = Stage::for_id(StageId::Planning);
        sink.append_activity(&ActivityLogEntry::stage_completed(&UserId::new("u"), &stage, 3))
            .await
            .unwrap();
        sink.append_activity(&ActivityLogEntry::stage_completed(&UserId::new("u"), &stage, 4))
            .await
            .unwrap();

        assert_eq!(sink.activity().len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writers_store_one_record() {
        let sink = std::sync::Arc::new(InMemorySink::new());
        let writers: Vec<_> = (0..16)
            .map(|_| {
                let sink = sink.clone();
                tokio::spawn(async move {
                    sink.create_content(&record("same", StageId::Planning)).await
                })
            })
            .collect();

        let mut stored = 0;
        for writer in writers {
            if writer.await.unwrap().is_ok() {
                stored += 1;
            }
        }

        assert_eq!(stored, 1);
        assert_eq!(sink.content().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_campaign_is_rejected() {
        let sink = InMemorySink::new();
        let record = CampaignRecord {
            id: "camp_1".to_string(),
            profile: crate::context::CampaignProfile::new("Launch"),
            generated_strategy: "s".to_string(),
            generated_content: "c".to_string(),
            status: "active".to_string(),
            created_by: UserId::new("u"),
            created_at: crate::utils::iso_timestamp(),
        };

        sink.create_campaign(&record).await.unwrap();
        let err = sink.create_campaign(&record).await.unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(sink.campaign_count(), 1);
    }
}
