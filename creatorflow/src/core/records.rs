//! Records written to the persistence sink.

use super::{Stage, StageId};
use crate::context::{CampaignProfile, UserId};
use crate::utils::{generate_uuid, iso_timestamp, unix_millis};
use serde::{Deserialize, Serialize};

/// Action recorded when a stage completes.
pub const ACTION_STAGE_COMPLETED: &str = "workflow_step_completed";

/// Action recorded when an edited stage output is saved.
pub const ACTION_STAGE_EDITED: &str = "workflow_step_edited";

/// Generated content for one completed stage. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Record identifier, `content_<stage>_<unix millis>_<suffix>`.
    pub id: String,
    /// The campaign this content belongs to.
    pub campaign_ref: String,
    /// The stage that produced it.
    pub stage_id: StageId,
    /// Display title (the stage name).
    pub title: String,
    /// The generated text.
    pub body: String,
    /// Content provenance, always `ai_generated` for pipeline output.
    pub content_type: String,
    /// Record status.
    pub status: String,
    /// The user who ran the stage.
    pub created_by: UserId,
    /// Creation time (ISO 8601).
    pub created_at: String,
}

impl ContentRecord {
    /// Builds the record for a completed stage.
    #[must_use]
    pub fn for_stage(stage: &Stage, body: &str, campaign_ref: &str, user: &UserId) -> Self {
        Self {
            id: format!(
                "content_{}_{}_{}",
                stage.id,
                unix_millis(),
                &generate_uuid().simple().to_string()[..8]
            ),
            campaign_ref: campaign_ref.to_string(),
            stage_id: stage.id,
            title: stage.name.clone(),
            body: body.to_string(),
            content_type: "ai_generated".to_string(),
            status: "completed".to_string(),
            created_by: user.clone(),
            created_at: iso_timestamp(),
        }
    }
}

/// Append-only audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    /// Who acted.
    pub actor: UserId,
    /// What happened.
    pub action: String,
    /// What it happened to.
    pub target: String,
    /// Free-text detail.
    pub detail: String,
    /// When it happened (ISO 8601).
    pub timestamp: String,
}

impl ActivityLogEntry {
    /// Creates an entry stamped with the current time.
    #[must_use]
    pub fn new(
        actor: &UserId,
        action: impl Into<String>,
        target: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            actor: actor.clone(),
            action: action.into(),
            target: target.into(),
            detail: detail.into(),
            timestamp: iso_timestamp(),
        }
    }

    /// Entry for a stage that just completed.
    #[must_use]
    pub fn stage_completed(actor: &UserId, stage: &Stage, chars: usize) -> Self {
        Self::new(
            actor,
            ACTION_STAGE_COMPLETED,
            stage.name.clone(),
            format!("Completed {} with {} characters of content", stage.name, chars),
        )
    }

    /// Entry for an edited stage output that was saved.
    #[must_use]
    pub fn stage_edited(actor: &UserId, stage: &Stage, chars: usize) -> Self {
        Self::new(
            actor,
            ACTION_STAGE_EDITED,
            stage.name.clone(),
            format!("Saved edited {} with {} characters of content", stage.name, chars),
        )
    }
}

/// A generated campaign brief.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignRecord {
    /// Record identifier.
    pub id: String,
    /// The profile that was submitted.
    #[serde(flatten)]
    pub profile: CampaignProfile,
    /// The generated campaign strategy.
    pub generated_strategy: String,
    /// The generated content ideas.
    pub generated_content: String,
    /// Record status.
    pub status: String,
    /// The user who created the campaign.
    pub created_by: UserId,
    /// Creation time (ISO 8601).
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_record_for_stage() {
        let mut stage = Stage::for_id(StageId::Brainstorming);
        stage.complete("ideas");
        let user = UserId::new("user_1");

        let record = ContentRecord::for_stage(&stage, "ideas", "camp_9", &user);

        assert!(record.id.starts_with("content_brainstorming_"));
        assert_eq!(record.title, "Idea Generation");
        assert_eq!(record.campaign_ref, "camp_9");
        assert_eq!(record.content_type, "ai_generated");
        assert_eq!(record.status, "completed");
    }

    #[test]
    fn test_content_record_ids_are_unique() {
        let stage = Stage::for_id(StageId::Planning);
        let user = UserId::new("u");
        let a = ContentRecord::for_stage(&stage, "x", "c", &user);
        let b = ContentRecord::for_stage(&stage, "x", "c", &user);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_activity_detail_counts_characters() {
        let stage = Stage::for_id(StageId::Planning);
        let entry = ActivityLogEntry::stage_completed(&UserId::new("u"), &stage, 42);

        assert_eq!(entry.action, ACTION_STAGE_COMPLETED);
        assert_eq!(entry.target, "Content Planning");
        assert_eq!(entry.detail, "Completed Content Planning with 42 characters of content");
    }
}
