//! One-shot campaign brief generation.
//!
//! Unlike the staged pipeline, the planner makes two direct generation calls
//! (strategy, then content ideas) and stores the result as a single
//! [`CampaignRecord`]. Any failure is returned to the caller.

use crate::context::{CampaignProfile, IdentityProvider};
use crate::core::CampaignRecord;
use crate::errors::CampaignError;
use crate::generation::{GenerationClient, GenerationOptions, DEFAULT_MODEL};
use crate::persistence::PersistenceSink;
use crate::prompts::{ideas_prompt, strategy_prompt};
use crate::utils::{generate_uuid, iso_timestamp, unix_millis};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, info_span, Instrument};

/// Token budget for the strategy call.
pub const STRATEGY_MAX_TOKENS: u32 = 2000;

/// Token budget for the content ideas call.
pub const IDEAS_MAX_TOKENS: u32 = 1500;

/// Status given to newly created campaigns.
pub const CAMPAIGN_STATUS_ACTIVE: &str = "active";

/// The generated brief.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignPlan {
    /// The campaign strategy.
    pub strategy: String,
    /// The content ideas.
    pub content_ideas: String,
    /// The record that was stored.
    pub record: CampaignRecord,
}

/// Generates and stores campaign briefs.
pub struct CampaignPlanner {
    client: Arc<dyn GenerationClient>,
    sink: Arc<dyn PersistenceSink>,
    identity: Arc<dyn IdentityProvider>,
    model_id: String,
}

impl std::fmt::Debug for CampaignPlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CampaignPlanner")
            .field("model_id", &self.model_id)
            .finish_non_exhaustive()
    }
}

impl CampaignPlanner {
    /// Creates a planner.
    #[must_use]
    pub fn new(
        client: Arc<dyn GenerationClient>,
        sink: Arc<dyn PersistenceSink>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            client,
            sink,
            identity,
            model_id: DEFAULT_MODEL.to_string(),
        }
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    /// Generates the strategy and content ideas, then stores the campaign.
    ///
    /// # Errors
    ///
    /// Fails if the profile has no name, if no user is signed in, if either
    /// generation call fails, or if the record cannot be stored.
    pub async fn generate(&self, profile: &CampaignProfile) -> Result<CampaignPlan, CampaignError> {
        if profile.name.trim().is_empty() {
            return Err(CampaignError::MissingField("name"));
        }

        let span = info_span!("campaign", name = %profile.name);
        self.generate_inner(profile).instrument(span).await
    }

    async fn generate_inner(&self, profile: &CampaignProfile) -> Result<CampaignPlan, CampaignError> {
        let user = self.identity.current_user().await?;

        let strategy = self
            .client
            .generate(
                &strategy_prompt(profile),
                &GenerationOptions::new(STRATEGY_MAX_TOKENS).with_model(&self.model_id),
            )
            .await?
            .text;

        let content_ideas = self
            .client
            .generate(
                &ideas_prompt(profile),
                &GenerationOptions::new(IDEAS_MAX_TOKENS).with_model(&self.model_id),
            )
            .await?
            .text;

        let id = profile.id.clone().unwrap_or_else(|| {
            format!(
                "campaign_{}_{}",
                unix_millis(),
                &generate_uuid().simple().to_string()[..8]
            )
        });
        let record = CampaignRecord {
            id,
            // The record carries the id; the flattened profile must not repeat it.
            profile: CampaignProfile {
                id: None,
                ..profile.clone()
            },
            generated_strategy: strategy.clone(),
            generated_content: content_ideas.clone(),
            status: CAMPAIGN_STATUS_ACTIVE.to_string(),
            created_by: user,
            created_at: iso_timestamp(),
        };
        self.sink.create_campaign(&record).await?;

        info!(
            campaign_id = %record.id,
            strategy_chars = strategy.len(),
            ideas_chars = content_ideas.len(),
            "Campaign created"
        );
        Ok(CampaignPlan {
            strategy,
            content_ideas,
            record,
        })
    }
}
