//! Campaign profile and the context block it contributes to prompts.

use serde::{Deserialize, Serialize};

/// The brief a creator fills in when setting up a campaign.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignProfile {
    /// Campaign identifier, if the campaign has been stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Campaign name.
    pub name: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// What the campaign should achieve.
    #[serde(default)]
    pub objective: String,
    /// Who the content is for.
    #[serde(default)]
    pub target_audience: String,
    /// Primary content format (e.g. "educational").
    #[serde(default)]
    pub content_type: String,
    /// Platforms to publish on.
    #[serde(default)]
    pub platforms: Vec<String>,
    /// Campaign length (e.g. "4 weeks").
    #[serde(default)]
    pub duration: String,
    /// Voice of the content.
    #[serde(default)]
    pub tone: String,
    /// Comma-separated keywords.
    #[serde(default)]
    pub keywords: String,
}

impl CampaignProfile {
    /// Creates a profile with just a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the stored campaign identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the target audience.
    #[must_use]
    pub fn with_target_audience(mut self, audience: impl Into<String>) -> Self {
        self.target_audience = audience.into();
        self
    }

    /// Sets the platforms.
    #[must_use]
    pub fn with_platforms<I, S>(mut self, platforms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.platforms = platforms.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Sets the tone.
    #[must_use]
    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = tone.into();
        self
    }

    /// Sets the keywords.
    #[must_use]
    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = keywords.into();
        self
    }

    /// Sets the objective.
    #[must_use]
    pub fn with_objective(mut self, objective: impl Into<String>) -> Self {
        self.objective = objective.into();
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Platforms joined for display.
    #[must_use]
    pub fn platform_list(&self) -> String {
        self.platforms.join(", ")
    }

    /// Renders the context block embedded in stage prompts.
    #[must_use]
    pub fn render_context(&self) -> String {
        format!(
            "Campaign: {}\nTarget Audience: {}\nPlatforms: {}\nContent Type: {}\nTone: {}\nKeywords: {}",
            self.name,
            self.target_audience,
            self.platform_list(),
            self.content_type,
            self.tone,
            self.keywords,
        )
    }
}
