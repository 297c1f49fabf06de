//! Prompts used by the campaign planner.

use crate::context::CampaignProfile;

/// Prompt asking for the overall campaign strategy.
#[must_use]
pub fn strategy_prompt(profile: &CampaignProfile) -> String {
    format!(
        "Create a comprehensive content marketing campaign strategy for:

Campaign: {name}
Description: {description}
Objective: {objective}
Target Audience: {audience}
Content Type: {content_type}
Platforms: {platforms}
Tone: {tone}
Keywords: {keywords}

Please provide:
1. Content calendar with 10 specific content ideas
2. Platform-specific adaptations
3. Engagement strategies
4. Key performance indicators
5. Timeline and milestones

Format as JSON with clear structure.",
        name = profile.name,
        description = profile.description,
        objective = profile.objective,
        audience = profile.target_audience,
        content_type = profile.content_type,
        platforms = profile.platform_list(),
        tone = profile.tone,
        keywords = profile.keywords,
    )
}

/// Prompt asking for concrete content ideas.
#[must_use]
pub fn ideas_prompt(profile: &CampaignProfile) -> String {
    format!(
        "Generate 5 specific, actionable content ideas for this campaign:

Campaign: {name}
Target: {audience}
Platforms: {platforms}
Tone: {tone}

For each idea, provide:
- Title/Hook
- Content outline
- Platform-specific format
- Expected engagement type
- Call-to-action

Format as JSON array.",
        name = profile.name,
        audience = profile.target_audience,
        platforms = profile.platform_list(),
        tone = profile.tone,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_prompt_lists_profile() {
        let profile = CampaignProfile::new("Fall Drop")
            .with_objective("grow newsletter")
            .with_platforms(["youtube", "newsletter"]);

        let prompt = strategy_prompt(&profile);
        assert!(prompt.contains("Campaign: Fall Drop"));
        assert!(prompt.contains("Objective: grow newsletter"));
        assert!(prompt.contains("Platforms: youtube, newsletter"));
    }

    #[test]
    fn test_ideas_prompt_asks_for_json_array() {
        let prompt = ideas_prompt(&CampaignProfile::new("X"));
        assert!(prompt.ends_with("Format as JSON array."));
    }
}
