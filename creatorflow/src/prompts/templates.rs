//! The fixed stage table.

use super::StageDefinition;
use crate::core::StageId;

pub(super) const DEFINITIONS: [StageDefinition; 6] = [
    StageDefinition {
        id: StageId::Planning,
        name: "Content Planning",
        agent_label: "Planning Agent",
        headline: "Create a comprehensive content planning strategy for a creator campaign.",
        prior_label: None,
        instructions: "Include:
1. Content calendar for the next 4 weeks with specific dates
2. Key themes and topics based on current trends
3. Content pillars that align with brand values
4. Posting frequency recommendations per platform
5. Platform-specific adaptations and best practices
6. Seasonal/trending opportunities
7. Content mix ratios (educational, promotional, entertaining)

Format as a detailed, actionable plan with specific dates and deliverables.",
        search_augmented: true,
    },
    StageDefinition {
        id: StageId::Brainstorming,
        name: "Idea Generation",
        agent_label: "Brainstorming Agent",
        headline: "Generate content ideas for a creator campaign.",
        prior_label: Some("Based on this content plan"),
        instructions: "Generate 12 creative content ideas including:
1. Engaging headlines/hooks that stop the scroll
2. Content formats (video, carousel, story, reel, etc.)
3. Key messages and value propositions
4. Visual concepts and styling directions
5. Interactive elements (polls, Q&A, challenges)
6. Call-to-action suggestions
7. Trending hashtags and keywords
8. Cross-platform adaptation strategies

Make each idea specific, actionable, and optimized for engagement.",
        search_augmented: true,
    },
    StageDefinition {
        id: StageId::Creative,
        name: "Content Creation",
        agent_label: "Creative Agent",
        headline: "Create production-ready content for a creator campaign.",
        prior_label: Some("Using these content ideas"),
        instructions: "Create detailed content for the top 5 ideas:
1. Full scripts/copy with engaging openings and strong closings
2. Visual descriptions and shot lists
3. Platform-specific versions (Instagram vs TikTok vs LinkedIn)
4. Hashtag suggestions (5-15 per platform)
5. Engagement hooks and conversation starters
6. Thumbnail/cover image concepts
7. Caption variations for A/B testing
8. Story/highlight adaptations

Make content production-ready with specific instructions.",
        search_augmented: false,
    },
    StageDefinition {
        id: StageId::CompetitorAnalysis,
        name: "Competitor Analysis",
        agent_label: "Competitor Agent",
        headline: "Analyze competitor content strategies in this niche.",
        prior_label: None,
        instructions: "Provide:
1. Top 10 competitor analysis with specific examples
2. Content gaps and untapped opportunities
3. Trending topics and viral formats in the niche
4. Best performing content types and engagement patterns
5. Differentiation strategies and unique angles
6. Pricing/value proposition insights
7. Audience engagement patterns and preferences
8. Content frequency and posting schedules
9. Collaboration and partnership opportunities

Focus on actionable competitive intelligence with specific recommendations.",
        search_augmented: true,
    },
    StageDefinition {
        id: StageId::Evaluation,
        name: "Content Evaluation",
        agent_label: "Evaluation Agent",
        headline: "Evaluate the campaign content comprehensively.",
        prior_label: Some("Evaluate this content comprehensively"),
        instructions: "Provide detailed feedback on:
1. Content quality and engagement potential (score 1-10)
2. SEO optimization and discoverability
3. Brand alignment and voice consistency
4. Audience relevance and value delivery
5. Platform-specific optimization
6. Call-to-action effectiveness
7. Visual appeal and production quality
8. Trending topic alignment
9. Improvement recommendations with specific changes
10. A/B testing suggestions

Include specific, actionable feedback with before/after examples.",
        search_augmented: false,
    },
    StageDefinition {
        id: StageId::Scheduling,
        name: "Publishing Schedule",
        agent_label: "Scheduling Agent",
        headline: "Create a comprehensive publishing schedule for a creator campaign.",
        prior_label: Some("Create a comprehensive publishing schedule based on"),
        instructions: "Include:
1. Optimal posting times for each platform (with timezone considerations)
2. Content sequencing strategy and narrative flow
3. Cross-platform promotion and repurposing plan
4. Engagement follow-up schedule and community management
5. Performance tracking milestones and KPIs
6. Content batching and production timeline
7. Seasonal/event-based scheduling opportunities
8. Backup content and contingency plans
9. Team collaboration and approval workflows
10. Analytics review and optimization schedule

Provide a detailed 30-day timeline with specific dates and times.",
        search_augmented: true,
    },
];
