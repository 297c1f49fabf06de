//! Test fixtures for pipeline testing.

use crate::config::{PipelineConfig, TickerConfig};
use crate::context::CampaignProfile;
use std::time::Duration;

/// A configuration with no inter-stage delay and a fast ticker.
#[must_use]
pub fn fast_config() -> PipelineConfig {
    PipelineConfig::new()
        .with_inter_stage_delay(Duration::ZERO)
        .with_ticker(TickerConfig {
            enabled: true,
            interval_ms: 5,
            step: 10,
            cap: 90,
        })
}

/// A fully populated campaign profile.
#[must_use]
pub fn sample_campaign() -> CampaignProfile {
    CampaignProfile::new("Spring Launch")
        .with_id("camp_spring")
        .with_description("Launch of the spring collection")
        .with_objective("awareness")
        .with_target_audience("Young professionals")
        .with_platforms(["instagram", "tiktok"])
        .with_content_type("video")
        .with_tone("playful")
        .with_keywords("spring, fresh, launch")
}
