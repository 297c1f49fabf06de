//! Testing utilities for creatorflow pipelines.
//!
//! This module provides:
//! - A scripted generation client and a failing persistence sink
//! - Assertions over stage state
//! - Ready-made configuration and campaign fixtures

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{
    assert_all_pending, assert_output_contains, assert_stage_completed, assert_stage_failed,
};
pub use fixtures::{fast_config, sample_campaign};
pub use mocks::{FailingSink, MockGenerationClient};
