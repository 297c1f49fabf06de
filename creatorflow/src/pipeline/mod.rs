//! Pipeline execution.
//!
//! This module provides:
//! - The sequential orchestrator ([`ContentPipeline`])
//! - The single-stage runner
//! - The cosmetic progress ticker

mod orchestrator;
mod runner;
mod ticker;

#[cfg(test)]
mod integration_tests;

pub use orchestrator::{ContentPipeline, ContentPipelineBuilder, RunSummary};
pub use runner::{StageInput, StageRunner};
pub use ticker::ProgressTicker;

use crate::core::PipelineRun;
use parking_lot::RwLock;
use std::sync::Arc;

/// Run state shared between the orchestrator, the runner and the ticker.
///
/// Never held across an await point.
pub type SharedRun = Arc<RwLock<PipelineRun>>;
