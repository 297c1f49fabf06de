//! Core domain model types for creatorflow.
//!
//! This module contains the fundamental types used throughout the crate:
//! - Stage identifiers and status
//! - Stage and pipeline run state
//! - Persisted records and pipeline events

mod event;
mod records;
mod stage;
mod status;

pub use event::PipelineEvent;
pub use records::{
    ActivityLogEntry, CampaignRecord, ContentRecord, ACTION_STAGE_COMPLETED, ACTION_STAGE_EDITED,
};
pub use stage::{PipelineRun, Stage};
pub use status::{StageId, StageStatus};
