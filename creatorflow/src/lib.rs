//! # Creatorflow
//!
//! A sequential, multi-stage content-generation pipeline for creator campaigns.
//!
//! Six stages (planning, brainstorming, creative, competitor analysis,
//! evaluation, scheduling) run one after another. Each stage builds a prompt
//! from a fixed template, the previous stage's output and the campaign
//! context, calls a text generation backend, and records the result:
//!
//! - **Table-driven prompts**: one static definition per stage
//! - **Explicit run state**: the orchestrator owns a snapshot-able [`core::PipelineRun`]
//! - **Pluggable collaborators**: generation, persistence and identity are traits
//! - **Event-driven observability**: lifecycle and progress events plus `tracing` spans
//! - **Cooperative cancellation**: an in-flight call can be abandoned
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use creatorflow::prelude::*;
//! use std::sync::Arc;
//!
//! let pipeline = ContentPipeline::builder(
//!     Arc::new(HttpGenerationClient::new(HttpClientConfig::new(endpoint))?),
//!     Arc::new(JsonlFileSink::new("./data")),
//!     Arc::new(StaticIdentity::new("user_1")),
//! )
//! .campaign(CampaignProfile::new("Spring Launch").with_platforms(["instagram"]))
//! .build()?;
//!
//! let summary = pipeline.run_all().await?;
//! println!("{}", creatorflow::export::run_markdown(&pipeline.snapshot()));
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod campaign;
pub mod cancellation;
pub mod config;
pub mod context;
pub mod core;
pub mod errors;
pub mod events;
pub mod export;
pub mod generation;
pub mod observability;
pub mod persistence;
pub mod pipeline;
pub mod prompts;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::campaign::{CampaignPlan, CampaignPlanner};
    pub use crate::cancellation::CancellationToken;
    pub use crate::config::{PipelineConfig, TickerConfig, UpstreamFailurePolicy};
    pub use crate::context::{
        AnonymousIdentity, CampaignProfile, IdentityProvider, StaticIdentity, UserId,
    };
    pub use crate::core::{
        ActivityLogEntry, CampaignRecord, ContentRecord, PipelineEvent, PipelineRun, Stage,
        StageId, StageStatus,
    };
    pub use crate::errors::{
        CampaignError, ConfigError, CreatorflowError, GenerationError, IdentityError,
        PersistenceError, PipelineError, PromptBuildError,
    };
    pub use crate::events::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
    #[cfg(feature = "http")]
    pub use crate::generation::{HttpClientConfig, HttpGenerationClient};
    pub use crate::generation::{GenerationClient, GenerationOptions, GenerationResponse};
    pub use crate::observability::{init_tracing, LogFormat};
    pub use crate::persistence::{InMemorySink, JsonlFileSink, NoOpSink, PersistenceSink};
    pub use crate::pipeline::{ContentPipeline, RunSummary};
    pub use crate::prompts::{build_prompt, render_prompt};
    pub use crate::utils::{generate_uuid, iso_timestamp};
}
