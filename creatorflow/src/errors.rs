//! Error types for the creatorflow pipeline.
//!
//! Each collaborator boundary has its own error enum so callers can tell a
//! generation failure from a persistence failure. [`CreatorflowError`] wraps
//! them all for callers that only want one type.

use crate::core::{StageId, StageStatus};
use std::collections::HashMap;
use thiserror::Error;

/// The main error type for creatorflow operations.
#[derive(Debug, Error)]
pub enum CreatorflowError {
    /// A prompt could not be built.
    #[error("{0}")]
    PromptBuild(#[from] PromptBuildError),

    /// The generation client failed.
    #[error("{0}")]
    Generation(#[from] GenerationError),

    /// A write to the persistence sink failed.
    #[error("{0}")]
    Persistence(#[from] PersistenceError),

    /// The identity provider could not resolve a user.
    #[error("{0}")]
    Identity(#[from] IdentityError),

    /// A pipeline operation was rejected.
    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    /// The campaign planner failed.
    #[error("{0}")]
    Campaign(#[from] CampaignError),

    /// Configuration was invalid or unreadable.
    #[error("{0}")]
    Config(#[from] ConfigError),
}

/// Error raised when a prompt cannot be built.
///
/// This only happens for stage identifiers outside the fixed set, which is a
/// programming error rather than a runtime condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptBuildError {
    /// The stage identifier is not one of the known stages.
    #[error("Unknown stage identifier: '{id}'")]
    UnknownStage {
        /// The rejected identifier.
        id: String,
    },
}

impl PromptBuildError {
    /// Creates an unknown stage error.
    #[must_use]
    pub fn unknown_stage(id: impl Into<String>) -> Self {
        Self::UnknownStage { id: id.into() }
    }
}

/// Errors reported by a [`GenerationClient`](crate::generation::GenerationClient).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The request could not be sent or the transport failed.
    #[error("Generation request failed: {0}")]
    Request(String),

    /// The provider rejected the request for quota or rate reasons.
    #[error("Generation quota exceeded: {0}")]
    Quota(String),

    /// The provider answered with something we could not use.
    #[error("Invalid generation response: {0}")]
    InvalidResponse(String),

    /// The request took longer than the configured timeout.
    #[error("Generation timed out after {seconds}s")]
    Timeout {
        /// The timeout that elapsed, in whole seconds.
        seconds: u64,
    },

    /// The call was abandoned because the pipeline was cancelled.
    #[error("cancelled: {0}")]
    Cancelled(String),

    /// Any other failure.
    #[error("{0}")]
    Other(String),
}

impl GenerationError {
    /// Creates a request error.
    #[must_use]
    pub fn request(reason: impl Into<String>) -> Self {
        Self::Request(reason.into())
    }

    /// Creates a generic error.
    #[must_use]
    pub fn other(reason: impl Into<String>) -> Self {
        Self::Other(reason.into())
    }

    /// Returns a short, stable name for the error kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Request(_) => "GenerationRequestError",
            Self::Quota(_) => "GenerationQuotaError",
            Self::InvalidResponse(_) => "GenerationResponseError",
            Self::Timeout { .. } => "GenerationTimeout",
            Self::Cancelled(_) => "GenerationCancelled",
            Self::Other(_) => "GenerationError",
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!(self.kind()));
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        if let Self::Timeout { seconds } = self {
            map.insert("timeout_seconds".to_string(), serde_json::json!(seconds));
        }
        map
    }
}

/// Errors reported by a [`PersistenceSink`](crate::persistence::PersistenceSink).
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The store refused or failed the write.
    #[error("Failed to write to '{collection}': {reason}")]
    Write {
        /// The collection or table name.
        collection: String,
        /// Why the write failed.
        reason: String,
    },

    /// A record could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PersistenceError {
    /// Creates a write error.
    #[must_use]
    pub fn write(collection: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Write {
            collection: collection.into(),
            reason: reason.into(),
        }
    }
}

/// Errors reported by an [`IdentityProvider`](crate::context::IdentityProvider).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// Nobody is signed in.
    #[error("No authenticated user")]
    Unauthenticated,

    /// The provider could not be reached.
    #[error("Identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Errors returned by pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The operation is not allowed while a run is in flight.
    #[error("Pipeline is already running")]
    AlreadyRunning,

    /// The stage is not part of this pipeline.
    #[error("Stage '{0}' is not part of this pipeline")]
    StageNotInPipeline(StageId),

    /// The stage has not completed, so it has no editable output.
    #[error("Stage '{stage}' is {status}, expected completed")]
    StageNotCompleted {
        /// The stage.
        stage: StageId,
        /// Its current status.
        status: StageStatus,
    },

    /// The pipeline was constructed without stages.
    #[error("Pipeline must contain at least one stage")]
    Empty,

    /// The same stage was listed twice.
    #[error("Stage '{0}' appears more than once")]
    DuplicateStage(StageId),

    /// An explicit save failed.
    #[error("{0}")]
    Persistence(#[from] PersistenceError),

    /// The current user could not be resolved for an explicit save.
    #[error("{0}")]
    Identity(#[from] IdentityError),
}

/// Errors returned by the campaign planner.
#[derive(Debug, Error)]
pub enum CampaignError {
    /// A generation call failed.
    #[error("Campaign generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// The campaign record could not be stored.
    #[error("{0}")]
    Persistence(#[from] PersistenceError),

    /// The current user could not be resolved.
    #[error("{0}")]
    Identity(#[from] IdentityError),

    /// The profile is missing required fields.
    #[error("Campaign profile is missing '{0}'")]
    MissingField(&'static str),
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field holds a value outside its allowed range.
    #[error("Invalid configuration for '{field}': {reason}")]
    Invalid {
        /// The field name.
        field: &'static str,
        /// Why it is invalid.
        reason: String,
    },

    /// The configuration document could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Creates an invalid field error.
    #[must_use]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
