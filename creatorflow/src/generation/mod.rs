//! Text generation capability.
//!
//! The pipeline treats generation as an opaque, atomic call: a prompt goes in,
//! text comes out or the call fails.

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::{HttpClientConfig, HttpGenerationClient};

use crate::errors::GenerationError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Default model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Options passed with each generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Token budget for the response.
    pub max_tokens: u32,
    /// Whether the provider may ground the answer with web search.
    #[serde(default)]
    pub allow_search_augmentation: bool,
    /// Model to use. `None` lets the provider decide.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_tokens: 2000,
            allow_search_augmentation: false,
            model_id: Some(DEFAULT_MODEL.to_string()),
        }
    }
}

impl GenerationOptions {
    /// Creates options with the given token budget.
    #[must_use]
    pub fn new(max_tokens: u32) -> Self {
        Self {
            max_tokens,
            ..Self::default()
        }
    }

    /// Enables or disables search augmentation.
    #[must_use]
    pub fn with_search(mut self, enabled: bool) -> Self {
        self.allow_search_augmentation = enabled;
        self
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }
}

/// Generated text plus provider metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// The generated text.
    pub text: String,
    /// The model that produced it, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Round-trip latency in milliseconds, when measured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<f64>,
}

impl GenerationResponse {
    /// Creates a response holding only text.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: None,
            latency_ms: None,
        }
    }
}

/// An external text-generation capability.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Generates text for a prompt.
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<GenerationResponse, GenerationError>;
}
