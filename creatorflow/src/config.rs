//! Pipeline configuration.

use crate::errors::ConfigError;
use crate::generation::{GenerationOptions, DEFAULT_MODEL};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// What a stage receives as prior output when the stage before it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpstreamFailurePolicy {
    /// Run the stage with an empty prior output.
    #[default]
    ProceedWithoutContext,
    /// Run the stage with the failed stage's error text as prior output.
    ProceedWithErrorText,
    /// Mark the stage failed without calling the generation client.
    FailDependents,
}

/// Settings for the cosmetic progress ticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerConfig {
    /// Whether the ticker runs at all.
    #[serde(default = "default_ticker_enabled")]
    pub enabled: bool,
    /// Interval between ticks in milliseconds.
    #[serde(default = "default_tick_interval")]
    pub interval_ms: u64,
    /// Progress added per tick.
    #[serde(default = "default_tick_step")]
    pub step: u8,
    /// Progress never exceeds this while the call is in flight.
    #[serde(default = "default_tick_cap")]
    pub cap: u8,
}

fn default_ticker_enabled() -> bool {
    true
}

fn default_tick_interval() -> u64 {
    300
}

fn default_tick_step() -> u8 {
    8
}

fn default_tick_cap() -> u8 {
    90
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            enabled: default_ticker_enabled(),
            interval_ms: default_tick_interval(),
            step: default_tick_step(),
            cap: default_tick_cap(),
        }
    }
}

impl TickerConfig {
    /// A ticker that never runs.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Gets the interval as a Duration.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Configuration for a [`ContentPipeline`](crate::pipeline::ContentPipeline).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Pause between stages in milliseconds.
    #[serde(default = "default_inter_stage_delay")]
    pub inter_stage_delay_ms: u64,
    /// Token budget per generation call.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Model requested from the generation client.
    #[serde(default = "default_model_id")]
    pub model_id: Option<String>,
    /// Progress ticker settings.
    #[serde(default)]
    pub ticker: TickerConfig,
    /// Handling of stages whose predecessor failed.
    #[serde(default)]
    pub upstream_failure: UpstreamFailurePolicy,
    /// Whether in-memory edits are saved to the persistence sink immediately.
    #[serde(default)]
    pub persist_edits: bool,
}

fn default_inter_stage_delay() -> u64 {
    1000
}

fn default_max_tokens() -> u32 {
    2000
}

#[allow(clippy::unnecessary_wraps)]
fn default_model_id() -> Option<String> {
    Some(DEFAULT_MODEL.to_string())
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            inter_stage_delay_ms: default_inter_stage_delay(),
            max_tokens: default_max_tokens(),
            model_id: default_model_id(),
            ticker: TickerConfig::default(),
            upstream_failure: UpstreamFailurePolicy::default(),
            persist_edits: false,
        }
    }
}

impl PipelineConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks that values are within range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_tokens == 0 {
            return Err(ConfigError::invalid("max_tokens", "must be greater than zero"));
        }
        if self.ticker.cap > 100 {
            return Err(ConfigError::invalid(
                "ticker.cap",
                format!("{} exceeds 100", self.ticker.cap),
            ));
        }
        if self.ticker.enabled && self.ticker.step == 0 {
            return Err(ConfigError::invalid("ticker.step", "must be greater than zero"));
        }
        if self.ticker.enabled && self.ticker.interval_ms == 0 {
            return Err(ConfigError::invalid("ticker.interval_ms", "must be greater than zero"));
        }
        Ok(())
    }

    /// Sets the inter-stage delay.
    #[must_use]
    pub fn with_inter_stage_delay(mut self, delay: Duration) -> Self {
        self.inter_stage_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the token budget.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    /// Sets the ticker settings.
    #[must_use]
    pub fn with_ticker(mut self, ticker: TickerConfig) -> Self {
        self.ticker = ticker;
        self
    }

    /// Sets the upstream failure policy.
    #[must_use]
    pub fn with_upstream_failure(mut self, policy: UpstreamFailurePolicy) -> Self {
        self.upstream_failure = policy;
        self
    }

    /// Enables or disables saving edits immediately.
    #[must_use]
    pub fn with_persist_edits(mut self, persist: bool) -> Self {
        self.persist_edits = persist;
        self
    }

    /// Gets the inter-stage delay as a Duration.
    #[must_use]
    pub fn inter_stage_delay(&self) -> Duration {
        Duration::from_millis(self.inter_stage_delay_ms)
    }

    /// Generation options for a stage.
    #[must_use]
    pub fn generation_options(&self, search_augmented: bool) -> GenerationOptions {
        GenerationOptions {
            max_tokens: self.max_tokens,
            allow_search_augmentation: search_augmented,
            model_id: self.model_id.clone(),
        }
    }
}
