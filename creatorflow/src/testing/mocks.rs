//! Mock collaborators for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::time::Duration;

use crate::core::{ActivityLogEntry, CampaignRecord, ContentRecord};
use crate::errors::{GenerationError, PersistenceError};
use crate::generation::{GenerationClient, GenerationOptions, GenerationResponse};
use crate::persistence::{
    PersistenceSink, ACTIVITY_COLLECTION, CAMPAIGN_COLLECTION, CONTENT_COLLECTION,
};

/// A generation client that replays scripted responses and records every call.
///
/// Pattern rules are checked first: the response of the first rule whose
/// needle occurs in the prompt wins. Otherwise scripted responses are
/// returned in order; once exhausted the last one repeats. An empty script
/// echoes the prompt's length.
#[derive(Debug, Default)]
pub struct MockGenerationClient {
    responses: Vec<String>,
    patterns: Vec<(String, String)>,
    fail_on: HashSet<usize>,
    fail_all: bool,
    latency: Option<Duration>,
    prompts: Mutex<Vec<String>>,
    options: Mutex<Vec<GenerationOptions>>,
}

impl MockGenerationClient {
    /// Creates a client with scripted responses.
    #[must_use]
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Creates a client whose every call fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    /// Answers prompts containing `needle` with `response`.
    #[must_use]
    pub fn with_pattern(mut self, needle: impl Into<String>, response: impl Into<String>) -> Self {
        self.patterns.push((needle.into(), response.into()));
        self
    }

    /// Makes the given call (1-based) fail with a request error.
    #[must_use]
    pub fn failing_on_call(mut self, call: usize) -> Self {
        self.fail_on.insert(call);
        self
    }

    /// Delays every response.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Returns the number of calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }

    /// Returns every prompt received, in call order.
    #[must_use]
    pub fn recorded_prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    /// Returns the options of every call, in call order.
    #[must_use]
    pub fn recorded_options(&self) -> Vec<GenerationOptions> {
        self.options.lock().clone()
    }

    fn response_for(&self, call: usize, prompt: &str) -> String {
        if let Some((_, response)) = self.patterns.iter().find(|(needle, _)| prompt.contains(needle)) {
            return response.clone();
        }
        match self.responses.get(call - 1).or_else(|| self.responses.last()) {
            Some(text) => text.clone(),
            None => format!("generated {} chars", prompt.len()),
        }
    }
}

#[async_trait]
impl GenerationClient for MockGenerationClient {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<GenerationResponse, GenerationError> {
        let call = {
            let mut prompts = self.prompts.lock();
            prompts.push(prompt.to_string());
            prompts.len()
        };
        self.options.lock().push(options.clone());

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if self.fail_all || self.fail_on.contains(&call) {
            return Err(GenerationError::request(format!("mock failure on call {call}")));
        }

        Ok(GenerationResponse {
            text: self.response_for(call, prompt),
            model: options.model_id.clone(),
            latency_ms: self.latency.map(|d| d.as_secs_f64() * 1000.0),
        })
    }
}

/// A persistence sink that rejects every write.
#[derive(Debug, Clone)]
pub struct FailingSink {
    reason: String,
}

impl FailingSink {
    /// Creates a sink failing with `reason`.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl PersistenceSink for FailingSink {
    async fn create_content(&self, _record: &ContentRecord) -> Result<(), PersistenceError> {
        Err(PersistenceError::write(CONTENT_COLLECTION, self.reason.clone()))
    }

    async fn append_activity(&self, _entry: &ActivityLogEntry) -> Result<(), PersistenceError> {
        Err(PersistenceError::write(ACTIVITY_COLLECTION, self.reason.clone()))
    }

    async fn create_campaign(&self, _record: &CampaignRecord) -> Result<(), PersistenceError> {
        Err(PersistenceError::write(CAMPAIGN_COLLECTION, self.reason.clone()))
    }
}
