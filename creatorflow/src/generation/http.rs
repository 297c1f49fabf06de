//! HTTP generation client for a hosted text-generation endpoint.

use super::{GenerationClient, GenerationOptions, GenerationResponse};
use crate::errors::GenerationError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

/// Configuration for [`HttpGenerationClient`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpClientConfig {
    /// Endpoint that accepts generation requests.
    pub endpoint: String,
    /// Bearer token, if the endpoint requires one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_timeout() -> u64 {
    60
}

impl HttpClientConfig {
    /// Creates a configuration for an endpoint.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            timeout_seconds: default_timeout(),
        }
    }

    /// Sets the bearer token.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    prompt: &'a str,
    max_tokens: u32,
    search: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

impl<'a> GenerateRequest<'a> {
    fn new(prompt: &'a str, options: &'a GenerationOptions) -> Self {
        Self {
            prompt,
            max_tokens: options.max_tokens,
            search: options.allow_search_augmentation,
            model: options.model_id.as_deref(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateReply {
    text: String,
    #[serde(default)]
    model: Option<String>,
}

/// Generation client that POSTs JSON to a hosted endpoint.
pub struct HttpGenerationClient {
    client: reqwest::Client,
    config: HttpClientConfig,
}

impl HttpGenerationClient {
    /// Creates a client.
    pub fn new(config: HttpClientConfig) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| GenerationError::request(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn headers(&self) -> Result<HeaderMap, GenerationError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = &self.config.api_key {
            let value = format!("Bearer {key}");
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&value).map_err(|e| GenerationError::request(e.to_string()))?,
            );
        }
        Ok(headers)
    }

    fn classify(&self, err: &reqwest::Error) -> GenerationError {
        if err.is_timeout() {
            GenerationError::Timeout {
                seconds: self.config.timeout_seconds,
            }
        } else {
            GenerationError::request(err.to_string())
        }
    }
}

#[async_trait]
impl GenerationClient for HttpGenerationClient {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<GenerationResponse, GenerationError> {
        let body = GenerateRequest::new(prompt, options);
        let started = Instant::now();

        let response = self
            .client
            .post(&self.config.endpoint)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(&e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::PAYMENT_REQUIRED {
            let text = response.text().await.unwrap_or_default();
            return Err(GenerationError::Quota(format!("HTTP {status}: {text}")));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GenerationError::request(format!("HTTP {status}: {text}")));
        }

        let reply: GenerateReply = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;
        debug!(chars = reply.text.len(), latency_ms, "Generation completed");

        Ok(GenerationResponse {
            text: reply.text,
            model: reply.model.or_else(|| options.model_id.clone()),
            latency_ms: Some(latency_ms),
        })
    }
}
