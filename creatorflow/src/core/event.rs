//! Pipeline event type for lifecycle and progress notifications.

use super::StageId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An event emitted while a pipeline runs.
///
/// Events are consumed by [`EventSink`](crate::events::EventSink)s for
/// logging, monitoring, or driving a UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineEvent {
    /// The event type (e.g., "stage.started", "stage.completed").
    #[serde(rename = "type")]
    pub event_type: String,

    /// When the event occurred (ISO 8601).
    pub timestamp: String,

    /// The event payload data.
    #[serde(default)]
    pub data: HashMap<String, serde_json::Value>,
}

impl PipelineEvent {
    /// Creates a new event.
    #[must_use]
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            timestamp: crate::utils::iso_timestamp(),
            data: HashMap::new(),
        }
    }

    /// Adds a data field to the event.
    #[must_use]
    pub fn add_data(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Returns the stage this event concerns, if any.
    #[must_use]
    pub fn stage(&self) -> Option<&str> {
        self.data.get("stage").and_then(serde_json::Value::as_str)
    }

    /// Returns the payload as a JSON object, including the timestamp.
    #[must_use]
    pub fn payload(&self) -> serde_json::Value {
        let mut map: serde_json::Map<String, serde_json::Value> =
            self.data.clone().into_iter().collect();
        map.insert("timestamp".to_string(), serde_json::json!(self.timestamp));
        serde_json::Value::Object(map)
    }

    /// Creates a "pipeline.started" event.
    #[must_use]
    pub fn pipeline_started(run_id: &str, stage_count: usize) -> Self {
        Self::new("pipeline.started")
            .add_data("run_id", serde_json::json!(run_id))
            .add_data("stages", serde_json::json!(stage_count))
    }

    /// Creates a "pipeline.completed" event.
    #[must_use]
    pub fn pipeline_completed(run_id: &str, completed: usize, failed: usize) -> Self {
        Self::new("pipeline.completed")
            .add_data("run_id", serde_json::json!(run_id))
            .add_data("completed", serde_json::json!(completed))
            .add_data("failed", serde_json::json!(failed))
    }

    /// Creates a "pipeline.cancelled" event.
    #[must_use]
    pub fn pipeline_cancelled(run_id: &str, reason: &str) -> Self {
        Self::new("pipeline.cancelled")
            .add_data("run_id", serde_json::json!(run_id))
            .add_data("reason", serde_json::json!(reason))
    }

    /// Creates a "stage.started" event.
    #[must_use]
    pub fn stage_started(stage: StageId) -> Self {
        Self::new("stage.started").add_data("stage", serde_json::json!(stage))
    }

    /// Creates a "stage.progress" event.
    #[must_use]
    pub fn stage_progress(stage: StageId, progress: u8) -> Self {
        Self::new("stage.progress")
            .add_data("stage", serde_json::json!(stage))
            .add_data("progress", serde_json::json!(progress))
    }

    /// Creates a "stage.completed" event.
    #[must_use]
    pub fn stage_completed(stage: StageId, duration_ms: f64, chars: usize) -> Self {
        Self::new("stage.completed")
            .add_data("stage", serde_json::json!(stage))
            .add_data("duration_ms", serde_json::json!(duration_ms))
            .add_data("chars", serde_json::json!(chars))
    }

    /// Creates a "stage.failed" event.
    #[must_use]
    pub fn stage_failed(stage: StageId, error: &str) -> Self {
        Self::new("stage.failed")
            .add_data("stage", serde_json::json!(stage))
            .add_data("error", serde_json::json!(error))
    }

    /// Creates a "stage.persistence_failed" event.
    #[must_use]
    pub fn persistence_failed(stage: StageId, error: &str) -> Self {
        Self::new("stage.persistence_failed")
            .add_data("stage", serde_json::json!(stage))
            .add_data("error", serde_json::json!(error))
    }
}
