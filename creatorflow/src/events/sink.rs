//! Event sinks for pipeline lifecycle and progress events.

use crate::core::PipelineEvent;
use parking_lot::RwLock;
use tracing::{debug, info, Level};

/// Receives [`PipelineEvent`]s as a run progresses.
///
/// The runner publishes while it holds the run lock so events arrive in the
/// order the state changed. Implementations must return quickly and must
/// not block or panic; a sink that needs I/O should hand the event off.
pub trait EventSink: Send + Sync {
    /// Publishes one event.
    fn publish(&self, event: &PipelineEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

impl EventSink for NoOpEventSink {
    fn publish(&self, _event: &PipelineEvent) {}
}

/// Forwards events to `tracing`.
///
/// Progress ticks always log at debug; everything else logs at the
/// configured level.
#[derive(Debug, Clone)]
pub struct LoggingEventSink {
    level: Level,
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingEventSink {
    /// Creates a sink logging at `level`. Anything other than debug logs at info.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level sink.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }
}

impl EventSink for LoggingEventSink {
    fn publish(&self, event: &PipelineEvent) {
        let stage = event.stage().unwrap_or("-");
        if self.level == Level::DEBUG || event.event_type == "stage.progress" {
            debug!(event = %event.event_type, stage, data = %event.payload(), "Pipeline event");
        } else {
            info!(event = %event.event_type, stage, data = %event.payload(), "Pipeline event");
        }
    }
}

/// Records every event in memory, for tests and UI previews.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: RwLock<Vec<PipelineEvent>>,
}

impl CollectingEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every event in publication order.
    #[must_use]
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.read().clone()
    }

    /// Returns the number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Forgets every recorded event.
    pub fn clear(&self) {
        self.events.write().clear();
    }

    /// Returns the event types in publication order.
    #[must_use]
    pub fn event_types(&self) -> Vec<String> {
        self.events
            .read()
            .iter()
            .map(|e| e.event_type.clone())
            .collect()
    }

    /// Returns events whose type starts with `type_prefix`.
    #[must_use]
    pub fn events_of_type(&self, type_prefix: &str) -> Vec<PipelineEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.event_type.starts_with(type_prefix))
            .cloned()
            .collect()
    }

    /// Returns events about one stage.
    #[must_use]
    pub fn events_for_stage(&self, stage: &str) -> Vec<PipelineEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.stage() == Some(stage))
            .cloned()
            .collect()
    }
}

impl EventSink for CollectingEventSink {
    fn publish(&self, event: &PipelineEvent) {
        self.events.write().push(event.clone());
    }
}
