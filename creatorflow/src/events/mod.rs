//! Event sink system for observability.
//!
//! Pipelines report every lifecycle transition and progress tick through an
//! [`EventSink`]. The default sink forwards events to `tracing`.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
