//! Utility functions for identifiers and timestamps.

mod timestamps;

pub use timestamps::{iso_timestamp, unix_millis};

use uuid::Uuid;

/// Generates a new UUID v7 (time-ordered), used for run identifiers.
#[must_use]
pub fn generate_run_id() -> Uuid {
    Uuid::now_v7()
}

/// Generates a new UUID v4.
#[must_use]
pub fn generate_uuid() -> Uuid {
    Uuid::new_v4()
}
