//! Cooperative cancellation for in-flight pipeline runs.

mod token;

pub use token::CancellationToken;
