//! Observability
//!
//! Structured JSON logging: one line per event, synchronous, deterministic
//! key ordering.

mod logger;

pub use logger::{Logger, Severity};
