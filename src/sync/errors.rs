//! Synchronizer error types.

use thiserror::Error;

use crate::validation::ErrorBag;

/// Invalid attribute data supplied to the programmatic sync entry point.
///
/// Carries the same field-indexed bag as request validation; only the
/// surface differs.
#[derive(Debug, Error)]
#[error("invalid attribute data provided")]
pub struct InvalidAttributeData {
    pub errors: ErrorBag,
}

impl InvalidAttributeData {
    pub fn new(errors: ErrorBag) -> Self {
        Self { errors }
    }
}
