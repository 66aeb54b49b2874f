//! Field-indexed validation errors.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// A field-indexed bag of validation messages.
///
/// Keys are dotted field paths (`name`, `attributes.2.value`); each key maps
/// to one or more messages. The map is ordered so serialized error bodies
/// are deterministic.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ErrorBag(BTreeMap<String, Vec<String>>);

impl ErrorBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message under a field path.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Fold another bag into this one, preserving both sides' messages.
    pub fn merge(&mut self, other: ErrorBag) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for one field path.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(|v| v.as_slice())
    }

    /// Whether any message is recorded under this field path.
    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }
}

/// Validation failure raised from a request-shaped code path.
///
/// Surfaces as a 422 response with the bag under `errors`.
#[derive(Debug, Error)]
#[error("the given data was invalid")]
pub struct RequestValidationError {
    pub errors: ErrorBag,
}

impl RequestValidationError {
    pub fn new(errors: ErrorBag) -> Self {
        Self { errors }
    }
}
