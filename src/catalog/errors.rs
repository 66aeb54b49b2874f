//! Catalog error types.

use thiserror::Error;

use crate::validation::ErrorBag;

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors raised by catalog mutations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Malformed input: missing name, unknown type, duplicate keys, etc.
    #[error("the given data was invalid")]
    Validation(ErrorBag),

    /// Type-lock or possible-value-lock breach: the requested change would
    /// orphan attribute-value rows that reference the current catalog state.
    #[error("attribute update violates referential integrity")]
    IntegrityViolation(ErrorBag),

    /// No live attribute with this id.
    #[error("attribute not found: {0}")]
    NotFound(u64),
}

impl CatalogError {
    /// The field-indexed error bag, when this error carries one.
    pub fn errors(&self) -> Option<&ErrorBag> {
        match self {
            CatalogError::Validation(bag) | CatalogError::IntegrityViolation(bag) => Some(bag),
            CatalogError::NotFound(_) => None,
        }
    }
}
