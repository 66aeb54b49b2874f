//! Project service errors.

use thiserror::Error;

use crate::validation::ErrorBag;

/// Result type for project operations
pub type ProjectResult<T> = Result<T, ProjectError>;

/// Errors raised by project mutations.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// No live project with this id.
    #[error("project not found: {0}")]
    NotFound(u64),

    /// Field-indexed validation failure (project fields and/or the
    /// `attributes.<index>.<field>` entries from attribute sync).
    #[error("the given data was invalid")]
    Validation(ErrorBag),
}
