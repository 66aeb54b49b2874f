//! API error mapping.
//!
//! Domain errors cross the HTTP boundary here and nowhere else. Validation
//! failures of every flavor (request validation, programmatic attribute
//! data, referential-integrity guards) surface as 422 with a field-indexed
//! `errors` object; filter rejections are 422 with a message; unknown
//! resources are 404.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::filter::FilterError;
use crate::projects::ProjectError;
use crate::sync::InvalidAttributeData;
use crate::validation::{ErrorBag, RequestValidationError};

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced by the HTTP layer.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Field-indexed validation failure (422).
    #[error("The given data was invalid.")]
    Validation(ErrorBag),

    /// Filter compiler rejection (422).
    #[error("{0}")]
    Filter(#[from] FilterError),

    /// Resource not found (404).
    #[error("Resource not found.")]
    NotFound,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Filter(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(bag) | CatalogError::IntegrityViolation(bag) => {
                ApiError::Validation(bag)
            }
            CatalogError::NotFound(_) => ApiError::NotFound,
        }
    }
}

impl From<ProjectError> for ApiError {
    fn from(err: ProjectError) -> Self {
        match err {
            ProjectError::Validation(bag) => ApiError::Validation(bag),
            ProjectError::NotFound(_) => ApiError::NotFound,
        }
    }
}

impl From<RequestValidationError> for ApiError {
    fn from(err: RequestValidationError) -> Self {
        ApiError::Validation(err.errors)
    }
}

impl From<InvalidAttributeData> for ApiError {
    fn from(err: InvalidAttributeData) -> Self {
        ApiError::Validation(err.errors)
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ErrorBag>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();
        let errors = match self {
            ApiError::Validation(bag) => Some(bag),
            _ => None,
        };
        (status, Json(ErrorResponse { message, errors })).into_response()
    }
}
