//! Filter compiler errors.

use thiserror::Error;

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;

/// Rejections raised while parsing or compiling dynamic filters.
///
/// All variants are caller-correctable and surface as 422 responses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The filters parameter is not a map of name to spec.
    #[error("Invalid filters format. Filters should be an array.")]
    InvalidFormat,

    /// A spec is not exactly one operator/value pair.
    #[error("Invalid filter format. Filters should be an array with exactly one element.")]
    InvalidSpec,

    /// Operator outside the allow-list.
    #[error("Invalid operator for filter key: {0}")]
    InvalidOperator(String),

    /// Non-string comparison value.
    #[error("Invalid value for filter key: {0}")]
    InvalidValue(String),

    /// Key resolves to neither an entity column nor a catalog attribute.
    #[error("Invalid filter key: {0}")]
    UnknownKey(String),
}
