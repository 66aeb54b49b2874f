//! Type-directed validation
//!
//! Maps each attribute type onto a validation rule and collects failures into
//! field-indexed error bags. Rules are resolved from catalog state at
//! validation time; caller-supplied type strings are never trusted.

mod errors;
mod rules;

pub use errors::{ErrorBag, RequestValidationError};
pub use rules::{rules_for, ValidationRule, DATE_FORMAT, TEXT_MAX_LEN};
