//! Attribute catalog
//!
//! Defines attribute metadata (name, type) and, for select-typed attributes,
//! the enumerated set of allowed keyed values. Mutations are guarded against
//! changes that would orphan existing attribute-value data and keep the
//! denormalized caches on attribute-value rows in sync.

mod errors;
mod manager;
mod types;

pub use errors::{CatalogError, CatalogResult};
pub use manager::CatalogManager;
pub(crate) use manager::refresh_denormalized_columns;
pub use types::{
    Attribute, AttributeDetail, AttributeDraft, AttributePatch, AttributeType, AttributeValue,
    PossibleValue, PossibleValueInput,
};
