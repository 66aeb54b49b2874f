//! Dynamic filter compiler
//!
//! Parses user-supplied filter expressions against entity columns and/or
//! catalog attribute names and translates each into a safe query condition.
//! Keys resolve through an explicit allow-list (the entity's fillable
//! columns plus the catalog's attribute names); operators come from a fixed
//! set; everything else is rejected. Conditions are AND-only.

mod compiler;
mod errors;
mod operator;
mod parser;

pub use compiler::{compile, QueryCondition};
pub use errors::{FilterError, FilterResult};
pub use operator::FilterOperator;
pub use parser::parse_filter_params;
