//! Filter compilation and evaluation.
//!
//! Takes the untrusted name → spec mapping and turns each entry into a safe
//! query condition. Names are resolved against an explicit allow-list: the
//! project's fillable columns first, then the catalog's attribute names.
//! Nothing is ever interpolated; conditions carry validated parts only.

use serde_json::{Map, Value};

use super::errors::{FilterError, FilterResult};
use super::operator::FilterOperator;
use crate::projects::Project;
use crate::store::Tables;

/// A compiled, safe filter condition. The conjunction of all conditions
/// forms the listing predicate; there is no OR and no nesting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryCondition {
    /// Direct comparison on a fillable entity column.
    Column {
        column: String,
        operator: FilterOperator,
        value: String,
    },
    /// Subquery condition: the entity has an attribute-value row whose
    /// cached attribute name matches and whose raw value compares true.
    AttributeValue {
        attribute_name: String,
        operator: FilterOperator,
        value: String,
    },
}

impl QueryCondition {
    /// Evaluate this condition for one project.
    pub fn matches(&self, tables: &Tables, project: &Project) -> bool {
        match self {
            QueryCondition::Column {
                column,
                operator,
                value,
            } => {
                let field = match column.as_str() {
                    "name" => project.name.as_str(),
                    "status" => project.status.as_str(),
                    // columns are allow-listed at compile time
                    _ => return false,
                };
                operator.compare(field, value)
            }
            QueryCondition::AttributeValue {
                attribute_name,
                operator,
                value,
            } => tables.values_for_entity(project.id).iter().any(|row| {
                row.attribute_name == *attribute_name && operator.compare(&row.value, value)
            }),
        }
    }
}

/// Compile a filters mapping into query conditions.
///
/// Each spec is either a literal string (implied equality) or a single-entry
/// `{operator: value}` map. Anything else is rejected, as are unknown
/// operators, non-string values and unresolvable keys.
pub fn compile(tables: &Tables, filters: &Map<String, Value>) -> FilterResult<Vec<QueryCondition>> {
    let mut conditions = Vec::with_capacity(filters.len());

    for (key, spec) in filters {
        let (operator_token, value) = match spec {
            // literal value implies equality
            Value::String(s) => ("=".to_string(), Value::String(s.clone())),
            Value::Object(map) => {
                if map.len() != 1 {
                    return Err(FilterError::InvalidSpec);
                }
                let (op, v) = map.iter().next().expect("len checked");
                (op.clone(), v.clone())
            }
            // non-string literals never reach the equality shortcut
            _ => return Err(FilterError::InvalidValue(key.clone())),
        };

        let operator = FilterOperator::parse(&operator_token)
            .ok_or_else(|| FilterError::InvalidOperator(key.clone()))?;

        let value = match value {
            Value::String(s) => s,
            _ => return Err(FilterError::InvalidValue(key.clone())),
        };

        if Project::FILLABLE.iter().any(|column| *column == key.as_str()) {
            conditions.push(QueryCondition::Column {
                column: key.clone(),
                operator,
                value,
            });
        } else if tables.attribute_by_name(key).is_some() {
            conditions.push(QueryCondition::AttributeValue {
                attribute_name: key.clone(),
                operator,
                value,
            });
        } else {
            return Err(FilterError::UnknownKey(key.clone()));
        }
    }

    Ok(conditions)
}
