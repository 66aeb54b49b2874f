//! Per-type validation rules.
//!
//! Each attribute type maps to exactly one rule; select rules close over the
//! attribute id so membership is checked against the catalog's current
//! possible values, never against caller-supplied state.

use chrono::NaiveDate;
use serde_json::Value;

use crate::catalog::{Attribute, AttributeType};
use crate::store::Tables;

/// Maximum length of a text attribute value.
pub const TEXT_MAX_LEN: usize = 255;

/// Date format accepted by date attributes.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The rule an attribute value must satisfy, derived from the attribute's
/// type at validation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationRule {
    /// Required, string, at most 255 characters.
    Text,
    /// Required, numeric (a JSON number or a string that parses as one).
    Number,
    /// Required, a string in YYYY-MM-DD format.
    Date,
    /// Required, the key of a live possible value of this attribute.
    Select { attribute_id: u64 },
}

/// Resolve the rule for an attribute.
///
/// Pure: the catalog row decides, not the caller. Select rules carry the
/// attribute id so membership re-reads the possible-value table when applied.
pub fn rules_for(attribute: &Attribute) -> ValidationRule {
    match attribute.attribute_type {
        AttributeType::Text => ValidationRule::Text,
        AttributeType::Number => ValidationRule::Number,
        AttributeType::Date => ValidationRule::Date,
        AttributeType::Select => ValidationRule::Select {
            attribute_id: attribute.id,
        },
    }
}

impl ValidationRule {
    /// Apply the rule to a raw value.
    ///
    /// Returns the canonical text stored in the attribute-value row, or a
    /// message describing the failure. `tables` is consulted only by select
    /// rules, for key membership.
    pub fn validate(&self, value: &Value, tables: &Tables) -> Result<String, String> {
        if value.is_null() {
            return Err("The value field is required.".to_string());
        }

        match self {
            ValidationRule::Text => match value.as_str() {
                Some(s) if s.is_empty() => Err("The value field is required.".to_string()),
                Some(s) if s.chars().count() > TEXT_MAX_LEN => Err(format!(
                    "The value must not be greater than {} characters.",
                    TEXT_MAX_LEN
                )),
                Some(s) => Ok(s.to_string()),
                None => Err("The value must be a string.".to_string()),
            },
            ValidationRule::Number => match value {
                Value::Number(n) => Ok(n.to_string()),
                Value::String(s) if !s.is_empty() && s.trim().parse::<f64>().is_ok() => {
                    Ok(s.clone())
                }
                Value::String(s) if s.is_empty() => {
                    Err("The value field is required.".to_string())
                }
                _ => Err("The value must be a number.".to_string()),
            },
            ValidationRule::Date => match value.as_str() {
                Some(s) if s.is_empty() => Err("The value field is required.".to_string()),
                Some(s) if NaiveDate::parse_from_str(s, DATE_FORMAT).is_ok() => Ok(s.to_string()),
                Some(_) => Err("The value does not match the format Y-m-d.".to_string()),
                None => Err("The value does not match the format Y-m-d.".to_string()),
            },
            ValidationRule::Select { attribute_id } => match value.as_str() {
                Some(s) if s.is_empty() => Err("The value field is required.".to_string()),
                Some(s) if tables.possible_value_by_key(*attribute_id, s).is_some() => {
                    Ok(s.to_string())
                }
                _ => Err("The selected value is invalid.".to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PossibleValue;
    use chrono::Utc;
    use serde_json::json;

    fn attribute(id: u64, attribute_type: AttributeType) -> Attribute {
        let now = Utc::now();
        Attribute {
            id,
            name: format!("attr-{}", id),
            attribute_type,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn tables_with_priority_keys() -> Tables {
        let mut tables = Tables::default();
        let now = Utc::now();
        for (key, label, deleted) in [
            ("low", "Low", false),
            ("medium", "Medium", false),
            ("retired", "Retired", true),
        ] {
            let id = tables.possible_value_ids.next();
            tables.possible_values.insert(
                id,
                PossibleValue {
                    id,
                    attribute_id: 7,
                    key: key.to_string(),
                    label: label.to_string(),
                    created_at: now,
                    updated_at: now,
                    deleted_at: deleted.then(Utc::now),
                },
            );
        }
        tables
    }

    #[test]
    fn test_rules_for_each_type() {
        assert_eq!(
            rules_for(&attribute(1, AttributeType::Text)),
            ValidationRule::Text
        );
        assert_eq!(
            rules_for(&attribute(1, AttributeType::Number)),
            ValidationRule::Number
        );
        assert_eq!(
            rules_for(&attribute(1, AttributeType::Date)),
            ValidationRule::Date
        );
        assert_eq!(
            rules_for(&attribute(9, AttributeType::Select)),
            ValidationRule::Select { attribute_id: 9 }
        );
    }

    #[test]
    fn test_text_rule() {
        let tables = Tables::default();
        assert_eq!(
            ValidationRule::Text.validate(&json!("hello"), &tables),
            Ok("hello".to_string())
        );
        assert!(ValidationRule::Text.validate(&json!(""), &tables).is_err());
        assert!(ValidationRule::Text.validate(&json!(42), &tables).is_err());
        assert!(ValidationRule::Text
            .validate(&json!("x".repeat(256)), &tables)
            .is_err());
        assert!(ValidationRule::Text
            .validate(&json!("x".repeat(255)), &tables)
            .is_ok());
    }

    #[test]
    fn test_number_rule() {
        let tables = Tables::default();
        assert_eq!(
            ValidationRule::Number.validate(&json!("1000"), &tables),
            Ok("1000".to_string())
        );
        assert_eq!(
            ValidationRule::Number.validate(&json!(12.5), &tables),
            Ok("12.5".to_string())
        );
        assert!(ValidationRule::Number
            .validate(&json!("12abc"), &tables)
            .is_err());
        assert!(ValidationRule::Number
            .validate(&json!(true), &tables)
            .is_err());
    }

    #[test]
    fn test_date_rule() {
        let tables = Tables::default();
        assert_eq!(
            ValidationRule::Date.validate(&json!("2025-02-24"), &tables),
            Ok("2025-02-24".to_string())
        );
        assert!(ValidationRule::Date
            .validate(&json!("24-02-2025"), &tables)
            .is_err());
        assert!(ValidationRule::Date
            .validate(&json!("2025-13-01"), &tables)
            .is_err());
        assert!(ValidationRule::Date.validate(&json!(20250224), &tables).is_err());
    }

    #[test]
    fn test_select_rule_checks_live_keys_only() {
        let tables = tables_with_priority_keys();
        let rule = ValidationRule::Select { attribute_id: 7 };

        assert_eq!(rule.validate(&json!("low"), &tables), Ok("low".to_string()));
        assert!(rule.validate(&json!("high"), &tables).is_err());
        // soft-deleted keys do not validate
        assert!(rule.validate(&json!("retired"), &tables).is_err());
        // keys belong to their attribute
        let other = ValidationRule::Select { attribute_id: 8 };
        assert!(other.validate(&json!("low"), &tables).is_err());
    }

    #[test]
    fn test_null_is_required_for_every_rule() {
        let tables = Tables::default();
        for rule in [
            ValidationRule::Text,
            ValidationRule::Number,
            ValidationRule::Date,
            ValidationRule::Select { attribute_id: 1 },
        ] {
            let err = rule.validate(&Value::Null, &tables).unwrap_err();
            assert_eq!(err, "The value field is required.");
        }
    }
}
