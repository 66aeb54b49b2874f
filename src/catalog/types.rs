//! Catalog row types.
//!
//! `Attribute` and `PossibleValue` form the catalog; `AttributeValue` is the
//! denormalized fact row attaching a validated value to an entity. The cached
//! `attribute_name`/`attribute_type`/`value_description` columns on
//! `AttributeValue` are copies of catalog state, refreshed inside every
//! catalog mutation and every attribute-set reconciliation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The closed set of attribute types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    /// Free text, at most 255 characters
    Text,
    /// Numeric value (stored as its literal text)
    Number,
    /// Calendar date in YYYY-MM-DD format
    Date,
    /// One of the attribute's enumerated possible values
    Select,
}

impl AttributeType {
    /// Returns the type name used on the wire and in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeType::Text => "text",
            AttributeType::Number => "number",
            AttributeType::Date => "date",
            AttributeType::Select => "select",
        }
    }

    /// Parse a wire token into a type. Unknown tokens are a validation
    /// error, not a panic: drafts carry the raw string until validated.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "text" => Some(AttributeType::Text),
            "number" => Some(AttributeType::Number),
            "date" => Some(AttributeType::Date),
            "select" => Some(AttributeType::Select),
            _ => None,
        }
    }

    /// All accepted type tokens, for error messages.
    pub fn all_tokens() -> [&'static str; 4] {
        ["text", "number", "date", "select"]
    }
}

/// A runtime-defined attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    pub id: u64,
    /// Unique display label; doubles as the filter key for this attribute.
    pub name: String,
    #[serde(rename = "type")]
    pub attribute_type: AttributeType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// An enumerated value of a select-typed attribute.
///
/// `key` is the stable machine token stored in attribute-value rows; `label`
/// is the human-readable text (serialized as `value`, matching the wire
/// shape of the attributes API).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PossibleValue {
    pub id: u64,
    pub attribute_id: u64,
    pub key: String,
    #[serde(rename = "value")]
    pub label: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// The denormalized fact row: one per (entity, attribute) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeValue {
    pub id: u64,
    pub attribute_id: u64,
    /// Cached copy of the owning attribute's name.
    pub attribute_name: String,
    /// Cached copy of the owning attribute's type.
    pub attribute_type: AttributeType,
    /// Weak reference to the owning entity instance (currently a project id).
    pub entity_id: u64,
    /// Raw value, stored as text and interpreted per attribute type.
    pub value: String,
    /// Cached label of the matching possible value; select-typed only.
    pub value_description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An attribute together with its possible values, as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct AttributeDetail {
    #[serde(flatten)]
    pub attribute: Attribute,
    #[serde(rename = "possibleValues")]
    pub possible_values: Vec<PossibleValue>,
}

/// Input shape for one possible value on create/update.
///
/// `id` is present when the caller is editing an existing row; absent ids
/// mean a new row is created.
#[derive(Debug, Clone, Deserialize)]
pub struct PossibleValueInput {
    #[serde(default)]
    pub id: Option<u64>,
    pub key: String,
    #[serde(rename = "value")]
    pub label: String,
}

/// Input shape for attribute creation.
///
/// `attribute_type` stays a raw string until validated so that unknown types
/// surface as a field error rather than a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct AttributeDraft {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub attribute_type: Option<String>,
    #[serde(rename = "possibleValues", default)]
    pub possible_values: Option<Vec<PossibleValueInput>>,
}

/// Input shape for attribute update; every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttributePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub attribute_type: Option<String>,
    #[serde(rename = "possibleValues", default)]
    pub possible_values: Option<Vec<PossibleValueInput>>,
}
