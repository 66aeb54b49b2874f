//! Entity attribute synchronizer
//!
//! Reconciles an entity's attribute-value rows against a desired set:
//! validate everything first (accumulating all failures into one bag), then
//! apply the whole change atomically. The desired set fully determines the
//! stored set; attribute ids absent from it are deleted.
//!
//! Two entry points share the core: [`Synchronizer::set_attributes`] for
//! programmatic callers (fails with [`InvalidAttributeData`]) and
//! [`Synchronizer::set_attributes_from_request`] for request-shaped input
//! (fails with [`RequestValidationError`]). Same rules, different error
//! surface.

mod errors;

pub use errors::InvalidAttributeData;

use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

use crate::catalog::{refresh_denormalized_columns, AttributeValue};
use crate::store::{Store, Tables};
use crate::validation::{rules_for, ErrorBag, RequestValidationError};

/// One desired attribute-value pair.
///
/// Both fields are optional on the wire so that missing pieces surface as
/// field errors instead of deserialization failures.
#[derive(Debug, Clone, Deserialize)]
pub struct AttributeInput {
    #[serde(default)]
    pub attribute_id: Option<u64>,
    #[serde(default)]
    pub value: Option<Value>,
}

impl AttributeInput {
    pub fn new(attribute_id: u64, value: impl Into<Value>) -> Self {
        Self {
            attribute_id: Some(attribute_id),
            value: Some(value.into()),
        }
    }
}

/// A validated item ready for reconciliation: attribute id plus the
/// canonical text form of its value.
#[derive(Debug, Clone)]
pub struct ValidatedAttribute {
    pub attribute_id: u64,
    pub value: String,
}

/// Synchronizes entity attribute sets against the store.
#[derive(Clone)]
pub struct Synchronizer {
    store: Store,
}

impl Synchronizer {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Validate a desired set without applying it.
    ///
    /// Failures accumulate across all items, keyed `<key>.<index>.<field>`,
    /// so one call reports every invalid item. Rules are resolved from the
    /// current catalog rows, fetched in one batch.
    pub fn validate(
        &self,
        items: &[AttributeInput],
        key: &str,
    ) -> Result<Vec<ValidatedAttribute>, ErrorBag> {
        self.store.read(|tables| validate_items(tables, items, key))
    }

    /// Validate and reconcile an entity's attribute set.
    ///
    /// No optimistic-concurrency guard exists: two concurrent calls against
    /// the same entity serialize on the store lock and the last commit wins
    /// for overlapping attribute ids.
    pub fn set_attributes(
        &self,
        entity_id: u64,
        items: &[AttributeInput],
    ) -> Result<(), InvalidAttributeData> {
        let validated = self
            .validate(items, "attributes")
            .map_err(InvalidAttributeData::new)?;
        self.store
            .transaction(|tables| reconcile(tables, entity_id, &validated));
        Ok(())
    }

    /// Request-shaped variant of [`set_attributes`](Self::set_attributes):
    /// identical rules, but failures use the validation-error convention of
    /// the HTTP surface.
    pub fn set_attributes_from_request(
        &self,
        entity_id: u64,
        items: &[AttributeInput],
    ) -> Result<(), RequestValidationError> {
        let validated = self
            .validate(items, "attributes")
            .map_err(RequestValidationError::new)?;
        self.store
            .transaction(|tables| reconcile(tables, entity_id, &validated));
        Ok(())
    }
}

/// Validation core: structural checks first, then per-type rules against
/// the batch-fetched attribute rows. Never short-circuits.
pub(crate) fn validate_items(
    tables: &Tables,
    items: &[AttributeInput],
    key: &str,
) -> Result<Vec<ValidatedAttribute>, ErrorBag> {
    let mut bag = ErrorBag::new();

    // structural pass: attribute_id must name a live attribute, value must
    // be present
    for (index, item) in items.iter().enumerate() {
        match item.attribute_id {
            None => bag.add(
                format!("{}.{}.attribute_id", key, index),
                format!("The {}.{}.attribute_id field is required.", key, index),
            ),
            Some(id) if tables.attribute(id).is_none() => bag.add(
                format!("{}.{}.attribute_id", key, index),
                format!("The selected {}.{}.attribute_id is invalid.", key, index),
            ),
            Some(_) => {}
        }
        if item.value.is_none() || item.value == Some(Value::Null) {
            bag.add(
                format!("{}.{}.value", key, index),
                format!("The {}.{}.value field is required.", key, index),
            );
        }
    }

    if !bag.is_empty() {
        return Err(bag);
    }

    // type-directed pass: resolve each attribute's rule and validate the
    // value against it, accumulating every failure
    let mut validated = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let attribute_id = item.attribute_id.expect("structural pass");
        let value = item.value.as_ref().expect("structural pass");
        let attribute = tables.attribute(attribute_id).expect("structural pass");

        match rules_for(attribute).validate(value, tables) {
            Ok(canonical) => validated.push(ValidatedAttribute {
                attribute_id,
                value: canonical,
            }),
            Err(message) => {
                // re-key the rule message onto this item's value field
                let message = message.replace(
                    "The value",
                    &format!("The {}.{}.value", key, index),
                );
                let message = message.replace(
                    "The selected value",
                    &format!("The selected {}.{}.value", key, index),
                );
                bag.add(format!("{}.{}.value", key, index), message);
            }
        }
    }

    if bag.is_empty() {
        Ok(validated)
    } else {
        Err(bag)
    }
}

/// Reconciliation core, composable inside a caller's transaction.
///
/// Upserts by (entity, attribute), deletes rows absent from the desired set,
/// then refreshes the denormalized columns of the survivors from current
/// catalog state.
pub(crate) fn reconcile(tables: &mut Tables, entity_id: u64, desired: &[ValidatedAttribute]) {
    let now = Utc::now();

    for item in desired {
        let existing = tables
            .attribute_values
            .values_mut()
            .find(|row| row.entity_id == entity_id && row.attribute_id == item.attribute_id);

        match existing {
            Some(row) => {
                row.value = item.value.clone();
                row.updated_at = now;
            }
            None => {
                let attribute = tables
                    .attribute(item.attribute_id)
                    .expect("validated against live attributes")
                    .clone();
                let id = tables.attribute_value_ids.next();
                tables.attribute_values.insert(
                    id,
                    AttributeValue {
                        id,
                        attribute_id: item.attribute_id,
                        attribute_name: attribute.name,
                        attribute_type: attribute.attribute_type,
                        entity_id,
                        value: item.value.clone(),
                        value_description: None,
                        created_at: now,
                        updated_at: now,
                    },
                );
            }
        }
    }

    // full-set replacement: anything not in the desired set goes away
    let keep: std::collections::BTreeSet<u64> =
        desired.iter().map(|item| item.attribute_id).collect();
    tables
        .attribute_values
        .retain(|_, row| row.entity_id != entity_id || keep.contains(&row.attribute_id));

    for attribute_id in keep {
        refresh_denormalized_columns(tables, attribute_id);
    }
}
