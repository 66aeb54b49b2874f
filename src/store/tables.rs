//! Table definitions and row lookups.
//!
//! Rows are kept in `BTreeMap`s keyed by id so iteration order is
//! deterministic. Lookup helpers skip soft-deleted rows; callers that need
//! deleted rows (none do today) would go through the maps directly.

use std::collections::BTreeMap;

use crate::catalog::{Attribute, AttributeValue, PossibleValue};
use crate::projects::Project;

/// Monotonic id sequence, mirroring an auto-increment primary key.
#[derive(Debug, Clone, Default)]
pub struct Sequence(u64);

impl Sequence {
    /// Allocate the next id. Ids start at 1.
    pub fn next(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }
}

/// The full table set. One instance lives behind the store's lock.
#[derive(Default)]
pub struct Tables {
    pub attributes: BTreeMap<u64, Attribute>,
    pub possible_values: BTreeMap<u64, PossibleValue>,
    pub attribute_values: BTreeMap<u64, AttributeValue>,
    pub projects: BTreeMap<u64, Project>,

    pub attribute_ids: Sequence,
    pub possible_value_ids: Sequence,
    pub attribute_value_ids: Sequence,
    pub project_ids: Sequence,
}

impl Tables {
    /// Fetch a live (non-deleted) attribute by id.
    pub fn attribute(&self, id: u64) -> Option<&Attribute> {
        self.attributes.get(&id).filter(|a| a.deleted_at.is_none())
    }

    /// Fetch a live attribute by its display name.
    pub fn attribute_by_name(&self, name: &str) -> Option<&Attribute> {
        self.attributes
            .values()
            .find(|a| a.deleted_at.is_none() && a.name == name)
    }

    /// All live possible values owned by an attribute, in id order.
    pub fn possible_values_of(&self, attribute_id: u64) -> Vec<&PossibleValue> {
        self.possible_values
            .values()
            .filter(|pv| pv.deleted_at.is_none() && pv.attribute_id == attribute_id)
            .collect()
    }

    /// Find the live possible value of an attribute with the given key.
    pub fn possible_value_by_key(&self, attribute_id: u64, key: &str) -> Option<&PossibleValue> {
        self.possible_values
            .values()
            .find(|pv| pv.deleted_at.is_none() && pv.attribute_id == attribute_id && pv.key == key)
    }

    /// All attribute-value rows belonging to an entity, in id order.
    pub fn values_for_entity(&self, entity_id: u64) -> Vec<&AttributeValue> {
        self.attribute_values
            .values()
            .filter(|v| v.entity_id == entity_id)
            .collect()
    }

    /// The attribute-value row for one (entity, attribute) pair, if any.
    pub fn value_for(&self, entity_id: u64, attribute_id: u64) -> Option<&AttributeValue> {
        self.attribute_values
            .values()
            .find(|v| v.entity_id == entity_id && v.attribute_id == attribute_id)
    }

    /// Whether any attribute-value row references this attribute.
    pub fn attribute_has_data(&self, attribute_id: u64) -> bool {
        self.attribute_values
            .values()
            .any(|v| v.attribute_id == attribute_id)
    }

    /// Whether any attribute-value row of this attribute stores the given raw value.
    pub fn attribute_value_exists(&self, attribute_id: u64, value: &str) -> bool {
        self.attribute_values
            .values()
            .any(|v| v.attribute_id == attribute_id && v.value == value)
    }

    /// Fetch a live project by id.
    pub fn project(&self, id: u64) -> Option<&Project> {
        self.projects.get(&id).filter(|p| p.deleted_at.is_none())
    }

    /// All live projects, in id order.
    pub fn live_projects(&self) -> Vec<&Project> {
        self.projects
            .values()
            .filter(|p| p.deleted_at.is_none())
            .collect()
    }
}
