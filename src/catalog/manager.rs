//! Catalog mutations: attribute creation and guarded updates.
//!
//! Updates run two referential-integrity guards before touching anything,
//! both evaluated only when attribute-value rows already reference the
//! attribute:
//!
//! - type-lock: the type cannot change once data exists;
//! - possible-value-lock: a select key referenced by data can neither be
//!   removed nor reassigned to a different possible-value row.
//!
//! Successful mutations refresh the denormalized columns of every
//! referencing attribute-value row inside the same transaction, so readers
//! never observe a renamed attribute with stale cached copies.

use chrono::Utc;

use super::errors::{CatalogError, CatalogResult};
use super::types::{
    Attribute, AttributeDetail, AttributeDraft, AttributePatch, AttributeType, PossibleValue,
    PossibleValueInput,
};
use crate::store::{Store, Tables};
use crate::validation::ErrorBag;

/// Maximum length for attribute names, possible-value keys and labels.
const NAME_MAX_LEN: usize = 255;

/// Manages the attribute catalog.
#[derive(Clone)]
pub struct CatalogManager {
    store: Store,
}

impl CatalogManager {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Create an attribute, with possible values when select-typed.
    ///
    /// Possible values supplied for a non-select type are ignored.
    pub fn create_attribute(&self, draft: &AttributeDraft) -> CatalogResult<AttributeDetail> {
        let mut bag = ErrorBag::new();

        let name = self.store.read(|tables| {
            validate_name(&mut bag, "name", draft.name.as_deref(), tables, None)
        });

        let attribute_type = match draft.attribute_type.as_deref() {
            None | Some("") => {
                bag.add("type", "The type field is required.");
                None
            }
            Some(token) => {
                let parsed = AttributeType::parse(token);
                if parsed.is_none() {
                    bag.add("type", "The selected type is invalid.");
                }
                parsed
            }
        };

        if attribute_type == Some(AttributeType::Select) {
            validate_possible_values(&mut bag, draft.possible_values.as_deref(), true);
        }

        if !bag.is_empty() {
            return Err(CatalogError::Validation(bag));
        }

        let name = name.expect("validated above");
        let attribute_type = attribute_type.expect("validated above");

        Ok(self.store.transaction(|tables| {
            let now = Utc::now();
            let id = tables.attribute_ids.next();
            let attribute = Attribute {
                id,
                name,
                attribute_type,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            };
            tables.attributes.insert(id, attribute.clone());

            let mut possible_values = Vec::new();
            if attribute_type == AttributeType::Select {
                for input in draft.possible_values.as_deref().unwrap_or_default() {
                    let pv_id = tables.possible_value_ids.next();
                    let pv = PossibleValue {
                        id: pv_id,
                        attribute_id: id,
                        key: input.key.clone(),
                        label: input.label.clone(),
                        created_at: now,
                        updated_at: now,
                        deleted_at: None,
                    };
                    tables.possible_values.insert(pv_id, pv.clone());
                    possible_values.push(pv);
                }
            }

            AttributeDetail {
                attribute,
                possible_values,
            }
        }))
    }

    /// Update an attribute's name, type and/or possible values.
    ///
    /// Guard order matches the write path: shape validation first, then the
    /// type-lock and possible-value-lock, then the transactional update plus
    /// denormalization refresh.
    pub fn update_attribute(
        &self,
        id: u64,
        patch: &AttributePatch,
    ) -> CatalogResult<AttributeDetail> {
        let current = self
            .store
            .read(|tables| tables.attribute(id).cloned())
            .ok_or(CatalogError::NotFound(id))?;

        let mut bag = ErrorBag::new();

        let new_name = if let Some(name) = patch.name.as_deref() {
            self.store.read(|tables| {
                validate_name(&mut bag, "name", Some(name), tables, Some(id))
            })
        } else {
            None
        };

        let new_type = match patch.attribute_type.as_deref() {
            None => None,
            Some("") => {
                bag.add("type", "The type field is required.");
                None
            }
            Some(token) => {
                let parsed = AttributeType::parse(token);
                if parsed.is_none() {
                    bag.add("type", "The selected type is invalid.");
                }
                parsed
            }
        };

        let effective_type = new_type.unwrap_or(current.attribute_type);
        if effective_type == AttributeType::Select {
            // possibleValues is mandatory only when the patch itself moves
            // the attribute to select
            let required = new_type == Some(AttributeType::Select)
                && current.attribute_type != AttributeType::Select;
            validate_possible_values(&mut bag, patch.possible_values.as_deref(), required);
        }

        if !bag.is_empty() {
            return Err(CatalogError::Validation(bag));
        }

        self.store.read(|tables| {
            check_integrity_guards(tables, &current, new_type, patch.possible_values.as_deref())
        })?;

        Ok(self.store.transaction(|tables| {
            let now = Utc::now();

            {
                let attribute = tables
                    .attributes
                    .get_mut(&id)
                    .expect("attribute fetched above");
                if let Some(name) = new_name {
                    attribute.name = name;
                }
                if let Some(t) = new_type {
                    attribute.attribute_type = t;
                }
                attribute.updated_at = now;
            }

            if effective_type == AttributeType::Select {
                if let Some(inputs) = patch.possible_values.as_deref() {
                    reconcile_possible_values(tables, id, inputs);
                }
            }

            refresh_denormalized_columns(tables, id);

            let attribute = tables.attributes[&id].clone();
            let possible_values = tables
                .possible_values_of(id)
                .into_iter()
                .cloned()
                .collect();
            AttributeDetail {
                attribute,
                possible_values,
            }
        }))
    }

    /// Fetch one attribute with its possible values.
    pub fn attribute_detail(&self, id: u64) -> Option<AttributeDetail> {
        self.store.read(|tables| {
            let attribute = tables.attribute(id)?.clone();
            let possible_values = tables
                .possible_values_of(id)
                .into_iter()
                .cloned()
                .collect();
            Some(AttributeDetail {
                attribute,
                possible_values,
            })
        })
    }
}

/// Validate an attribute name: required, ≤255 chars, unique among live rows.
/// Returns the accepted name.
fn validate_name(
    bag: &mut ErrorBag,
    field: &str,
    name: Option<&str>,
    tables: &Tables,
    exclude_id: Option<u64>,
) -> Option<String> {
    match name {
        None | Some("") => {
            bag.add(field, format!("The {} field is required.", field));
            None
        }
        Some(s) if s.chars().count() > NAME_MAX_LEN => {
            bag.add(
                field,
                format!(
                    "The {} must not be greater than {} characters.",
                    field, NAME_MAX_LEN
                ),
            );
            None
        }
        Some(s) => {
            let taken = tables
                .attribute_by_name(s)
                .map(|a| Some(a.id) != exclude_id)
                .unwrap_or(false);
            if taken {
                bag.add(field, format!("The {} has already been taken.", field));
                None
            } else {
                Some(s.to_string())
            }
        }
    }
}

/// Validate the shape of a possibleValues list: present when required,
/// non-empty keys and labels within bounds, keys unique within the list.
fn validate_possible_values(
    bag: &mut ErrorBag,
    inputs: Option<&[PossibleValueInput]>,
    required: bool,
) {
    let Some(inputs) = inputs else {
        if required {
            bag.add(
                "possibleValues",
                "The possibleValues field is required when type is select.",
            );
        }
        return;
    };

    if inputs.is_empty() {
        bag.add("possibleValues", "The possibleValues field is required when type is select.");
        return;
    }

    let mut seen = std::collections::BTreeSet::new();
    for (index, input) in inputs.iter().enumerate() {
        if input.key.is_empty() {
            bag.add(
                format!("possibleValues.{}.key", index),
                "The key field is required.",
            );
        } else if input.key.chars().count() > NAME_MAX_LEN {
            bag.add(
                format!("possibleValues.{}.key", index),
                format!("The key must not be greater than {} characters.", NAME_MAX_LEN),
            );
        } else if !seen.insert(input.key.as_str()) {
            bag.add(
                format!("possibleValues.{}.key", index),
                "The key has already been taken.",
            );
        }

        if input.label.is_empty() {
            bag.add(
                format!("possibleValues.{}.value", index),
                "The value field is required.",
            );
        } else if input.label.chars().count() > NAME_MAX_LEN {
            bag.add(
                format!("possibleValues.{}.value", index),
                format!(
                    "The value must not be greater than {} characters.",
                    NAME_MAX_LEN
                ),
            );
        }
    }
}

/// The two referential-integrity guards. Both fire only when data references
/// the attribute.
fn check_integrity_guards(
    tables: &Tables,
    current: &Attribute,
    new_type: Option<AttributeType>,
    possible_values: Option<&[PossibleValueInput]>,
) -> CatalogResult<()> {
    if !tables.attribute_has_data(current.id) {
        return Ok(());
    }

    if let Some(t) = new_type {
        if t != current.attribute_type {
            let mut bag = ErrorBag::new();
            bag.add("type", "Cannot change attribute type as it already has data.");
            return Err(CatalogError::IntegrityViolation(bag));
        }
    }

    if current.attribute_type == AttributeType::Select {
        // A patch without possibleValues still counts: every referenced key
        // would be dropped by the reconcile step, so it is rejected the same
        // way as an explicit removal.
        let patched: std::collections::BTreeMap<&str, &PossibleValueInput> = possible_values
            .unwrap_or_default()
            .iter()
            .map(|input| (input.key.as_str(), input))
            .collect();

        for existing in tables.possible_values_of(current.id) {
            if !tables.attribute_value_exists(current.id, &existing.key) {
                continue;
            }
            let kept = patched
                .get(existing.key.as_str())
                .map(|input| input.id == Some(existing.id))
                .unwrap_or(false);
            if !kept {
                let mut bag = ErrorBag::new();
                bag.add(
                    "possibleValues",
                    format!(
                        "Cannot change the key {} of the possible value as it already has data.",
                        existing.key
                    ),
                );
                return Err(CatalogError::IntegrityViolation(bag));
            }
        }
    }

    Ok(())
}

/// Full-set reconcile of an attribute's possible values: rows whose ids are
/// absent from the patch are soft-deleted, rows with matching ids are
/// updated in place, entries without ids become new rows.
fn reconcile_possible_values(tables: &mut Tables, attribute_id: u64, inputs: &[PossibleValueInput]) {
    let now = Utc::now();
    let keep: std::collections::BTreeSet<u64> =
        inputs.iter().filter_map(|input| input.id).collect();

    for pv in tables.possible_values.values_mut() {
        if pv.attribute_id == attribute_id && pv.deleted_at.is_none() && !keep.contains(&pv.id) {
            pv.deleted_at = Some(now);
        }
    }

    for input in inputs {
        match input.id {
            Some(pv_id) => {
                if let Some(pv) = tables.possible_values.get_mut(&pv_id) {
                    if pv.attribute_id == attribute_id && pv.deleted_at.is_none() {
                        pv.key = input.key.clone();
                        pv.label = input.label.clone();
                        pv.updated_at = now;
                    }
                }
            }
            None => {
                let pv_id = tables.possible_value_ids.next();
                tables.possible_values.insert(
                    pv_id,
                    PossibleValue {
                        id: pv_id,
                        attribute_id,
                        key: input.key.clone(),
                        label: input.label.clone(),
                        created_at: now,
                        updated_at: now,
                        deleted_at: None,
                    },
                );
            }
        }
    }
}

/// Re-derive the cached attribute_name/attribute_type/value_description
/// columns of every attribute-value row referencing this attribute.
///
/// Batch fix-up over correctness: catalog mutations are rare next to entity
/// writes, so recomputing every dependent row keeps the cache logic in one
/// place.
pub(crate) fn refresh_denormalized_columns(tables: &mut Tables, attribute_id: u64) {
    let Some(attribute) = tables.attributes.get(&attribute_id).cloned() else {
        return;
    };

    let descriptions: Vec<(u64, Option<String>)> = tables
        .attribute_values
        .values()
        .filter(|row| row.attribute_id == attribute_id)
        .map(|row| {
            let description = tables
                .possible_value_by_key(attribute_id, &row.value)
                .map(|pv| pv.label.clone());
            (row.id, description)
        })
        .collect();

    for (row_id, description) in descriptions {
        if let Some(row) = tables.attribute_values.get_mut(&row_id) {
            row.attribute_name = attribute.name.clone();
            row.attribute_type = attribute.attribute_type;
            row.value_description = description;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> CatalogManager {
        CatalogManager::new(Store::new())
    }

    fn select_draft(name: &str, pairs: &[(&str, &str)]) -> AttributeDraft {
        AttributeDraft {
            name: Some(name.to_string()),
            attribute_type: Some("select".to_string()),
            possible_values: Some(
                pairs
                    .iter()
                    .map(|(key, label)| PossibleValueInput {
                        id: None,
                        key: key.to_string(),
                        label: label.to_string(),
                    })
                    .collect(),
            ),
        }
    }

    #[test]
    fn test_create_text_attribute() {
        let detail = manager()
            .create_attribute(&AttributeDraft {
                name: Some("department".to_string()),
                attribute_type: Some("text".to_string()),
                possible_values: None,
            })
            .unwrap();

        assert_eq!(detail.attribute.name, "department");
        assert_eq!(detail.attribute.attribute_type, AttributeType::Text);
        assert!(detail.possible_values.is_empty());
    }

    #[test]
    fn test_create_select_attribute_with_values() {
        let detail = manager()
            .create_attribute(&select_draft(
                "priority",
                &[("low", "Low"), ("high", "High")],
            ))
            .unwrap();

        assert_eq!(detail.possible_values.len(), 2);
        assert_eq!(detail.possible_values[0].key, "low");
        assert_eq!(detail.possible_values[0].label, "Low");
        assert_eq!(detail.possible_values[0].attribute_id, detail.attribute.id);
    }

    #[test]
    fn test_create_rejects_unknown_type() {
        let err = manager()
            .create_attribute(&AttributeDraft {
                name: Some("tags".to_string()),
                attribute_type: Some("multiselect".to_string()),
                possible_values: None,
            })
            .unwrap_err();

        match err {
            CatalogError::Validation(bag) => {
                assert_eq!(bag.get("type").unwrap(), ["The selected type is invalid."]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_create_select_requires_possible_values() {
        let err = manager()
            .create_attribute(&AttributeDraft {
                name: Some("priority".to_string()),
                attribute_type: Some("select".to_string()),
                possible_values: None,
            })
            .unwrap_err();

        match err {
            CatalogError::Validation(bag) => assert!(bag.has("possibleValues")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_create_rejects_duplicate_keys() {
        let err = manager()
            .create_attribute(&select_draft("priority", &[("low", "Low"), ("low", "Low 2")]))
            .unwrap_err();

        match err {
            CatalogError::Validation(bag) => assert!(bag.has("possibleValues.1.key")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_create_rejects_duplicate_name() {
        let manager = manager();
        manager
            .create_attribute(&AttributeDraft {
                name: Some("budget".to_string()),
                attribute_type: Some("number".to_string()),
                possible_values: None,
            })
            .unwrap();

        let err = manager
            .create_attribute(&AttributeDraft {
                name: Some("budget".to_string()),
                attribute_type: Some("text".to_string()),
                possible_values: None,
            })
            .unwrap_err();

        match err {
            CatalogError::Validation(bag) => assert!(bag.has("name")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_update_without_data_changes_type_freely() {
        let manager = manager();
        let detail = manager
            .create_attribute(&AttributeDraft {
                name: Some("budget".to_string()),
                attribute_type: Some("text".to_string()),
                possible_values: None,
            })
            .unwrap();

        let updated = manager
            .update_attribute(
                detail.attribute.id,
                &AttributePatch {
                    attribute_type: Some("number".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.attribute.attribute_type, AttributeType::Number);
    }

    #[test]
    fn test_update_unknown_attribute() {
        let err = manager()
            .update_attribute(99, &AttributePatch::default())
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(99)));
    }

    #[test]
    fn test_update_removes_absent_possible_values() {
        let manager = manager();
        let detail = manager
            .create_attribute(&select_draft(
                "priority",
                &[("low", "Low"), ("high", "High")],
            ))
            .unwrap();
        let low = detail.possible_values[0].clone();

        // keep "low" by id, drop "high", add "urgent"
        let updated = manager
            .update_attribute(
                detail.attribute.id,
                &AttributePatch {
                    possible_values: Some(vec![
                        PossibleValueInput {
                            id: Some(low.id),
                            key: "low".to_string(),
                            label: "Low".to_string(),
                        },
                        PossibleValueInput {
                            id: None,
                            key: "urgent".to_string(),
                            label: "Urgent".to_string(),
                        },
                    ]),
                    ..Default::default()
                },
            )
            .unwrap();

        let keys: Vec<&str> = updated
            .possible_values
            .iter()
            .map(|pv| pv.key.as_str())
            .collect();
        assert_eq!(keys, ["low", "urgent"]);
    }
}
