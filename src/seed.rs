//! Demo data seeding.
//!
//! Populates the in-process store with a starter attribute catalog and a
//! couple of projects so the API is explorable right after `start --seed`.

use serde_json::json;

use crate::catalog::{AttributeDraft, CatalogManager, PossibleValueInput};
use crate::projects::{ProjectDraft, ProjectService};
use crate::store::Store;
use crate::sync::AttributeInput;

/// Seed the demo catalog and sample projects.
///
/// Only meant for empty stores; seeding twice would fail on duplicate
/// attribute names.
pub fn run(store: &Store) {
    let catalog = CatalogManager::new(store.clone());
    let projects = ProjectService::new(store.clone());

    let mut ids = Vec::new();
    for (name, attribute_type, possible_values) in [
        ("start_date", "date", None),
        ("end_date", "date", None),
        ("department", "text", None),
        (
            "priority",
            "select",
            Some(vec![("low", "Low"), ("medium", "Medium"), ("high", "High")]),
        ),
        ("budget", "number", None),
    ] {
        let detail = catalog
            .create_attribute(&AttributeDraft {
                name: Some(name.to_string()),
                attribute_type: Some(attribute_type.to_string()),
                possible_values: possible_values.map(|pairs| {
                    pairs
                        .into_iter()
                        .map(|(key, label)| PossibleValueInput {
                            id: None,
                            key: key.to_string(),
                            label: label.to_string(),
                        })
                        .collect()
                }),
            })
            .expect("seed catalog is valid");
        ids.push(detail.attribute.id);
    }

    let &[start_date, _, department, priority, budget] = &ids[..] else {
        unreachable!("five attributes seeded");
    };

    projects
        .create(&ProjectDraft {
            name: Some("Website Relaunch".to_string()),
            status: Some("active".to_string()),
            attributes: Some(vec![
                AttributeInput::new(start_date, json!("2025-03-01")),
                AttributeInput::new(department, json!("Marketing")),
                AttributeInput::new(priority, json!("high")),
                AttributeInput::new(budget, json!("25000")),
            ]),
        })
        .expect("seed project is valid");

    projects
        .create(&ProjectDraft {
            name: Some("Timesheet Migration".to_string()),
            status: Some("inactive".to_string()),
            attributes: Some(vec![
                AttributeInput::new(priority, json!("low")),
                AttributeInput::new(budget, json!("4000")),
            ]),
        })
        .expect("seed project is valid");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    #[test]
    fn test_seed_populates_catalog_and_projects() {
        let store = Store::new();
        run(&store);

        store.read(|tables| {
            assert_eq!(tables.attributes.len(), 5);
            assert_eq!(tables.live_projects().len(), 2);
        });

        // seeded data passes through the filter engine
        let projects = ProjectService::new(store.clone());
        let filters: Map<String, serde_json::Value> =
            serde_json::from_str(r#"{"priority": "high"}"#).unwrap();
        let listed = projects.list(&filters).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].project.name, "Website Relaunch");
    }
}
