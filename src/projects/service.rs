//! Project operations: CRUD plus the filtered listing.
//!
//! Create and update accept an optional desired attribute set which is
//! validated up front and reconciled in the same transaction as the project
//! row, so a failing attribute never leaves a half-written project behind.

use chrono::Utc;
use serde_json::{Map, Value};

use super::errors::{ProjectError, ProjectResult};
use super::model::{Project, ProjectDetail, ProjectDraft, ProjectPatch, ProjectStatus};
use crate::filter::{compile, FilterResult};
use crate::store::{Store, Tables};
use crate::sync::{self, AttributeInput, ValidatedAttribute};
use crate::validation::ErrorBag;

/// Maximum length of a project name.
const NAME_MAX_LEN: usize = 255;

/// Service facade over the project table.
#[derive(Clone)]
pub struct ProjectService {
    store: Store,
}

impl ProjectService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Create a project, synchronizing its attribute set when supplied.
    pub fn create(&self, draft: &ProjectDraft) -> ProjectResult<ProjectDetail> {
        let mut bag = ErrorBag::new();
        let name = validate_name(&mut bag, draft.name.as_deref(), true);
        let status = validate_status(&mut bag, draft.status.as_deref(), true);
        if !bag.is_empty() {
            return Err(ProjectError::Validation(bag));
        }

        let attributes = self.validate_attribute_set(draft.attributes.as_deref())?;

        Ok(self.store.transaction(|tables| {
            let now = Utc::now();
            let id = tables.project_ids.next();
            tables.projects.insert(
                id,
                Project {
                    id,
                    name: name.expect("validated above"),
                    status: status.expect("validated above"),
                    created_at: now,
                    updated_at: now,
                    deleted_at: None,
                },
            );

            if let Some(desired) = attributes {
                sync::reconcile(tables, id, &desired);
            }

            detail(tables, id).expect("inserted above")
        }))
    }

    /// Update a project. Supplied fields are validated; an `attributes` list
    /// replaces the full attribute set, while omitting it leaves the
    /// existing rows untouched.
    pub fn update(&self, id: u64, patch: &ProjectPatch) -> ProjectResult<ProjectDetail> {
        self.store
            .read(|tables| tables.project(id).map(|_| ()))
            .ok_or(ProjectError::NotFound(id))?;

        let mut bag = ErrorBag::new();
        let name = validate_name(&mut bag, patch.name.as_deref(), patch.name.is_some());
        let status = validate_status(&mut bag, patch.status.as_deref(), patch.status.is_some());
        if !bag.is_empty() {
            return Err(ProjectError::Validation(bag));
        }

        let attributes = self.validate_attribute_set(patch.attributes.as_deref())?;

        Ok(self.store.transaction(|tables| {
            let now = Utc::now();
            {
                let project = tables.projects.get_mut(&id).expect("checked above");
                if let Some(name) = name {
                    project.name = name;
                }
                if let Some(status) = status {
                    project.status = status;
                }
                project.updated_at = now;
            }

            if let Some(desired) = attributes {
                sync::reconcile(tables, id, &desired);
            }

            detail(tables, id).expect("checked above")
        }))
    }

    /// Fetch one project with its attribute values.
    pub fn show(&self, id: u64) -> Option<ProjectDetail> {
        self.store.read(|tables| detail(tables, id))
    }

    /// List live projects matching the conjunction of the given filters.
    pub fn list(&self, filters: &Map<String, Value>) -> FilterResult<Vec<ProjectDetail>> {
        self.store.read(|tables| {
            let conditions = compile(tables, filters)?;
            Ok(tables
                .live_projects()
                .into_iter()
                .filter(|project| conditions.iter().all(|c| c.matches(tables, project)))
                .map(|project| ProjectDetail {
                    project: project.clone(),
                    attributes: tables
                        .values_for_entity(project.id)
                        .into_iter()
                        .cloned()
                        .collect(),
                })
                .collect())
        })
    }

    /// Soft-delete a project. Returns false when no live row exists.
    pub fn delete(&self, id: u64) -> bool {
        self.store.transaction(|tables| {
            match tables.projects.get_mut(&id).filter(|p| p.deleted_at.is_none()) {
                Some(project) => {
                    project.deleted_at = Some(Utc::now());
                    true
                }
                None => false,
            }
        })
    }

    fn validate_attribute_set(
        &self,
        items: Option<&[AttributeInput]>,
    ) -> ProjectResult<Option<Vec<ValidatedAttribute>>> {
        match items {
            None => Ok(None),
            Some(items) => self
                .store
                .read(|tables| sync::validate_items(tables, items, "attributes"))
                .map(Some)
                .map_err(ProjectError::Validation),
        }
    }
}

fn detail(tables: &Tables, id: u64) -> Option<ProjectDetail> {
    let project = tables.project(id)?.clone();
    let attributes = tables
        .values_for_entity(id)
        .into_iter()
        .cloned()
        .collect();
    Some(ProjectDetail {
        project,
        attributes,
    })
}

fn validate_name(bag: &mut ErrorBag, name: Option<&str>, required: bool) -> Option<String> {
    match name {
        None if !required => None,
        None | Some("") => {
            bag.add("name", "The name field is required.");
            None
        }
        Some(s) if s.chars().count() > NAME_MAX_LEN => {
            bag.add(
                "name",
                format!(
                    "The name must not be greater than {} characters.",
                    NAME_MAX_LEN
                ),
            );
            None
        }
        Some(s) => Some(s.to_string()),
    }
}

fn validate_status(
    bag: &mut ErrorBag,
    status: Option<&str>,
    required: bool,
) -> Option<ProjectStatus> {
    match status {
        None if !required => None,
        None | Some("") => {
            bag.add("status", "The status field is required.");
            None
        }
        Some(token) => {
            let parsed = ProjectStatus::parse(token);
            if parsed.is_none() {
                bag.add("status", "The selected status is invalid.");
            }
            parsed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AttributeDraft, CatalogManager};
    use serde_json::json;

    fn service() -> (Store, ProjectService) {
        let store = Store::new();
        (store.clone(), ProjectService::new(store))
    }

    fn draft(name: &str, status: &str) -> ProjectDraft {
        ProjectDraft {
            name: Some(name.to_string()),
            status: Some(status.to_string()),
            attributes: None,
        }
    }

    #[test]
    fn test_create_and_show() {
        let (_, service) = service();
        let created = service.create(&draft("Apollo", "active")).unwrap();
        assert_eq!(created.project.status, ProjectStatus::Active);

        let shown = service.show(created.project.id).unwrap();
        assert_eq!(shown.project.name, "Apollo");
        assert!(shown.attributes.is_empty());
    }

    #[test]
    fn test_create_rejects_bad_fields() {
        let (_, service) = service();
        let err = service
            .create(&ProjectDraft {
                name: None,
                status: Some("archived".to_string()),
                attributes: None,
            })
            .unwrap_err();

        match err {
            ProjectError::Validation(bag) => {
                assert!(bag.has("name"));
                assert_eq!(bag.get("status").unwrap(), ["The selected status is invalid."]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_create_with_attributes_is_atomic_on_failure() {
        let (store, service) = service();
        let catalog = CatalogManager::new(store.clone());
        let budget = catalog
            .create_attribute(&AttributeDraft {
                name: Some("Budget".to_string()),
                attribute_type: Some("number".to_string()),
                possible_values: None,
            })
            .unwrap();

        let err = service
            .create(&ProjectDraft {
                name: Some("Apollo".to_string()),
                status: Some("active".to_string()),
                attributes: Some(vec![AttributeInput::new(
                    budget.attribute.id,
                    json!("not a number"),
                )]),
            })
            .unwrap_err();

        match err {
            ProjectError::Validation(bag) => assert!(bag.has("attributes.0.value")),
            other => panic!("expected validation error, got {:?}", other),
        }
        // no half-written project row
        assert!(store.read(|t| t.projects.is_empty()));
    }

    #[test]
    fn test_update_without_attributes_keeps_rows() {
        let (store, service) = service();
        let catalog = CatalogManager::new(store.clone());
        let budget = catalog
            .create_attribute(&AttributeDraft {
                name: Some("Budget".to_string()),
                attribute_type: Some("number".to_string()),
                possible_values: None,
            })
            .unwrap();

        let created = service
            .create(&ProjectDraft {
                name: Some("Apollo".to_string()),
                status: Some("active".to_string()),
                attributes: Some(vec![AttributeInput::new(budget.attribute.id, json!("42"))]),
            })
            .unwrap();

        let updated = service
            .update(
                created.project.id,
                &ProjectPatch {
                    status: Some("completed".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.project.status, ProjectStatus::Completed);
        assert_eq!(updated.attributes.len(), 1);
    }

    #[test]
    fn test_update_unknown_project() {
        let (_, service) = service();
        let err = service.update(42, &ProjectPatch::default()).unwrap_err();
        assert!(matches!(err, ProjectError::NotFound(42)));
    }

    #[test]
    fn test_delete_is_soft_and_hides_from_listing() {
        let (store, service) = service();
        let created = service.create(&draft("Apollo", "active")).unwrap();

        assert!(service.delete(created.project.id));
        assert!(!service.delete(created.project.id));
        assert!(service.show(created.project.id).is_none());
        assert!(service.list(&Map::new()).unwrap().is_empty());
        // the row survives for audit, marked deleted
        assert!(store.read(|t| t.projects[&created.project.id].deleted_at.is_some()));
    }

    #[test]
    fn test_list_with_column_filter() {
        let (_, service) = service();
        service.create(&draft("Apollo", "active")).unwrap();
        service.create(&draft("Borealis", "completed")).unwrap();

        let filters = json!({"status": "completed"});
        let listed = service.list(filters.as_object().unwrap()).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].project.name, "Borealis");
    }
}
