//! Project entity types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::AttributeValue;
use crate::sync::AttributeInput;

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Inactive,
    Completed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Inactive => "inactive",
            ProjectStatus::Completed => "completed",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "active" => Some(ProjectStatus::Active),
            "inactive" => Some(ProjectStatus::Inactive),
            "completed" => Some(ProjectStatus::Completed),
            _ => None,
        }
    }

    pub fn all_tokens() -> [&'static str; 3] {
        ["active", "inactive", "completed"]
    }
}

/// A project row: the entity kind that attribute values attach to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Project {
    /// The columns dynamic filters may target directly. Filter keys outside
    /// this set resolve against catalog attribute names instead.
    pub const FILLABLE: [&'static str; 2] = ["name", "status"];
}

/// A project with its attribute-value rows embedded, as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub attributes: Vec<AttributeValue>,
}

/// Input shape for project creation. Raw strings are validated into the
/// typed fields so failures surface as field errors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectDraft {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub attributes: Option<Vec<AttributeInput>>,
}

/// Input shape for project update; fields are validated only when present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub attributes: Option<Vec<AttributeInput>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_tokens_round_trip() {
        for token in ProjectStatus::all_tokens() {
            assert_eq!(ProjectStatus::parse(token).unwrap().as_str(), token);
        }
        assert!(ProjectStatus::parse("archived").is_none());
    }

    #[test]
    fn test_fillable_covers_filterable_columns() {
        assert!(Project::FILLABLE.contains(&"name"));
        assert!(Project::FILLABLE.contains(&"status"));
        assert!(!Project::FILLABLE.contains(&"id"));
    }
}
