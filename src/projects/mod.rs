//! Projects
//!
//! The entity kind attribute values attach to. Create/update take an
//! optional desired attribute set; listing runs through the dynamic filter
//! compiler.

mod errors;
mod model;
mod service;

pub use errors::{ProjectError, ProjectResult};
pub use model::{Project, ProjectDetail, ProjectDraft, ProjectPatch, ProjectStatus};
pub use service::ProjectService;
