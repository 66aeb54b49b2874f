//! Project HTTP routes.
//!
//! The listing endpoint accepts dynamic filters (`filters[<name>]=<value>`
//! or `filters[<name>][<op>]=<value>`); create and update take an optional
//! `attributes` array that replaces the project's full attribute set.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use super::errors::{ApiError, ApiResult};
use super::server::AppState;
use crate::filter::parse_filter_params;
use crate::observability::Logger;
use crate::projects::{ProjectDetail, ProjectDraft, ProjectPatch};

/// Routes for projects.
pub fn project_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route(
            "/projects/:id",
            get(show_project).put(update_project).delete(delete_project),
        )
        .with_state(state)
}

async fn list_projects(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Vec<ProjectDetail>>> {
    let filters = parse_filter_params(&params)?;
    let listed = state.projects.list(&filters)?;
    Ok(Json(listed))
}

async fn create_project(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<ProjectDraft>,
) -> ApiResult<(StatusCode, Json<ProjectDetail>)> {
    let detail = state.projects.create(&draft)?;
    Logger::info(
        "project_created",
        &[
            ("id", &detail.project.id.to_string()),
            ("name", &detail.project.name),
        ],
    );
    Ok((StatusCode::CREATED, Json(detail)))
}

async fn show_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult<Json<ProjectDetail>> {
    state
        .projects
        .show(id)
        .map(Json)
        .ok_or(ApiError::NotFound)
}

async fn update_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(patch): Json<ProjectPatch>,
) -> ApiResult<Json<ProjectDetail>> {
    let detail = state.projects.update(id, &patch)?;
    Logger::info("project_updated", &[("id", &detail.project.id.to_string())]);
    Ok(Json(detail))
}

async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult<StatusCode> {
    if state.projects.delete(id) {
        Logger::info("project_deleted", &[("id", &id.to_string())]);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
