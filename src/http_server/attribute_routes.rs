//! Attribute catalog HTTP routes.
//!
//! `POST /attributes` creates an attribute (201); `PATCH /attributes/:id`
//! applies a guarded update (200, or 422 with field-indexed errors when a
//! referential-integrity guard fires).

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{patch, post};
use axum::{Json, Router};

use super::errors::ApiResult;
use super::server::AppState;
use crate::catalog::{AttributeDetail, AttributeDraft, AttributePatch};
use crate::observability::Logger;

/// Routes for the attribute catalog.
pub fn attribute_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/attributes", post(create_attribute))
        .route("/attributes/:id", patch(update_attribute))
        .with_state(state)
}

async fn create_attribute(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<AttributeDraft>,
) -> ApiResult<(StatusCode, Json<AttributeDetail>)> {
    let detail = state.catalog.create_attribute(&draft)?;
    Logger::info(
        "attribute_created",
        &[
            ("id", &detail.attribute.id.to_string()),
            ("name", &detail.attribute.name),
            ("type", detail.attribute.attribute_type.as_str()),
        ],
    );
    Ok((StatusCode::CREATED, Json(detail)))
}

async fn update_attribute(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(patch): Json<AttributePatch>,
) -> ApiResult<Json<AttributeDetail>> {
    let detail = state.catalog.update_attribute(id, &patch)?;
    Logger::info(
        "attribute_updated",
        &[
            ("id", &detail.attribute.id.to_string()),
            ("name", &detail.attribute.name),
        ],
    );
    Ok(Json(detail))
}
