//! File content and version history handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use diagramhub_core::ItemId;
use diagramhub_entity::content::{FileContent, FileVersion};

use crate::dto::request::SaveContentRequest;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/items/{id}/content
pub async fn get_content(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ItemId>,
) -> Result<Json<FileContent>, ApiError> {
    let content = state.store.get_content(auth.user_id(), &id).await?;
    Ok(Json(content))
}

/// PUT /api/items/{id}/content
pub async fn save_content(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ItemId>,
    ValidatedJson(req): ValidatedJson<SaveContentRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .save_content(auth.user_id(), &id, req.into())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/items/{id}/versions
pub async fn list_versions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ItemId>,
) -> Result<Json<Vec<FileVersion>>, ApiError> {
    let versions = state.store.list_versions(auth.user_id(), &id).await?;
    Ok(Json(versions))
}
