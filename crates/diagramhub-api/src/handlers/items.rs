//! Item CRUD handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use diagramhub_core::ItemId;
use diagramhub_entity::item::Item;

use crate::dto::request::{CreateItemRequest, MoveItemRequest, RenameItemRequest};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/items
pub async fn list_items(State(state): State<AppState>, auth: AuthUser) -> Json<Vec<Item>> {
    Json(state.store.list_items(auth.user_id()).await)
}

/// POST /api/items
pub async fn create_item(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateItemRequest>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let item = state.store.create_item(auth.user_id(), req.into()).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// PATCH /api/items/{id}
pub async fn rename_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ItemId>,
    ValidatedJson(req): ValidatedJson<RenameItemRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .rename_item(auth.user_id(), &id, req.into())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/items/{id}/move
pub async fn move_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ItemId>,
    ValidatedJson(req): ValidatedJson<MoveItemRequest>,
) -> Result<StatusCode, ApiError> {
    state.store.move_item(auth.user_id(), &id, req.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/items/{id}
pub async fn delete_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ItemId>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_item(auth.user_id(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/items/{id}/duplicate
pub async fn duplicate_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ItemId>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let item = state.store.duplicate_item(auth.user_id(), &id).await?;
    Ok((StatusCode::CREATED, Json(item)))
}
