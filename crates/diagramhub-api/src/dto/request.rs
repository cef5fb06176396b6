//! Request DTOs with validation.
//!
//! Rules delegate to the entity validators so the API rejects exactly what
//! the store would, before the store lock is taken.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use diagramhub_core::{AppError, ItemId};
use diagramhub_entity::item::validation::{validate_content, validate_id, validate_name};
use diagramhub_entity::item::{CreateItem, MoveItem, RenameItem, SaveContent};

/// Create item request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    /// Parent folder, or absent for the top level.
    #[serde(default)]
    #[validate(custom(function = "item_id"))]
    pub parent_id: Option<ItemId>,
    /// Requested name.
    #[validate(custom(function = "item_name"))]
    pub name: String,
    /// Whether to create a folder.
    #[serde(default)]
    pub is_folder: bool,
}

/// Rename request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RenameItemRequest {
    /// The new name.
    #[validate(custom(function = "item_name"))]
    pub new_name: String,
}

/// Move request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MoveItemRequest {
    /// Destination folder; `null` moves to the top level.
    #[serde(default)]
    #[validate(custom(function = "item_id"))]
    pub new_parent_id: Option<ItemId>,
}

/// Save content request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaveContentRequest {
    /// Full replacement text.
    #[validate(custom(function = "content_size"))]
    pub content: String,
}

impl From<CreateItemRequest> for CreateItem {
    fn from(req: CreateItemRequest) -> Self {
        Self {
            parent_id: req.parent_id,
            name: req.name,
            is_folder: req.is_folder,
        }
    }
}

impl From<RenameItemRequest> for RenameItem {
    fn from(req: RenameItemRequest) -> Self {
        Self {
            new_name: req.new_name,
        }
    }
}

impl From<MoveItemRequest> for MoveItem {
    fn from(req: MoveItemRequest) -> Self {
        Self {
            new_parent_id: req.new_parent_id,
        }
    }
}

impl From<SaveContentRequest> for SaveContent {
    fn from(req: SaveContentRequest) -> Self {
        Self {
            content: req.content,
        }
    }
}

fn rule_error(code: &'static str, err: AppError) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Owned(err.message))
}

fn item_name(name: &str) -> Result<(), ValidationError> {
    validate_name(name)
        .map(|_| ())
        .map_err(|e| rule_error("name", e))
}

fn item_id(id: &ItemId) -> Result<(), ValidationError> {
    validate_id(id).map_err(|e| rule_error("id", e))
}

fn content_size(content: &str) -> Result<(), ValidationError> {
    validate_content(content).map_err(|e| rule_error("content", e))
}
