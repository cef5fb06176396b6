//! Mutation inputs accepted by the item gateway.

use serde::{Deserialize, Serialize};

use diagramhub_core::ItemId;

/// Data required to create a new item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItem {
    /// Parent folder (None for top level).
    pub parent_id: Option<ItemId>,
    /// Requested name; the server may append the file extension.
    pub name: String,
    /// Whether to create a folder.
    pub is_folder: bool,
}

/// Rename request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameItem {
    /// The new name.
    pub new_name: String,
}

/// Move request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveItem {
    /// Destination folder, or `None` for the top level.
    pub new_parent_id: Option<ItemId>,
}

/// Save-content request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveContent {
    /// Full replacement text.
    pub content: String,
}
