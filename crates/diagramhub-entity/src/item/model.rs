//! Item entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use diagramhub_core::ItemId;

/// A persisted file or folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique item identifier.
    pub id: ItemId,
    /// Containing folder, or `None` at the top level.
    pub parent_id: Option<ItemId>,
    /// Display name. File names carry the workspace extension.
    pub name: String,
    /// Whether this item is a folder.
    pub is_folder: bool,
    /// When the item was last created, renamed, or moved.
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Check if this item sits at the top level.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Check if this item is a file.
    pub fn is_file(&self) -> bool {
        !self.is_folder
    }
}
