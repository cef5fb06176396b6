//! Content and version models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use diagramhub_core::ItemId;

/// The current text of a file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileContent {
    /// Diagram source text.
    pub content: String,
}

impl FileContent {
    /// Wrap a content string.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// A snapshot of a file's previous content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileVersion {
    /// The file this version belongs to.
    pub item_id: ItemId,
    /// Content as it was before being overwritten.
    pub content: String,
    /// Sequential version number, starting at 1.
    pub version: u32,
    /// When the snapshot was taken.
    pub created_at: DateTime<Utc>,
}
