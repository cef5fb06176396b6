//! Tree node structure for hierarchical display.

use serde::{Deserialize, Serialize};

use diagramhub_core::ItemId;

use crate::item::Item;

/// Whether a node is a file or a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A diagram document.
    File,
    /// A container of other nodes.
    Folder,
}

/// A node in the item tree.
///
/// Folders always carry `children` (possibly empty); files never do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    /// Item id, or a temporary id for a pending creation.
    pub id: ItemId,
    /// Declared parent id.
    pub parent_id: Option<ItemId>,
    /// Display name.
    pub name: String,
    /// File or folder.
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Child nodes, present only on folders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    /// Project an item into a childless node.
    pub fn from_item(item: &Item) -> Self {
        if item.is_folder {
            Self::folder(item.id.clone(), item.parent_id.clone(), item.name.clone())
        } else {
            Self::file(item.id.clone(), item.parent_id.clone(), item.name.clone())
        }
    }

    /// Build a file node.
    pub fn file(id: ItemId, parent_id: Option<ItemId>, name: impl Into<String>) -> Self {
        Self {
            id,
            parent_id,
            name: name.into(),
            kind: NodeKind::File,
            children: None,
        }
    }

    /// Build an empty folder node.
    pub fn folder(id: ItemId, parent_id: Option<ItemId>, name: impl Into<String>) -> Self {
        Self {
            id,
            parent_id,
            name: name.into(),
            kind: NodeKind::Folder,
            children: Some(Vec::new()),
        }
    }

    /// Whether this node is a folder.
    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    /// Child nodes; empty for files.
    pub fn children(&self) -> &[TreeNode] {
        self.children.as_deref().unwrap_or(&[])
    }
}
