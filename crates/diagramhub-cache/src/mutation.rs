//! Mutation requests and their results.

use std::fmt;

use diagramhub_core::{AppError, ItemId};
use diagramhub_entity::item::{CreateItem, Item};

/// A write against the item gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Create an item. With a `temp_id`, a placeholder row is shown at once.
    Create {
        input: CreateItem,
        temp_id: Option<ItemId>,
    },
    /// Rename an item.
    Rename { id: ItemId, new_name: String },
    /// Reparent an item.
    Move {
        id: ItemId,
        new_parent_id: Option<ItemId>,
    },
    /// Delete an item and its subtree.
    Delete { id: ItemId },
    /// Copy a file; the placeholder row uses `temp_id`.
    Duplicate { id: ItemId, temp_id: ItemId },
    /// Replace a file's content.
    SaveContent { id: ItemId, content: String },
}

impl Mutation {
    /// The existing item this mutation acts on. Creates have none.
    pub fn target(&self) -> Option<&ItemId> {
        match self {
            Self::Create { .. } => None,
            Self::Rename { id, .. }
            | Self::Move { id, .. }
            | Self::Delete { id }
            | Self::Duplicate { id, .. }
            | Self::SaveContent { id, .. } => Some(id),
        }
    }

    /// Short verb used in logs and notifications.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Create { input, .. } if input.is_folder => "create folder",
            Self::Create { .. } => "create file",
            Self::Rename { .. } => "rename",
            Self::Move { .. } => "move",
            Self::Delete { .. } => "delete",
            Self::Duplicate { .. } => "duplicate",
            Self::SaveContent { .. } => "save",
        }
    }

    /// Whether settling this mutation invalidates the item list.
    pub fn touches_list(&self) -> bool {
        !matches!(self, Self::SaveContent { .. })
    }
}

/// Handle identifying one issued mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MutationTicket(pub u64);

impl fmt::Display for MutationTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a successful mutation returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The server-assigned row of a created item.
    Created(Item),
    /// The server-assigned row of a copy.
    Duplicated(Item),
    /// Nothing beyond success.
    Done,
}

/// The final result of a mutation, after rollback or row swap.
#[derive(Debug, Clone)]
pub struct Settlement {
    /// The ticket handed out by `mutate`.
    pub ticket: MutationTicket,
    /// The mutation as issued.
    pub mutation: Mutation,
    /// Gateway result.
    pub result: Result<MutationOutcome, AppError>,
}

impl Settlement {
    /// Whether the mutation failed and was rolled back.
    pub fn is_err(&self) -> bool {
        self.result.is_err()
    }
}
