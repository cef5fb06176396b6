//! Pointer drag sessions layered over the [`TreeEngine`].
//!
//! A session runs `drag_start` → `drag_over`* → `drag_end` | `drag_cancel`.
//! Every way out of a session resets it, so nothing leaks into the next
//! gesture. The coordinator stays inert until [`DndCoordinator::mark_ready`]
//! has been called once.

use diagramhub_cache::MutationTicket;
use diagramhub_core::ItemId;
use diagramhub_entity::tree::{self, TreeNode};
use tracing::debug;

use crate::engine::TreeEngine;

/// Droppable id of the top-level drop zone.
pub const ROOT_DROPPABLE_ID: &str = "root-drop-zone";

/// Where a drag was released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// A tree row.
    Item(ItemId),
    /// The top-level drop zone.
    Root,
}

impl DropTarget {
    /// Interpret a droppable id.
    pub fn from_id(id: &str) -> Self {
        if id == ROOT_DROPPABLE_ID {
            Self::Root
        } else {
            Self::Item(ItemId::new(id))
        }
    }
}

/// Drag session state.
#[derive(Debug, Default)]
pub struct DndCoordinator {
    ready: bool,
    active_id: Option<ItemId>,
    over: Option<DropTarget>,
    dragged_ids: Vec<ItemId>,
}

impl DndCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable dragging for the rest of the session.
    pub fn mark_ready(&mut self) {
        self.ready = true;
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// The row under the pointer.
    pub fn active_id(&self) -> Option<&ItemId> {
        self.active_id.as_ref()
    }

    /// The current hover target.
    pub fn over(&self) -> Option<&DropTarget> {
        self.over.as_ref()
    }

    /// Every id carried by the drag.
    pub fn dragged_ids(&self) -> &[ItemId] {
        &self.dragged_ids
    }

    /// Whether `id` is part of the current drag.
    pub fn is_dragging(&self, id: &ItemId) -> bool {
        self.dragged_ids.contains(id)
    }

    /// The node drawn under the pointer.
    pub fn active_item<'a>(&self, engine: &'a TreeEngine) -> Option<&'a TreeNode> {
        self.active_id.as_ref().and_then(|id| engine.find_by_id(id))
    }

    /// Begin dragging `id`.
    ///
    /// Dragging a member of a multi-selection carries the whole selection.
    /// Otherwise the selection collapses to `id`. Returns whether a session
    /// started.
    pub fn drag_start(&mut self, engine: &mut TreeEngine, id: &ItemId) -> bool {
        if !self.ready || engine.find_by_id(id).is_none() {
            return false;
        }

        self.dragged_ids = if engine.is_selected(id) && engine.is_multi_selected() {
            let mut ids: Vec<ItemId> = engine.ui().selected_ids.iter().cloned().collect();
            ids.sort();
            ids
        } else {
            engine.set_selected_id(Some(id));
            vec![id.clone()]
        };
        self.active_id = Some(id.clone());
        self.over = None;
        debug!(item_id = %id, count = self.dragged_ids.len(), "Drag started");
        true
    }

    /// Track the hover target. Never mutates anything.
    pub fn drag_over(&mut self, target: Option<DropTarget>) {
        if self.active_id.is_some() {
            self.over = target;
        }
    }

    /// Release the drag over `target` and move the payload there.
    ///
    /// Members that would land on themselves, inside their own subtree, or
    /// where they already are are skipped; the rest still move. A missing
    /// or unknown target ends the drag like a cancel.
    pub fn drag_end(&mut self, engine: &mut TreeEngine, target: Option<DropTarget>) -> Vec<MutationTicket> {
        let payload = std::mem::take(&mut self.dragged_ids);
        let active = self.active_id.take();
        self.over = None;

        if !self.ready || active.is_none() {
            return Vec::new();
        }
        let Some(destination) = target.and_then(|t| resolve_destination(engine, &t)) else {
            debug!("Drag ended without a valid target");
            return Vec::new();
        };
        let destination = destination.as_ref();

        let movable: Vec<&ItemId> = payload
            .iter()
            .filter(|id| Some(*id) != destination)
            .filter(|id| !destination.is_some_and(|dest| tree::is_descendant(engine.items(), id, dest)))
            .filter(|id| !engine.is_located_at(id, destination))
            .collect();
        debug!(
            dragged = payload.len(),
            moving = movable.len(),
            target = ?destination,
            "Drag ended"
        );
        movable
            .into_iter()
            .filter_map(|id| engine.move_item(id, destination))
            .collect()
    }

    /// Abandon the drag without moving anything.
    pub fn drag_cancel(&mut self) {
        self.active_id = None;
        self.over = None;
        self.dragged_ids.clear();
    }
}

/// Parent id a drop on `target` moves items under. `None` inside is the
/// top level; an outer `None` means the target is unknown.
fn resolve_destination(engine: &TreeEngine, target: &DropTarget) -> Option<Option<ItemId>> {
    match target {
        DropTarget::Root => Some(None),
        DropTarget::Item(id) => {
            let node = engine.find_by_id(id)?;
            if node.is_folder() {
                Some(Some(node.id.clone()))
            } else {
                Some(node.parent_id.clone())
            }
        }
    }
}
