//! Drag-and-drop over the file tree.

pub mod coordinator;

pub use coordinator::{DndCoordinator, DropTarget, ROOT_DROPPABLE_ID};
