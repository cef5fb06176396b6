//! # diagramhub-service
//!
//! Client-side services for DiagramHub. The [`TreeEngine`] is the single
//! source of truth a file-tree view reads from: it merges the cached item
//! list with locally pending creations, owns expansion, selection, and
//! rename state, and turns user gestures into mutations. The
//! [`DndCoordinator`] layers pointer drags on top of it, and the
//! [`editor`] module debounces content saves.
//!
//! Everything is wired by explicit constructor injection; the
//! [`Workspace`] composition root builds one independent instance per
//! session.

pub mod dnd;
pub mod editor;
pub mod engine;
pub mod notify;
pub mod templates;
pub mod workspace;

#[cfg(test)]
pub(crate) mod testing;

pub use dnd::{DndCoordinator, DropTarget};
pub use editor::{AutoSaveScheduler, DocumentSession};
pub use engine::{ClickModifiers, RecentSort, TreeEngine, UiState};
pub use notify::{Notification, NotificationLevel, Notifier};
pub use templates::DiagramTemplate;
pub use workspace::Workspace;
