//! Editing support: debounced content saves and open documents.

pub mod autosave;
pub mod document;

pub use autosave::AutoSaveScheduler;
pub use document::DocumentSession;
