//! File content and version history entities.

pub mod model;

pub use model::{FileContent, FileVersion};
