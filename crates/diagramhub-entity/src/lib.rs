//! # diagramhub-entity
//!
//! Domain models for DiagramHub. [`item`] and [`content`] are the records
//! the server owns; [`tree`] is the nested projection the client derives
//! from them, together with the pure functions that build and query it.

pub mod content;
pub mod item;
pub mod tree;
