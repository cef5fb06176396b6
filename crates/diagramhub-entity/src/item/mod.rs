//! Item domain entities.

pub mod input;
pub mod model;
pub mod validation;

pub use input::{CreateItem, MoveItem, RenameItem, SaveContent};
pub use model::Item;
