//! The tree state engine.

pub mod selection;
pub mod tree_engine;
pub mod ui_state;


pub use selection::ClickModifiers;
pub use tree_engine::{RecentSort, TreeEngine};
pub use ui_state::UiState;
