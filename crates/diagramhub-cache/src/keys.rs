//! Cache key builders.

use diagramhub_core::ItemId;

/// Prefix applied to all DiagramHub cache keys.
const PREFIX: &str = "items";

/// Key of the item list query.
pub fn item_list() -> String {
    format!("{PREFIX}:list")
}

/// Key of a file's content.
pub fn content(item_id: &ItemId) -> String {
    format!("{PREFIX}:content:{item_id}")
}
