//! Optimistic patches over the flat item list.
//!
//! Each function edits the list the way the server is expected to, so the
//! change is visible before the gateway answers. They never fail: a patch
//! whose target is missing leaves the list untouched.

use chrono::Utc;

use diagramhub_core::ItemId;
use diagramhub_entity::item::validation::ensure_extension;
use diagramhub_entity::item::{CreateItem, Item};
use diagramhub_entity::tree::generate_sibling_copy_name;

/// Name the server will store for an item.
pub fn normalize_name(name: &str, is_folder: bool, extension: &str) -> String {
    let trimmed = name.trim();
    if is_folder {
        trimmed.to_string()
    } else {
        ensure_extension(trimmed, extension)
    }
}

/// Append a placeholder row for a create.
pub fn insert_created(rows: &mut Vec<Item>, temp_id: &ItemId, input: &CreateItem, extension: &str) {
    rows.push(Item {
        id: temp_id.clone(),
        parent_id: input.parent_id.clone(),
        name: normalize_name(&input.name, input.is_folder, extension),
        is_folder: input.is_folder,
        updated_at: Utc::now(),
    });
}

/// Patch an item's name in place.
pub fn rename(rows: &mut [Item], id: &ItemId, new_name: &str, extension: &str) {
    if let Some(row) = rows.iter_mut().find(|r| &r.id == id) {
        row.name = normalize_name(new_name, row.is_folder, extension);
    }
}

/// Patch an item's parent in place.
pub fn reparent(rows: &mut [Item], id: &ItemId, new_parent_id: Option<&ItemId>) {
    if let Some(row) = rows.iter_mut().find(|r| &r.id == id) {
        row.parent_id = new_parent_id.cloned();
    }
}

/// Ids of every transitive child of `id`, found by parent links.
pub fn descendant_ids(rows: &[Item], id: &ItemId) -> Vec<ItemId> {
    let mut found: Vec<ItemId> = Vec::new();
    let mut frontier = vec![id.clone()];
    while let Some(current) = frontier.pop() {
        for row in rows {
            if row.parent_id.as_ref() == Some(&current) && &row.id != id && !found.contains(&row.id) {
                found.push(row.id.clone());
                frontier.push(row.id.clone());
            }
        }
    }
    found
}

/// Remove an item and its whole subtree. Returns how many rows went away.
pub fn remove_subtree(rows: &mut Vec<Item>, id: &ItemId) -> usize {
    let mut doomed = descendant_ids(rows, id);
    doomed.push(id.clone());
    let before = rows.len();
    rows.retain(|r| !doomed.contains(&r.id));
    before - rows.len()
}

/// Append a placeholder copy of a file next to it.
///
/// Folders and unknown ids are left alone.
pub fn insert_duplicate(rows: &mut Vec<Item>, id: &ItemId, temp_id: &ItemId) -> bool {
    let Some(source) = rows.iter().find(|r| &r.id == id && !r.is_folder).cloned() else {
        return false;
    };
    let siblings: Vec<&str> = rows
        .iter()
        .filter(|r| r.parent_id == source.parent_id)
        .map(|r| r.name.as_str())
        .collect();
    let name = generate_sibling_copy_name(&source.name, &siblings);
    rows.push(Item {
        id: temp_id.clone(),
        parent_id: source.parent_id,
        name,
        is_folder: false,
        updated_at: Utc::now(),
    });
    true
}

/// Swap a placeholder row for the server's row.
///
/// When the placeholder is gone the real row is appended, unless it is
/// already present.
pub fn replace_placeholder(rows: &mut Vec<Item>, temp_id: Option<&ItemId>, real: Item) {
    if let Some(temp_id) = temp_id {
        if let Some(slot) = rows.iter_mut().find(|r| &r.id == temp_id) {
            *slot = real;
            return;
        }
    }
    if !rows.iter().any(|r| r.id == real.id) {
        rows.push(real);
    }
}
