//! Click-driven selection state machine.

use diagramhub_core::ItemId;
use diagramhub_entity::tree::TreeNode;

use super::ui_state::UiState;

/// Modifier keys held during a click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickModifiers {
    /// Platform modifier (Cmd on macOS, Ctrl elsewhere).
    pub meta: bool,
    /// Shift.
    pub shift: bool,
}

impl ClickModifiers {
    /// No modifiers.
    pub fn plain() -> Self {
        Self::default()
    }

    /// Platform modifier held.
    pub fn meta() -> Self {
        Self {
            meta: true,
            shift: false,
        }
    }

    /// Shift held.
    pub fn shift() -> Self {
        Self {
            meta: false,
            shift: true,
        }
    }

    /// Whether the click should navigate. Modifier clicks only select.
    pub fn navigates(&self) -> bool {
        !self.meta && !self.shift
    }
}

/// Apply a click on `id` to the selection.
///
/// `visible` is the flattened visible order ranges are taken over.
pub fn apply_click(ui: &mut UiState, visible: &[&TreeNode], id: &ItemId, mods: ClickModifiers) {
    if ui.is_editing() {
        ui.select_only(id);
        return;
    }

    if mods.shift {
        if let Some(anchor) = ui.last_clicked_id.clone() {
            if let Some(range) = visible_range(visible, &anchor, id) {
                ui.selected_ids = range.into_iter().collect();
                ui.selected_id = Some(id.clone());
                return;
            }
        }
    }

    if mods.meta {
        if !ui.selected_ids.remove(id) {
            ui.selected_ids.insert(id.clone());
        }
        if ui.selected_ids.contains(id) {
            ui.selected_id = Some(id.clone());
        } else if !ui.selected_id.as_ref().is_some_and(|p| ui.selected_ids.contains(p)) {
            // The primary must stay inside the set.
            ui.selected_id = ui.selected_ids.iter().min().cloned();
        }
        ui.last_clicked_id = Some(id.clone());
        return;
    }

    ui.select_only(id);
}

/// Ids between `from` and `to` inclusive, in visible order.
fn visible_range(visible: &[&TreeNode], from: &ItemId, to: &ItemId) -> Option<Vec<ItemId>> {
    let start = visible.iter().position(|n| &n.id == from)?;
    let end = visible.iter().position(|n| &n.id == to)?;
    let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
    Some(visible[lo..=hi].iter().map(|n| n.id.clone()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn nodes(ids: &[&str]) -> Vec<TreeNode> {
        ids.iter()
            .map(|id| TreeNode::file(ItemId::new(*id), None, format!("{id}.mmd")))
            .collect()
    }

    fn set(ids: &[&str]) -> HashSet<ItemId> {
        ids.iter().map(|id| ItemId::new(*id)).collect()
    }

    #[test]
    fn test_shift_range_either_direction() {
        let tree = nodes(&["a", "b", "c", "d", "e"]);
        let visible: Vec<&TreeNode> = tree.iter().collect();

        let mut ui = UiState::default();
        apply_click(&mut ui, &visible, &ItemId::new("b"), ClickModifiers::plain());
        apply_click(&mut ui, &visible, &ItemId::new("d"), ClickModifiers::shift());
        assert_eq!(ui.selected_ids, set(&["b", "c", "d"]));
        assert_eq!(ui.last_clicked_id, Some(ItemId::new("b")));

        let mut ui = UiState::default();
        apply_click(&mut ui, &visible, &ItemId::new("d"), ClickModifiers::plain());
        apply_click(&mut ui, &visible, &ItemId::new("b"), ClickModifiers::shift());
        assert_eq!(ui.selected_ids, set(&["b", "c", "d"]));
    }

    #[test]
    fn test_shift_without_anchor_is_plain() {
        let tree = nodes(&["a", "b"]);
        let visible: Vec<&TreeNode> = tree.iter().collect();
        let mut ui = UiState::default();
        apply_click(&mut ui, &visible, &ItemId::new("b"), ClickModifiers::shift());
        assert_eq!(ui.selected_ids, set(&["b"]));
        assert_eq!(ui.last_clicked_id, Some(ItemId::new("b")));
    }

    #[test]
    fn test_meta_toggles_membership() {
        let tree = nodes(&["a", "b", "c"]);
        let visible: Vec<&TreeNode> = tree.iter().collect();
        let mut ui = UiState::default();

        apply_click(&mut ui, &visible, &ItemId::new("a"), ClickModifiers::plain());
        apply_click(&mut ui, &visible, &ItemId::new("c"), ClickModifiers::meta());
        assert_eq!(ui.selected_ids, set(&["a", "c"]));
        assert_eq!(ui.selected_id, Some(ItemId::new("c")));
        assert_eq!(ui.last_clicked_id, Some(ItemId::new("c")));

        apply_click(&mut ui, &visible, &ItemId::new("c"), ClickModifiers::meta());
        assert_eq!(ui.selected_ids, set(&["a"]));
        assert_eq!(ui.selected_id, Some(ItemId::new("a")));
        assert_eq!(ui.last_clicked_id, Some(ItemId::new("c")));

        apply_click(&mut ui, &visible, &ItemId::new("a"), ClickModifiers::meta());
        assert!(ui.selected_ids.is_empty());
        assert_eq!(ui.selected_id, None);
    }

    #[test]
    fn test_meta_deselect_keeps_primary_inside_set() {
        let tree = nodes(&["a", "b", "c"]);
        let visible: Vec<&TreeNode> = tree.iter().collect();
        let mut ui = UiState::default();

        apply_click(&mut ui, &visible, &ItemId::new("a"), ClickModifiers::plain());
        apply_click(&mut ui, &visible, &ItemId::new("b"), ClickModifiers::meta());
        apply_click(&mut ui, &visible, &ItemId::new("c"), ClickModifiers::meta());
        assert_eq!(ui.selected_id, Some(ItemId::new("c")));

        apply_click(&mut ui, &visible, &ItemId::new("b"), ClickModifiers::meta());
        assert_eq!(ui.selected_ids, set(&["a", "c"]));
        assert_eq!(ui.selected_id, Some(ItemId::new("c")));

        apply_click(&mut ui, &visible, &ItemId::new("c"), ClickModifiers::meta());
        assert_eq!(ui.selected_ids, set(&["a"]));
        assert_eq!(ui.selected_id, Some(ItemId::new("a")));
    }

    #[test]
    fn test_click_while_renaming_is_single_select() {
        let tree = nodes(&["a", "b", "c"]);
        let visible: Vec<&TreeNode> = tree.iter().collect();
        let mut ui = UiState::default();
        apply_click(&mut ui, &visible, &ItemId::new("a"), ClickModifiers::plain());
        ui.renaming_id = Some(ItemId::new("a"));

        apply_click(&mut ui, &visible, &ItemId::new("c"), ClickModifiers::shift());
        assert_eq!(ui.selected_ids, set(&["c"]));
        assert_eq!(ui.selected_id, Some(ItemId::new("c")));
    }

    #[test]
    fn test_modifier_clicks_do_not_navigate() {
        assert!(ClickModifiers::plain().navigates());
        assert!(!ClickModifiers::meta().navigates());
        assert!(!ClickModifiers::shift().navigates());
    }
}
