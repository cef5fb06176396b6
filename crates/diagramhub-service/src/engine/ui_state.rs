//! Ephemeral per-view state: expansion, selection, and edit markers.

use std::collections::HashSet;

use diagramhub_core::ItemId;

/// UI-only state of one tree view. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    /// Folders whose children are shown.
    pub expanded_ids: HashSet<ItemId>,
    /// Primary selection.
    pub selected_id: Option<ItemId>,
    /// Full selection; contains `selected_id` when that is set.
    pub selected_ids: HashSet<ItemId>,
    /// Anchor of shift-click ranges.
    pub last_clicked_id: Option<ItemId>,
    /// The one item whose name is being edited.
    pub renaming_id: Option<ItemId>,
    /// Pending items still waiting for a name.
    pub creating_ids: HashSet<ItemId>,
}

impl UiState {
    /// Rewrite every field through `f`. Returning `None` drops the id.
    ///
    /// Every id-bearing field is listed here and nowhere else, so remapping
    /// and forgetting can never miss one.
    fn map_ids(&mut self, f: impl Fn(&ItemId) -> Option<ItemId>) {
        let map_set = |set: &HashSet<ItemId>| set.iter().filter_map(&f).collect::<HashSet<_>>();
        self.expanded_ids = map_set(&self.expanded_ids);
        self.selected_ids = map_set(&self.selected_ids);
        self.creating_ids = map_set(&self.creating_ids);
        self.selected_id = self.selected_id.as_ref().and_then(&f);
        self.last_clicked_id = self.last_clicked_id.as_ref().and_then(&f);
        self.renaming_id = self.renaming_id.as_ref().and_then(&f);
    }

    /// Replace `from` with `to` everywhere it appears.
    pub fn remap_id(&mut self, from: &ItemId, to: &ItemId) {
        self.map_ids(|id| Some(if id == from { to.clone() } else { id.clone() }));
    }

    /// Remove `target` from every field.
    pub fn forget_id(&mut self, target: &ItemId) {
        self.map_ids(|id| (id != target).then(|| id.clone()));
    }

    /// Collapse the selection to exactly `id` and move the anchor there.
    pub fn select_only(&mut self, id: &ItemId) {
        self.selected_ids = HashSet::from([id.clone()]);
        self.selected_id = Some(id.clone());
        self.last_clicked_id = Some(id.clone());
    }

    /// Drop the selection and the anchor.
    pub fn clear_selection(&mut self) {
        self.selected_ids.clear();
        self.selected_id = None;
        self.last_clicked_id = None;
    }

    /// Whether a rename or a creation is in progress.
    pub fn is_editing(&self) -> bool {
        self.renaming_id.is_some() || !self.creating_ids.is_empty()
    }
}
