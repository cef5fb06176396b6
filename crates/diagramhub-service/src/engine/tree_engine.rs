//! The tree state engine.
//!
//! [`TreeEngine`] reads the authoritative item list from a
//! [`MutationCache`], keeps its own list of pending creations, and owns
//! the [`UiState`]. The tree it exposes is rebuilt from
//! `(rows, pending)` after every change and is never edited in place;
//! views hold on to an `Arc` snapshot and never see a half-applied change.
//!
//! Gesture methods return as soon as the optimistic state is in place.
//! Gateway results arrive later through [`TreeEngine::process_events`],
//! [`TreeEngine::next_event`], or [`TreeEngine::settle`]; failures are
//! published on the [`Notifier`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info};

use diagramhub_cache::optimistic::normalize_name;
use diagramhub_cache::{
    CacheUpdate, ContentCache, Mutation, MutationCache, MutationOutcome, MutationTicket, Settlement,
};
use diagramhub_core::config::WorkspaceConfig;
use diagramhub_core::{AppError, AppResult, ItemId};
use diagramhub_entity::item::validation::{ensure_extension, validate_name};
use diagramhub_entity::item::{CreateItem, Item};
use diagramhub_entity::tree::{self, TreeNode};

use super::selection::{ClickModifiers, apply_click};
use super::ui_state::UiState;
use crate::notify::Notifier;
use crate::templates::DiagramTemplate;

/// Ordering of the recent-files list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecentSort {
    /// Most recently updated first.
    #[default]
    Modified,
    /// Alphabetical, case-insensitive.
    Name,
}

/// Single source of truth for one file-tree view.
#[derive(Debug)]
pub struct TreeEngine {
    cache: MutationCache,
    pending: Vec<TreeNode>,
    ui: UiState,
    tree: Arc<Vec<TreeNode>>,
    config: WorkspaceConfig,
    notifier: Notifier,
    /// Temporary ids whose create or duplicate is in flight.
    committing: HashSet<ItemId>,
    /// Creates issued from a template, by ticket.
    template_creates: HashMap<MutationTicket, DiagramTemplate>,
}

impl TreeEngine {
    /// Create an engine over `cache`. Call [`load`](Self::load) to fetch.
    pub fn new(cache: MutationCache, config: WorkspaceConfig, notifier: Notifier) -> Self {
        let mut engine = Self {
            cache,
            pending: Vec::new(),
            ui: UiState::default(),
            tree: Arc::new(Vec::new()),
            config,
            notifier,
            committing: HashSet::new(),
            template_creates: HashMap::new(),
        };
        engine.rebuild();
        engine
    }

    /// Request the item list.
    pub fn load(&mut self) {
        self.cache.fetch();
    }

    // ── Reads ───────────────────────────────────────────────────────

    /// The merged tree: authoritative rows plus pending creations.
    pub fn items(&self) -> &[TreeNode] {
        &self.tree
    }

    /// A shared handle to the current tree.
    pub fn snapshot(&self) -> Arc<Vec<TreeNode>> {
        Arc::clone(&self.tree)
    }

    /// The flat list as last synced, including optimistic patches.
    pub fn rows(&self) -> &[Item] {
        self.cache.rows()
    }

    /// Creations still waiting for a name.
    pub fn pending(&self) -> &[TreeNode] {
        &self.pending
    }

    /// Current UI state.
    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    /// Whether the first list is still loading.
    pub fn is_loading(&self) -> bool {
        self.cache.is_loading()
    }

    /// Whether any request is outstanding.
    pub fn is_busy(&self) -> bool {
        self.cache.is_busy()
    }

    /// Naming and URL conventions.
    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    /// Where failures are published.
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// The content cache shared with editors.
    pub fn content(&self) -> &ContentCache {
        self.cache.content()
    }

    pub fn find_by_id(&self, id: &ItemId) -> Option<&TreeNode> {
        tree::find_by_id(&self.tree, id)
    }

    /// Resolve a page URL such as `/files/designs/flow` to a node.
    pub fn find_by_path(&self, path: &str) -> Option<&TreeNode> {
        let prefix = self.config.url_prefix.trim_end_matches('/');
        let rest = match path.strip_prefix(prefix) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
            _ => path,
        };
        let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
        tree::resolve_by_slug_path(&self.tree, &segments, &self.config.file_extension)
    }

    /// Page URL of a node.
    pub fn url_path(&self, id: &ItemId) -> Option<String> {
        tree::url_path_for(
            &self.tree,
            id,
            &self.config.url_prefix,
            &self.config.file_extension,
        )
    }

    /// Nodes from the root down to `id`, for breadcrumbs.
    pub fn breadcrumb_path(&self, id: &ItemId) -> Vec<&TreeNode> {
        tree::path_to(&self.tree, id)
    }

    pub fn is_expanded(&self, id: &ItemId) -> bool {
        self.ui.expanded_ids.contains(id)
    }

    pub fn is_selected(&self, id: &ItemId) -> bool {
        self.ui.selected_ids.contains(id)
    }

    pub fn is_renaming(&self, id: &ItemId) -> bool {
        self.ui.renaming_id.as_ref() == Some(id)
    }

    pub fn is_creating(&self, id: &ItemId) -> bool {
        self.ui.creating_ids.contains(id)
    }

    /// Whether more than one item is selected.
    pub fn is_multi_selected(&self) -> bool {
        self.ui.selected_ids.len() > 1
    }

    /// The primary selection, if it is in the tree.
    pub fn selected_item(&self) -> Option<&TreeNode> {
        self.ui
            .selected_id
            .as_ref()
            .and_then(|id| tree::find_by_id(&self.tree, id))
    }

    /// Nodes currently on screen, in display order.
    pub fn visible_nodes(&self) -> Vec<&TreeNode> {
        tree::flatten_visible(&self.tree, &self.ui.expanded_ids)
    }

    /// Destinations offered by the move dialog.
    ///
    /// `None` is the top level and always comes first. Folders that are
    /// selected, lie under a selected item, or are not yet persisted are
    /// left out.
    pub fn valid_move_targets(&self) -> Vec<Option<&TreeNode>> {
        let selected = &self.ui.selected_ids;
        let folders = tree::collect_folders(&self.tree).into_iter().filter(|folder| {
            !selected.contains(&folder.id)
                && !self.is_unpersisted(&folder.id)
                && !selected
                    .iter()
                    .any(|s| tree::is_descendant(&self.tree, s, &folder.id))
        });
        std::iter::once(None).chain(folders.map(Some)).collect()
    }

    /// File rows for the recent-files page.
    pub fn recent_files(&self, sort: RecentSort) -> Vec<&Item> {
        let mut files: Vec<&Item> = self.cache.rows().iter().filter(|r| r.is_file()).collect();
        match sort {
            RecentSort::Modified => files.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
            RecentSort::Name => files.sort_by_cached_key(|r| r.name.to_lowercase()),
        }
        files
    }

    // ── Expansion ───────────────────────────────────────────────────

    /// Show or hide a folder's children. Unknown ids are ignored.
    pub fn toggle_expanded(&mut self, id: &ItemId) {
        if tree::find_by_id(&self.tree, id).is_none() {
            return;
        }
        if !self.ui.expanded_ids.remove(id) {
            self.ui.expanded_ids.insert(id.clone());
        }
    }

    /// Expand every folder above `id`.
    pub fn expand_to(&mut self, id: &ItemId) {
        self.ui
            .expanded_ids
            .extend(tree::ancestor_ids_of(&self.tree, id));
    }

    pub fn collapse_all(&mut self) {
        self.ui.expanded_ids.clear();
    }

    // ── Selection ───────────────────────────────────────────────────

    /// Apply a click on `id`.
    ///
    /// Returns the URL to navigate to for a plain click on a file. Modifier
    /// clicks only select and never navigate.
    pub fn handle_item_click(&mut self, id: &ItemId, modifiers: ClickModifiers) -> Option<String> {
        let snapshot = Arc::clone(&self.tree);
        let node = tree::find_by_id(&snapshot, id)?;
        let visible = tree::flatten_visible(&snapshot, &self.ui.expanded_ids);
        apply_click(&mut self.ui, &visible, id, modifiers);

        if modifiers.navigates() && !node.is_folder() {
            self.url_path(id)
        } else {
            None
        }
    }

    pub fn clear_selection(&mut self) {
        self.ui.clear_selection();
    }

    /// Collapse the selection to `id`, or clear it.
    pub fn set_selected_id(&mut self, id: Option<&ItemId>) {
        match id {
            Some(id) => self.ui.select_only(id),
            None => self.ui.clear_selection(),
        }
    }

    /// Select `id` and unfold its folders, as when its page is opened.
    pub fn reveal(&mut self, id: &ItemId) {
        self.set_selected_id(Some(id));
        self.expand_to(id);
    }

    /// Right-click keeps a multi-selection that already contains `id`.
    pub fn select_for_context_menu(&mut self, id: &ItemId) {
        if !self.ui.selected_ids.contains(id) {
            self.ui.select_only(id);
        }
    }

    // ── Renaming ────────────────────────────────────────────────────

    /// Put `id` in rename mode. A creation still waiting for its name is
    /// aborted, as only one name input is open at a time.
    pub fn start_renaming(&mut self, id: &ItemId) {
        if tree::find_by_id(&self.tree, id).is_none() {
            return;
        }
        let stale: Vec<ItemId> = self.ui.creating_ids.iter().filter(|c| *c != id).cloned().collect();
        for temp in &stale {
            self.abort_create(temp);
        }
        self.ui.renaming_id = Some(id.clone());
    }

    /// Leave rename mode. Cancelling the name of a pending item aborts it.
    pub fn cancel_renaming(&mut self) {
        if let Some(id) = self.ui.renaming_id.take() {
            if self.ui.creating_ids.contains(&id) {
                self.abort_create(&id);
            }
        }
    }

    /// Commit a new name.
    ///
    /// For a pending item this confirms the creation. An unchanged name
    /// leaves rename mode without a request and returns `Ok(None)`.
    pub fn finish_renaming(&mut self, id: &ItemId, new_name: &str) -> AppResult<Option<MutationTicket>> {
        if self.ui.creating_ids.contains(id) {
            return self.confirm_create(id, new_name).map(Some);
        }

        let name = validate_name(new_name)?;
        let Some(node) = tree::find_by_id(&self.tree, id) else {
            return Err(AppError::item_not_found());
        };
        if self.committing.contains(id) {
            return Err(AppError::validation("Item is still being saved"));
        }
        let unchanged = normalize_name(&name, node.is_folder(), &self.config.file_extension) == node.name;

        if self.ui.renaming_id.as_ref() == Some(id) {
            self.ui.renaming_id = None;
        }
        if unchanged {
            return Ok(None);
        }

        let ticket = self.cache.mutate(Mutation::Rename {
            id: id.clone(),
            new_name: name,
        });
        debug!(ticket = %ticket, item_id = %id, "Rename dispatched");
        self.rebuild();
        Ok(Some(ticket))
    }

    // ── Creation ────────────────────────────────────────────────────

    /// Add a pending file under `parent_id` and start naming it.
    pub fn create_file(&mut self, parent_id: Option<&ItemId>, name: Option<&str>) -> ItemId {
        let name = match name {
            Some(name) => name.to_string(),
            None => ensure_extension(&self.config.default_file_name, &self.config.file_extension),
        };
        self.begin_create(TreeNode::file(ItemId::generate(), parent_id.cloned(), name))
    }

    /// Add a pending folder under `parent_id`, expand the parent, and start
    /// naming it.
    pub fn create_folder(&mut self, parent_id: Option<&ItemId>, name: Option<&str>) -> ItemId {
        let name = name.map_or_else(|| self.config.default_folder_name.clone(), str::to_string);
        let id = self.begin_create(TreeNode::folder(ItemId::generate(), parent_id.cloned(), name));
        if let Some(parent) = parent_id {
            self.ui.expanded_ids.insert(parent.clone());
        }
        id
    }

    fn begin_create(&mut self, node: TreeNode) -> ItemId {
        let previous: Vec<ItemId> = self.ui.creating_ids.iter().cloned().collect();
        for id in &previous {
            self.abort_create(id);
        }

        let id = node.id.clone();
        debug!(temp_id = %id, folder = node.is_folder(), "Pending item added");
        self.pending.push(node);
        self.ui.creating_ids.insert(id.clone());
        self.ui.renaming_id = Some(id.clone());
        self.rebuild();
        id
    }

    /// Persist a pending item under `name`.
    ///
    /// The pending row is dropped before the create is dispatched; the
    /// cache shows the placeholder row from then on. UI references to the
    /// temporary id move to the real id when the create settles.
    pub fn confirm_create(&mut self, temp_id: &ItemId, name: &str) -> AppResult<MutationTicket> {
        let name = validate_name(name)?;
        let Some(pos) = self.pending.iter().position(|p| &p.id == temp_id) else {
            return Err(AppError::item_not_found());
        };
        if self.pending[pos].parent_id.as_ref().is_some_and(|parent| self.committing.contains(parent)) {
            return Err(AppError::validation("Parent folder is still being saved"));
        }

        let node = self.pending.remove(pos);
        let is_folder = node.is_folder();
        self.ui.creating_ids.remove(temp_id);
        if self.ui.renaming_id.as_ref() == Some(temp_id) {
            self.ui.renaming_id = None;
        }

        let input = CreateItem {
            parent_id: node.parent_id,
            name,
            is_folder,
        };
        self.committing.insert(temp_id.clone());
        let ticket = self.cache.mutate(Mutation::Create {
            input,
            temp_id: Some(temp_id.clone()),
        });
        debug!(ticket = %ticket, temp_id = %temp_id, "Create dispatched");
        self.rebuild();
        Ok(ticket)
    }

    /// Drop a pending item without contacting the gateway.
    pub fn abort_create(&mut self, temp_id: &ItemId) {
        if !self.ui.creating_ids.contains(temp_id) {
            return;
        }
        self.pending.retain(|p| &p.id != temp_id);
        self.ui.forget_id(temp_id);
        debug!(temp_id = %temp_id, "Pending item aborted");
        self.rebuild();
    }

    /// Create a root file from a template.
    ///
    /// When the create succeeds the new file is selected and, unless the
    /// template is blank, its content is saved.
    pub fn create_from_template(&mut self, template: &DiagramTemplate) -> MutationTicket {
        let name = if template.is_blank() {
            self.config.default_file_name.clone()
        } else {
            template.name.to_string()
        };
        let temp_id = ItemId::generate();
        let ticket = self.cache.mutate(Mutation::Create {
            input: CreateItem {
                parent_id: None,
                name,
                is_folder: false,
            },
            temp_id: Some(temp_id.clone()),
        });
        self.committing.insert(temp_id);
        self.template_creates.insert(ticket, *template);
        debug!(ticket = %ticket, template = template.id, "Create from template dispatched");
        self.rebuild();
        ticket
    }

    // ── Structural mutations ────────────────────────────────────────

    /// Delete `id` and its subtree.
    ///
    /// UI references to every removed id are cleared before the request is
    /// sent. Deleting a pending item aborts it instead.
    pub fn delete_item(&mut self, id: &ItemId) -> Option<MutationTicket> {
        if self.ui.creating_ids.contains(id) {
            self.abort_create(id);
            return None;
        }
        if self.committing.contains(id) {
            debug!(item_id = %id, "Delete ignored for unsaved item");
            return None;
        }
        let doomed = subtree_ids(tree::find_by_id(&self.tree, id)?);

        for gone in &doomed {
            self.ui.forget_id(gone);
        }
        self.pending.retain(|p| !doomed.contains(&p.id));

        let ticket = self.cache.mutate(Mutation::Delete { id: id.clone() });
        debug!(ticket = %ticket, item_id = %id, removed = doomed.len(), "Delete dispatched");
        self.rebuild();
        Some(ticket)
    }

    /// Delete every selected item, one request per item.
    ///
    /// Items under another selected item go away with it and get no
    /// request of their own.
    pub fn delete_selected_items(&mut self) -> Vec<MutationTicket> {
        let selected = self.sorted_selection();
        let tops: Vec<ItemId> = selected
            .iter()
            .filter(|id| {
                !selected
                    .iter()
                    .any(|other| other != *id && tree::is_descendant(&self.tree, other, id))
            })
            .cloned()
            .collect();
        tops.iter().filter_map(|id| self.delete_item(id)).collect()
    }

    /// Reparent `id` under `new_parent_id` (`None` is the top level).
    ///
    /// Refused without a request when the target is the item itself, lies
    /// under it, is not a folder, or either side is not persisted yet.
    pub fn move_item(&mut self, id: &ItemId, new_parent_id: Option<&ItemId>) -> Option<MutationTicket> {
        if !self.can_move(id, new_parent_id) {
            debug!(item_id = %id, target = ?new_parent_id, "Move refused");
            return None;
        }

        if let Some(parent) = new_parent_id {
            self.ui.expanded_ids.insert(parent.clone());
        }
        let ticket = self.cache.mutate(Mutation::Move {
            id: id.clone(),
            new_parent_id: new_parent_id.cloned(),
        });
        debug!(ticket = %ticket, item_id = %id, "Move dispatched");
        self.rebuild();
        Some(ticket)
    }

    /// Move every selected item. Disallowed members are skipped.
    pub fn move_selected_items(&mut self, new_parent_id: Option<&ItemId>) -> Vec<MutationTicket> {
        let movable: Vec<ItemId> = self
            .sorted_selection()
            .into_iter()
            .filter(|id| !self.is_located_at(id, new_parent_id))
            .collect();
        movable
            .iter()
            .filter_map(|id| self.move_item(id, new_parent_id))
            .collect()
    }

    /// Copy a file next to itself. Folders are not duplicable.
    pub fn duplicate_item(&mut self, id: &ItemId) -> Option<MutationTicket> {
        if self.is_unpersisted(id) {
            return None;
        }
        if tree::find_by_id(&self.tree, id)?.is_folder() {
            debug!(item_id = %id, "Folders cannot be duplicated");
            return None;
        }

        let temp_id = ItemId::generate();
        self.committing.insert(temp_id.clone());
        let ticket = self.cache.mutate(Mutation::Duplicate {
            id: id.clone(),
            temp_id,
        });
        debug!(ticket = %ticket, item_id = %id, "Duplicate dispatched");
        self.rebuild();
        Some(ticket)
    }

    /// Whether `id` currently sits directly under `parent_id`.
    pub fn is_located_at(&self, id: &ItemId, parent_id: Option<&ItemId>) -> bool {
        tree::find_by_id(&self.tree, id).is_some_and(|node| node.parent_id.as_ref() == parent_id)
    }

    // ── Settlement ──────────────────────────────────────────────────

    /// Apply every gateway result that has already arrived.
    pub fn process_events(&mut self) -> usize {
        let mut applied = 0;
        while let Some(update) = self.cache.try_next_event() {
            self.apply_update(&update);
            applied += 1;
        }
        applied
    }

    /// Wait for the next gateway result and apply it.
    pub async fn next_event(&mut self) -> Option<CacheUpdate> {
        let update = self.cache.next_event().await?;
        self.apply_update(&update);
        Some(update)
    }

    /// Apply results until no request is outstanding.
    pub async fn settle(&mut self) {
        while self.cache.is_busy() {
            if self.next_event().await.is_none() {
                break;
            }
        }
    }

    fn apply_update(&mut self, update: &CacheUpdate) {
        match update {
            CacheUpdate::Fetched | CacheUpdate::FetchDiscarded => {}
            CacheUpdate::FetchFailed(e) => {
                self.notifier
                    .error(format!("Failed to load items: {}", e.message));
            }
            CacheUpdate::Settled(settlement) => self.apply_settlement(settlement),
        }
        self.rebuild();
    }

    fn apply_settlement(&mut self, settlement: &Settlement) {
        let template = self.template_creates.remove(&settlement.ticket);
        let temp_id = match &settlement.mutation {
            Mutation::Create { temp_id, .. } => temp_id.clone(),
            Mutation::Duplicate { temp_id, .. } => Some(temp_id.clone()),
            _ => None,
        };
        if let Some(temp) = &temp_id {
            self.committing.remove(temp);
        }

        match &settlement.result {
            Ok(MutationOutcome::Created(item) | MutationOutcome::Duplicated(item)) => {
                if let Some(temp) = &temp_id {
                    self.ui.remap_id(temp, &item.id);
                    self.reparent_pending(temp, &item.id);
                }
                info!(item_id = %item.id, name = %item.name, "Item created");
                if let Some(template) = template {
                    self.ui.select_only(&item.id);
                    if !template.content.is_empty() {
                        self.cache.mutate(Mutation::SaveContent {
                            id: item.id.clone(),
                            content: template.content.to_string(),
                        });
                    }
                }
            }
            Ok(MutationOutcome::Done) => {}
            Err(e) => {
                if let Some(temp) = &temp_id {
                    self.ui.forget_id(temp);
                    self.drop_pending_under(temp);
                }
                self.notifier.error(format!(
                    "Failed to {}: {}",
                    settlement.mutation.label(),
                    e.message
                ));
            }
        }
    }

    // ── Internals ───────────────────────────────────────────────────

    fn rebuild(&mut self) {
        self.tree = Arc::new(tree::merge_pending(self.cache.rows(), &self.pending));
    }

    /// Point pending children of a just-created folder at its real id.
    fn reparent_pending(&mut self, temp_id: &ItemId, real_id: &ItemId) {
        for node in &mut self.pending {
            if node.parent_id.as_ref() == Some(temp_id) {
                node.parent_id = Some(real_id.clone());
            }
        }
    }

    /// Abort pending items whose parent folder failed to be created.
    fn drop_pending_under(&mut self, temp_id: &ItemId) {
        let orphans: Vec<ItemId> = self
            .pending
            .iter()
            .filter(|node| node.parent_id.as_ref() == Some(temp_id))
            .map(|node| node.id.clone())
            .collect();
        for orphan in &orphans {
            self.pending.retain(|p| &p.id != orphan);
            self.ui.forget_id(orphan);
            debug!(temp_id = %orphan, "Pending item dropped with its parent");
        }
    }

    /// Pending, or persisted under a temporary id whose create is in flight.
    fn is_unpersisted(&self, id: &ItemId) -> bool {
        self.ui.creating_ids.contains(id) || self.committing.contains(id)
    }

    fn can_move(&self, id: &ItemId, new_parent_id: Option<&ItemId>) -> bool {
        if Some(id) == new_parent_id || self.is_unpersisted(id) {
            return false;
        }
        if tree::find_by_id(&self.tree, id).is_none() {
            return false;
        }
        match new_parent_id {
            None => true,
            Some(parent) => {
                !self.is_unpersisted(parent)
                    && tree::find_by_id(&self.tree, parent).is_some_and(TreeNode::is_folder)
                    && !tree::is_descendant(&self.tree, id, parent)
            }
        }
    }

    fn sorted_selection(&self) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = self.ui.selected_ids.iter().cloned().collect();
        ids.sort();
        ids
    }
}

fn subtree_ids(node: &TreeNode) -> HashSet<ItemId> {
    fn walk(node: &TreeNode, out: &mut HashSet<ItemId>) {
        out.insert(node.id.clone());
        for child in node.children() {
            walk(child, out);
        }
    }

    let mut out = HashSet::new();
    walk(node, &mut out);
    out
}
