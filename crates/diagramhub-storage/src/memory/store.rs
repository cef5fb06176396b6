//! Reference item store.
//!
//! Holds every owner's items, file contents, and version history behind a
//! single lock, and enforces the server-side rules: ownership scoping,
//! sibling name uniqueness, the file extension, cycle-free moves, cascading
//! deletes, and lazy version snapshots.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;

use diagramhub_core::{AppError, AppResult, ItemId, UserId};
use diagramhub_entity::content::{FileContent, FileVersion};
use diagramhub_entity::item::validation::{
    ensure_extension, validate_content, validate_id, validate_name,
};
use diagramhub_entity::item::{CreateItem, Item, MoveItem, RenameItem, SaveContent};
use diagramhub_entity::tree::generate_sibling_copy_name;

#[derive(Debug, Clone)]
struct StoredItem {
    owner: UserId,
    item: Item,
}

#[derive(Debug, Default)]
struct StoreState {
    items: HashMap<ItemId, StoredItem>,
    contents: HashMap<ItemId, String>,
    versions: HashMap<ItemId, Vec<FileVersion>>,
}

impl StoreState {
    fn owned(&self, owner: UserId, id: &ItemId) -> AppResult<&Item> {
        self.items
            .get(id)
            .filter(|stored| stored.owner == owner)
            .map(|stored| &stored.item)
            .ok_or_else(AppError::item_not_found)
    }

    fn owned_mut(&mut self, owner: UserId, id: &ItemId) -> AppResult<&mut Item> {
        self.items
            .get_mut(id)
            .filter(|stored| stored.owner == owner)
            .map(|stored| &mut stored.item)
            .ok_or_else(AppError::item_not_found)
    }

    fn owned_file(&self, owner: UserId, id: &ItemId) -> AppResult<&Item> {
        let item = self.owned(owner, id)?;
        if item.is_folder {
            return Err(AppError::validation("Folders have no content"));
        }
        Ok(item)
    }

    fn sibling_names(
        &self,
        owner: UserId,
        parent_id: Option<&ItemId>,
        except: Option<&ItemId>,
    ) -> Vec<String> {
        self.items
            .values()
            .filter(|s| s.owner == owner && s.item.parent_id.as_ref() == parent_id)
            .filter(|s| Some(&s.item.id) != except)
            .map(|s| s.item.name.clone())
            .collect()
    }

    fn ensure_unique(
        &self,
        owner: UserId,
        parent_id: Option<&ItemId>,
        name: &str,
        except: Option<&ItemId>,
    ) -> AppResult<()> {
        if self
            .sibling_names(owner, parent_id, except)
            .iter()
            .any(|n| n == name)
        {
            return Err(AppError::conflict(format!(
                "An item named '{name}' already exists in this folder"
            )));
        }
        Ok(())
    }

    fn require_folder(&self, owner: UserId, parent_id: &ItemId) -> AppResult<()> {
        validate_id(parent_id)?;
        let parent = self.owned(owner, parent_id)?;
        if !parent.is_folder {
            return Err(AppError::validation("Parent must be a folder"));
        }
        Ok(())
    }

    /// Whether `ancestor` appears on the parent chain of `id`.
    fn has_ancestor(&self, id: &ItemId, ancestor: &ItemId) -> bool {
        let mut seen = HashSet::new();
        let mut cursor = self.items.get(id).and_then(|s| s.item.parent_id.clone());
        while let Some(current) = cursor {
            if &current == ancestor {
                return true;
            }
            if !seen.insert(current.clone()) {
                return false;
            }
            cursor = self
                .items
                .get(&current)
                .and_then(|s| s.item.parent_id.clone());
        }
        false
    }

    fn subtree_ids(&self, root: &ItemId) -> Vec<ItemId> {
        let mut ids = vec![root.clone()];
        let mut idx = 0;
        while idx < ids.len() {
            let current = ids[idx].clone();
            for stored in self.items.values() {
                if stored.item.parent_id.as_ref() == Some(&current) && !ids.contains(&stored.item.id)
                {
                    ids.push(stored.item.id.clone());
                }
            }
            idx += 1;
        }
        ids
    }

    fn file_name(&self, name: &str, is_folder: bool, extension: &str) -> String {
        if is_folder {
            name.to_string()
        } else {
            ensure_extension(name, extension)
        }
    }
}

/// Thread-safe in-memory store for all owners.
#[derive(Debug)]
pub struct MemoryItemStore {
    state: RwLock<StoreState>,
    extension: String,
}

impl MemoryItemStore {
    /// Create an empty store that gives file names `extension`.
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            extension: extension.into(),
        }
    }

    /// The file extension enforced on file names.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// List an owner's items, folders first, then by name.
    pub async fn list_items(&self, owner: UserId) -> Vec<Item> {
        let state = self.state.read().await;
        let mut items: Vec<Item> = state
            .items
            .values()
            .filter(|s| s.owner == owner)
            .map(|s| s.item.clone())
            .collect();
        items.sort_by(|a, b| b.is_folder.cmp(&a.is_folder).then_with(|| a.name.cmp(&b.name)));
        items
    }

    /// Create a file or folder.
    pub async fn create_item(&self, owner: UserId, input: CreateItem) -> AppResult<Item> {
        let name = validate_name(&input.name)?;
        let mut state = self.state.write().await;

        if let Some(parent_id) = input.parent_id.as_ref() {
            state.require_folder(owner, parent_id)?;
        }
        let name = state.file_name(&name, input.is_folder, &self.extension);
        state.ensure_unique(owner, input.parent_id.as_ref(), &name, None)?;

        let now = Utc::now();
        let item = Item {
            id: ItemId::generate(),
            parent_id: input.parent_id,
            name,
            is_folder: input.is_folder,
            updated_at: now,
        };
        if !item.is_folder {
            state.contents.insert(item.id.clone(), String::new());
        }
        state.items.insert(
            item.id.clone(),
            StoredItem {
                owner,
                item: item.clone(),
            },
        );

        info!(
            user_id = %owner,
            item_id = %item.id,
            is_folder = item.is_folder,
            "Item created"
        );
        Ok(item)
    }

    /// Rename an item.
    pub async fn rename_item(&self, owner: UserId, id: &ItemId, input: RenameItem) -> AppResult<()> {
        validate_id(id)?;
        let name = validate_name(&input.new_name)?;
        let mut state = self.state.write().await;

        let current = state.owned(owner, id)?.clone();
        let name = state.file_name(&name, current.is_folder, &self.extension);
        state.ensure_unique(owner, current.parent_id.as_ref(), &name, Some(id))?;

        let item = state.owned_mut(owner, id)?;
        item.name = name;
        item.updated_at = Utc::now();

        info!(user_id = %owner, item_id = %id, "Item renamed");
        Ok(())
    }

    /// Move an item under a new parent, or to the top level.
    pub async fn move_item(&self, owner: UserId, id: &ItemId, input: MoveItem) -> AppResult<()> {
        validate_id(id)?;
        let mut state = self.state.write().await;

        let current = state.owned(owner, id)?.clone();
        if let Some(parent_id) = input.new_parent_id.as_ref() {
            if parent_id == id {
                return Err(AppError::validation("Cannot move an item into itself"));
            }
            state.require_folder(owner, parent_id)?;
            if state.has_ancestor(parent_id, id) {
                return Err(AppError::validation(
                    "Cannot move a folder into one of its descendants",
                ));
            }
        }
        state.ensure_unique(owner, input.new_parent_id.as_ref(), &current.name, Some(id))?;

        let item = state.owned_mut(owner, id)?;
        item.parent_id = input.new_parent_id;
        item.updated_at = Utc::now();

        info!(user_id = %owner, item_id = %id, "Item moved");
        Ok(())
    }

    /// Delete an item, its descendants, and their content and versions.
    pub async fn delete_item(&self, owner: UserId, id: &ItemId) -> AppResult<()> {
        validate_id(id)?;
        let mut state = self.state.write().await;
        state.owned(owner, id)?;

        let doomed = state.subtree_ids(id);
        for gone in &doomed {
            state.items.remove(gone);
            state.contents.remove(gone);
            state.versions.remove(gone);
        }

        info!(user_id = %owner, item_id = %id, removed = doomed.len(), "Item deleted");
        Ok(())
    }

    /// Copy a file next to itself.
    pub async fn duplicate_item(&self, owner: UserId, id: &ItemId) -> AppResult<Item> {
        validate_id(id)?;
        let mut state = self.state.write().await;

        let original = state.owned(owner, id)?.clone();
        if original.is_folder {
            return Err(AppError::validation("Folders cannot be duplicated"));
        }
        let siblings = state.sibling_names(owner, original.parent_id.as_ref(), None);
        let name = generate_sibling_copy_name(&original.name, &siblings);
        let content = state
            .contents
            .get(id)
            .cloned()
            .unwrap_or_default();

        let now = Utc::now();
        let copy = Item {
            id: ItemId::generate(),
            parent_id: original.parent_id.clone(),
            name,
            is_folder: false,
            updated_at: now,
        };
        state.contents.insert(copy.id.clone(), content);
        state.items.insert(
            copy.id.clone(),
            StoredItem {
                owner,
                item: copy.clone(),
            },
        );

        info!(user_id = %owner, source_id = %id, item_id = %copy.id, "Item duplicated");
        Ok(copy)
    }

    /// Current content of a file; empty when never saved.
    pub async fn get_content(&self, owner: UserId, id: &ItemId) -> AppResult<FileContent> {
        validate_id(id)?;
        let state = self.state.read().await;
        state.owned_file(owner, id)?;
        Ok(FileContent::new(
            state
                .contents
                .get(id)
                .cloned()
                .unwrap_or_default(),
        ))
    }

    /// Replace a file's content.
    ///
    /// Non-empty previous content is kept as the next version.
    pub async fn save_content(&self, owner: UserId, id: &ItemId, input: SaveContent) -> AppResult<()> {
        validate_id(id)?;
        validate_content(&input.content)?;
        let mut state = self.state.write().await;
        state.owned_file(owner, id)?;

        let now = Utc::now();
        let previous = state
            .contents
            .get(id)
            .cloned()
            .unwrap_or_default();
        if !previous.is_empty() {
            let history = state.versions.entry(id.clone()).or_default();
            let version = history.last().map_or(1, |v| v.version + 1);
            history.push(FileVersion {
                item_id: id.clone(),
                content: previous,
                version,
                created_at: now,
            });
        }
        state.contents.insert(id.clone(), input.content);

        info!(user_id = %owner, item_id = %id, "Content saved");
        Ok(())
    }

    /// Version history of a file, newest first.
    pub async fn list_versions(&self, owner: UserId, id: &ItemId) -> AppResult<Vec<FileVersion>> {
        validate_id(id)?;
        let state = self.state.read().await;
        state.owned_file(owner, id)?;
        let mut versions = state.versions.get(id).cloned().unwrap_or_default();
        versions.reverse();
        Ok(versions)
    }
}
