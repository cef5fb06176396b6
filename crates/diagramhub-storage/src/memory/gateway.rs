//! [`ItemGateway`] over a shared [`MemoryItemStore`] for one owner.

use std::sync::Arc;

use async_trait::async_trait;

use diagramhub_core::{AppResult, ItemId, UserId};
use diagramhub_entity::content::{FileContent, FileVersion};
use diagramhub_entity::item::{CreateItem, Item, MoveItem, RenameItem, SaveContent};

use super::store::MemoryItemStore;
use crate::gateway::ItemGateway;

/// Gateway that calls the store in-process.
#[derive(Debug, Clone)]
pub struct MemoryGateway {
    store: Arc<MemoryItemStore>,
    owner: UserId,
}

impl MemoryGateway {
    /// Bind a store to the owner every call acts as.
    pub fn new(store: Arc<MemoryItemStore>, owner: UserId) -> Self {
        Self { store, owner }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<MemoryItemStore> {
        &self.store
    }
}

#[async_trait]
impl ItemGateway for MemoryGateway {
    async fn list_items(&self) -> AppResult<Vec<Item>> {
        Ok(self.store.list_items(self.owner).await)
    }

    async fn create_item(&self, input: CreateItem) -> AppResult<Item> {
        self.store.create_item(self.owner, input).await
    }

    async fn rename_item(&self, id: &ItemId, input: RenameItem) -> AppResult<()> {
        self.store.rename_item(self.owner, id, input).await
    }

    async fn move_item(&self, id: &ItemId, input: MoveItem) -> AppResult<()> {
        self.store.move_item(self.owner, id, input).await
    }

    async fn delete_item(&self, id: &ItemId) -> AppResult<()> {
        self.store.delete_item(self.owner, id).await
    }

    async fn duplicate_item(&self, id: &ItemId) -> AppResult<Item> {
        self.store.duplicate_item(self.owner, id).await
    }

    async fn get_content(&self, id: &ItemId) -> AppResult<FileContent> {
        self.store.get_content(self.owner, id).await
    }

    async fn save_content(&self, id: &ItemId, input: SaveContent) -> AppResult<()> {
        self.store.save_content(self.owner, id, input).await
    }

    async fn list_versions(&self, id: &ItemId) -> AppResult<Vec<FileVersion>> {
        self.store.list_versions(self.owner, id).await
    }
}
