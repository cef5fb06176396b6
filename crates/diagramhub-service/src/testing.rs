//! Gateway doubles shared by the service tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use diagramhub_cache::{ContentCache, MutationCache};
use diagramhub_core::config::{CacheConfig, WorkspaceConfig};
use diagramhub_core::{AppError, AppResult, ItemId, UserId};
use diagramhub_entity::content::{FileContent, FileVersion};
use diagramhub_entity::item::{CreateItem, Item, MoveItem, RenameItem, SaveContent};
use diagramhub_storage::{ItemGateway, MemoryGateway, MemoryItemStore};

use crate::engine::TreeEngine;
use crate::notify::Notifier;

/// A memory gateway that counts calls and can be told to fail writes.
#[derive(Debug)]
pub struct CountingGateway {
    inner: MemoryGateway,
    calls: AtomicUsize,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl CountingGateway {
    pub fn new() -> Self {
        Self {
            inner: MemoryGateway::new(Arc::new(MemoryItemStore::new(".mmd")), UserId::new()),
            calls: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// The gateway without counting, for seeding.
    pub fn inner(&self) -> &MemoryGateway {
        &self.inner
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn seed(&self, name: &str, parent: Option<&Item>, is_folder: bool) -> Item {
        self.inner
            .create_item(CreateItem {
                parent_id: parent.map(|p| p.id.clone()),
                name: name.to_string(),
                is_folder,
            })
            .await
            .unwrap()
    }

    fn read(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn write(&self) -> AppResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(AppError::network("connection reset"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ItemGateway for CountingGateway {
    async fn list_items(&self) -> AppResult<Vec<Item>> {
        self.read();
        self.inner.list_items().await
    }

    async fn create_item(&self, input: CreateItem) -> AppResult<Item> {
        self.write()?;
        self.inner.create_item(input).await
    }

    async fn rename_item(&self, id: &ItemId, input: RenameItem) -> AppResult<()> {
        self.write()?;
        self.inner.rename_item(id, input).await
    }

    async fn move_item(&self, id: &ItemId, input: MoveItem) -> AppResult<()> {
        self.write()?;
        self.inner.move_item(id, input).await
    }

    async fn delete_item(&self, id: &ItemId) -> AppResult<()> {
        self.write()?;
        self.inner.delete_item(id).await
    }

    async fn duplicate_item(&self, id: &ItemId) -> AppResult<Item> {
        self.write()?;
        self.inner.duplicate_item(id).await
    }

    async fn get_content(&self, id: &ItemId) -> AppResult<FileContent> {
        self.read();
        self.inner.get_content(id).await
    }

    async fn save_content(&self, id: &ItemId, input: SaveContent) -> AppResult<()> {
        self.write()?;
        self.inner.save_content(id, input).await
    }

    async fn list_versions(&self, id: &ItemId) -> AppResult<Vec<FileVersion>> {
        self.read();
        self.inner.list_versions(id).await
    }
}

/// An engine over `gateway` with the list already loaded.
pub async fn loaded_engine(gateway: Arc<CountingGateway>) -> TreeEngine {
    let gateway: Arc<dyn ItemGateway> = gateway;
    let content = ContentCache::new(&CacheConfig::default(), Arc::clone(&gateway));
    let cache = MutationCache::new(gateway, content, ".mmd");
    let mut engine = TreeEngine::new(cache, WorkspaceConfig::default(), Notifier::default());
    engine.load();
    engine.settle().await;
    engine
}
