//! Composition root for one editing session.
//!
//! Builds the cache, engine, drag coordinator, and auto-save scheduler over
//! a single gateway. Nothing here is global: every `Workspace` is an
//! independent instance.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::info;

use diagramhub_cache::{ContentCache, MutationCache, MutationTicket};
use diagramhub_core::config::AppConfig;
use diagramhub_core::{AppError, AppResult, ItemId};
use diagramhub_entity::content::FileVersion;
use diagramhub_storage::ItemGateway;

use crate::dnd::{DndCoordinator, DropTarget};
use crate::editor::{AutoSaveScheduler, DocumentSession};
use crate::engine::TreeEngine;
use crate::notify::{Notification, Notifier};

/// Everything a file-tree view and its editors talk to.
#[derive(Debug)]
pub struct Workspace {
    gateway: Arc<dyn ItemGateway>,
    engine: TreeEngine,
    dnd: DndCoordinator,
    autosave: Arc<AutoSaveScheduler>,
    notifier: Notifier,
}

impl Workspace {
    /// Wire a workspace over `gateway`.
    pub fn new(gateway: Arc<dyn ItemGateway>, config: &AppConfig) -> Self {
        let notifier = Notifier::default();
        let content = ContentCache::new(&config.cache, Arc::clone(&gateway));
        let cache = MutationCache::new(
            Arc::clone(&gateway),
            content.clone(),
            config.workspace.file_extension.clone(),
        );
        let engine = TreeEngine::new(cache, config.workspace.clone(), notifier.clone());
        let autosave = Arc::new(AutoSaveScheduler::new(
            content,
            config.editor.autosave_delay(),
            notifier.clone(),
        ));

        info!(
            extension = %config.workspace.file_extension,
            autosave_ms = config.editor.autosave_delay_ms,
            "Workspace initialized"
        );

        Self {
            gateway,
            engine,
            dnd: DndCoordinator::new(),
            autosave,
            notifier,
        }
    }

    pub fn engine(&self) -> &TreeEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut TreeEngine {
        &mut self.engine
    }

    pub fn dnd(&self) -> &DndCoordinator {
        &self.dnd
    }

    /// Subscribe to failure notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifier.subscribe()
    }

    /// Fetch the item list and wait for it.
    pub async fn load(&mut self) {
        self.engine.load();
        self.engine.settle().await;
    }

    /// Enable drag-and-drop once the view is stable.
    pub fn mark_ready(&mut self) {
        self.dnd.mark_ready();
    }

    pub fn drag_start(&mut self, id: &ItemId) -> bool {
        self.dnd.drag_start(&mut self.engine, id)
    }

    pub fn drag_over(&mut self, target: Option<DropTarget>) {
        self.dnd.drag_over(target);
    }

    pub fn drag_end(&mut self, target: Option<DropTarget>) -> Vec<MutationTicket> {
        self.dnd.drag_end(&mut self.engine, target)
    }

    pub fn drag_cancel(&mut self) {
        self.dnd.drag_cancel();
    }

    /// Open a file for editing.
    pub async fn open_document(&self, id: &ItemId) -> AppResult<DocumentSession> {
        match self.engine.find_by_id(id) {
            Some(node) if node.is_folder() => {
                return Err(AppError::validation("Folders have no content"));
            }
            Some(_) => {}
            None => return Err(AppError::item_not_found()),
        }
        DocumentSession::open(
            id.clone(),
            self.engine.content().clone(),
            Arc::clone(&self.autosave),
        )
        .await
    }

    /// Version history of a file, newest first.
    pub async fn versions(&self, id: &ItemId) -> AppResult<Vec<FileVersion>> {
        self.gateway.list_versions(id).await
    }
}
