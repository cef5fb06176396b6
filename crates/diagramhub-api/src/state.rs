//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use diagramhub_core::config::AppConfig;
use diagramhub_storage::MemoryItemStore;

/// Shared application state passed to all handlers via Axum's `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// The item store every request is served from.
    pub store: Arc<MemoryItemStore>,
}

impl AppState {
    /// Build state with a fresh store using the configured file extension.
    pub fn new(config: AppConfig) -> Self {
        let store = Arc::new(MemoryItemStore::new(config.workspace.file_extension.clone()));
        Self {
            config: Arc::new(config),
            store,
        }
    }
}
