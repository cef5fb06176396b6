//! File content cache using the moka crate.

use std::sync::Arc;

use moka::future::Cache;
use tracing::debug;

use diagramhub_core::config::CacheConfig;
use diagramhub_core::{AppResult, ItemId};
use diagramhub_entity::item::SaveContent;
use diagramhub_storage::ItemGateway;

use crate::keys;

/// Read-through cache of file contents.
#[derive(Debug, Clone)]
pub struct ContentCache {
    cache: Cache<String, String>,
    gateway: Arc<dyn ItemGateway>,
}

impl ContentCache {
    /// Create a content cache from configuration.
    pub fn new(config: &CacheConfig, gateway: Arc<dyn ItemGateway>) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.content_max_capacity)
            .time_to_live(config.content_ttl())
            .build();
        Self { cache, gateway }
    }

    /// Content of a file, fetched from the gateway on a miss.
    pub async fn get(&self, id: &ItemId) -> AppResult<String> {
        let key = keys::content(id);
        if let Some(hit) = self.cache.get(&key).await {
            return Ok(hit);
        }
        let fetched = self.gateway.get_content(id).await?.content;
        self.cache.insert(key, fetched.clone()).await;
        debug!(item_id = %id, "Content cached");
        Ok(fetched)
    }

    /// Cached content without contacting the gateway.
    pub async fn peek(&self, id: &ItemId) -> Option<String> {
        self.cache.get(&keys::content(id)).await
    }

    /// Persist content and keep the cached copy in step.
    pub async fn save(&self, id: &ItemId, content: String) -> AppResult<()> {
        let key = keys::content(id);
        match self
            .gateway
            .save_content(id, SaveContent {
                content: content.clone(),
            })
            .await
        {
            Ok(()) => {
                self.cache.insert(key, content).await;
                Ok(())
            }
            Err(e) => {
                self.cache.invalidate(&key).await;
                Err(e)
            }
        }
    }

    /// Drop a cached entry.
    pub async fn invalidate(&self, id: &ItemId) {
        self.cache.invalidate(&keys::content(id)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagramhub_core::UserId;
    use diagramhub_entity::item::CreateItem;
    use diagramhub_storage::{MemoryGateway, MemoryItemStore};

    async fn setup() -> (ContentCache, Arc<MemoryGateway>, ItemId) {
        let gateway = Arc::new(MemoryGateway::new(
            Arc::new(MemoryItemStore::new(".mmd")),
            UserId::new(),
        ));
        let file = gateway
            .create_item(CreateItem {
                parent_id: None,
                name: "Flow".into(),
                is_folder: false,
            })
            .await
            .unwrap();
        let cache = ContentCache::new(&CacheConfig::default(), gateway.clone());
        (cache, gateway, file.id)
    }

    #[tokio::test]
    async fn test_read_through_then_hit() {
        let (cache, gateway, id) = setup().await;
        assert_eq!(cache.get(&id).await.unwrap(), "");

        // Written behind the cache's back: the stale hit is served.
        gateway
            .save_content(&id, SaveContent { content: "graph LR".into() })
            .await
            .unwrap();
        assert_eq!(cache.get(&id).await.unwrap(), "");

        cache.invalidate(&id).await;
        assert_eq!(cache.get(&id).await.unwrap(), "graph LR");
    }

    #[tokio::test]
    async fn test_save_writes_through() {
        let (cache, gateway, id) = setup().await;
        cache.save(&id, "flowchart TD".into()).await.unwrap();
        assert_eq!(cache.peek(&id).await.as_deref(), Some("flowchart TD"));
        assert_eq!(gateway.get_content(&id).await.unwrap().content, "flowchart TD");
    }

    #[tokio::test]
    async fn test_missing_file_is_error() {
        let (cache, _gateway, _id) = setup().await;
        assert!(cache.get(&ItemId::generate()).await.is_err());
    }
}
