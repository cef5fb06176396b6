//! An open diagram document.

use std::sync::Arc;

use tracing::debug;

use diagramhub_cache::ContentCache;
use diagramhub_core::{AppResult, ItemId};
use diagramhub_entity::item::validation::validate_content;

use super::autosave::AutoSaveScheduler;

/// Local buffer of one open file, saved in the background as it changes.
///
/// Dropping the session cancels its pending save.
#[derive(Debug)]
pub struct DocumentSession {
    item_id: ItemId,
    buffer: String,
    content: ContentCache,
    autosave: Arc<AutoSaveScheduler>,
}

impl DocumentSession {
    /// Load the file's content and start a session.
    pub async fn open(item_id: ItemId, content: ContentCache, autosave: Arc<AutoSaveScheduler>) -> AppResult<Self> {
        let buffer = content.get(&item_id).await?;
        debug!(item_id = %item_id, bytes = buffer.len(), "Document opened");
        Ok(Self {
            item_id,
            buffer,
            content,
            autosave,
        })
    }

    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    /// Current text, including unsaved edits.
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Whether an edit is waiting to be saved.
    pub fn has_pending_save(&self) -> bool {
        self.autosave.is_pending(&self.item_id)
    }

    /// Replace the text and restart the save timer.
    ///
    /// Oversized content is rejected and leaves the buffer unchanged.
    pub fn edit(&mut self, text: impl Into<String>) -> AppResult<()> {
        let text = text.into();
        validate_content(&text)?;
        if text == self.buffer {
            return Ok(());
        }
        self.buffer = text;
        self.autosave.schedule(self.item_id.clone(), self.buffer.clone());
        Ok(())
    }

    /// Write a pending edit now instead of waiting for the timer.
    pub async fn flush(&mut self) -> AppResult<()> {
        if !self.autosave.cancel(&self.item_id) {
            return Ok(());
        }
        self.content.save(&self.item_id, self.buffer.clone()).await
    }

    /// Stop editing. A pending save is dropped.
    pub fn close(&mut self) -> bool {
        self.autosave.cancel(&self.item_id)
    }
}

impl Drop for DocumentSession {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use diagramhub_core::ErrorKind;
    use diagramhub_core::config::CacheConfig;
    use diagramhub_entity::item::SaveContent;
    use diagramhub_entity::item::validation::MAX_CONTENT_BYTES;
    use diagramhub_storage::ItemGateway;

    use crate::notify::Notifier;
    use crate::testing::CountingGateway;

    async fn session(gateway: &Arc<CountingGateway>, id: &ItemId) -> DocumentSession {
        let dyn_gateway: Arc<dyn ItemGateway> = Arc::clone(gateway) as Arc<dyn ItemGateway>;
        let content = ContentCache::new(&CacheConfig::default(), dyn_gateway);
        let autosave = Arc::new(AutoSaveScheduler::new(
            content.clone(),
            Duration::from_secs(1),
            Notifier::default(),
        ));
        DocumentSession::open(id.clone(), content, autosave).await.unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_loads_current_content() {
        let gateway = Arc::new(CountingGateway::new());
        let file = gateway.seed("Flow", None, false).await;
        gateway
            .inner()
            .save_content(&file.id, SaveContent { content: "graph LR".into() })
            .await
            .unwrap();

        let doc = session(&gateway, &file.id).await;
        assert_eq!(doc.text(), "graph LR");
        assert!(!doc.has_pending_save());
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_saves_immediately() {
        let gateway = Arc::new(CountingGateway::new());
        let file = gateway.seed("Flow", None, false).await;
        let mut doc = session(&gateway, &file.id).await;

        doc.edit("graph TD").unwrap();
        assert!(doc.has_pending_save());
        doc.flush().await.unwrap();
        assert!(!doc.has_pending_save());
        assert_eq!(gateway.writes(), 1);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(gateway.writes(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_oversized_edit_is_rejected() {
        let gateway = Arc::new(CountingGateway::new());
        let file = gateway.seed("Flow", None, false).await;
        let mut doc = session(&gateway, &file.id).await;

        let err = doc.edit("x".repeat(MAX_CONTENT_BYTES + 1)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(doc.text(), "");
        assert!(!doc.has_pending_save());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_session_cancels_save() {
        let gateway = Arc::new(CountingGateway::new());
        let file = gateway.seed("Flow", None, false).await;
        let mut doc = session(&gateway, &file.id).await;

        doc.edit("graph TD").unwrap();
        drop(doc);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(gateway.writes(), 0);
    }
}
