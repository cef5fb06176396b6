//! Debounced content saves.
//!
//! Each open file has at most one pending timer. Scheduling again replaces
//! it, so only the last edit inside the idle window is written.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::oneshot;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

use diagramhub_cache::ContentCache;
use diagramhub_core::ItemId;

use crate::notify::Notifier;

#[derive(Debug)]
struct PendingSave {
    generation: u64,
    handle: AbortHandle,
}

/// One pending save timer per file.
#[derive(Debug)]
pub struct AutoSaveScheduler {
    content: ContentCache,
    delay: Duration,
    notifier: Notifier,
    timers: Arc<DashMap<ItemId, PendingSave>>,
    next_generation: AtomicU64,
}

impl AutoSaveScheduler {
    /// Create a scheduler that writes through `content` after `delay` of quiet.
    pub fn new(content: ContentCache, delay: Duration, notifier: Notifier) -> Self {
        Self {
            content,
            delay,
            notifier,
            timers: Arc::new(DashMap::new()),
            next_generation: AtomicU64::new(0),
        }
    }

    /// Idle time before a save fires.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Save `content` for `id` once the idle window passes, replacing any
    /// save already pending for `id`.
    pub fn schedule(&self, id: ItemId, content: String) {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let timers = Arc::clone(&self.timers);
        let cache = self.content.clone();
        let notifier = self.notifier.clone();
        let delay = self.delay;
        let task_id = id.clone();
        let (armed_tx, armed_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            // Wait until the entry is registered so `remove_if` can see it.
            if armed_rx.await.is_err() {
                return;
            }
            tokio::time::sleep(delay).await;
            // Past this point a cancel no longer interrupts the write.
            timers.remove_if(&task_id, |_, pending| pending.generation == generation);
            match cache.save(&task_id, content).await {
                Ok(()) => debug!(item_id = %task_id, "Content auto-saved"),
                Err(e) => {
                    warn!(item_id = %task_id, error = %e, "Auto-save failed");
                    notifier.error(format!("Failed to save: {}", e.message));
                }
            }
        })
        .abort_handle();

        if let Some(previous) = self.timers.insert(id, PendingSave { generation, handle }) {
            previous.handle.abort();
        }
        let _ = armed_tx.send(());
    }

    /// Drop the pending save for `id`. Returns whether one was pending.
    pub fn cancel(&self, id: &ItemId) -> bool {
        match self.timers.remove(id) {
            Some((_, pending)) => {
                pending.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Drop every pending save.
    pub fn cancel_all(&self) {
        self.timers.retain(|_, pending| {
            pending.handle.abort();
            false
        });
    }

    /// Whether a save is pending for `id`.
    pub fn is_pending(&self, id: &ItemId) -> bool {
        self.timers.contains_key(id)
    }

    pub fn pending_count(&self) -> usize {
        self.timers.len()
    }
}

impl Drop for AutoSaveScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
