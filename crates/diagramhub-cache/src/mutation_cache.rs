//! The authoritative item list and its optimistic mutation pipeline.
//!
//! [`MutationCache::mutate`] patches the list synchronously and hands the
//! gateway call to the runtime. When the call finishes, the result comes
//! back through an internal channel; applying it restores the pre-mutation
//! snapshot on failure, swaps placeholder rows on success, and schedules a
//! refetch of the list.
//!
//! Mutations that target the same existing item are serialised: the
//! second one is patched in immediately but its gateway call waits until
//! the first settles. A list response is only accepted when it belongs to
//! the newest fetch and nothing is in flight, since every settle schedules
//! a newer fetch anyway.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use diagramhub_core::{AppError, AppResult, ItemId};
use diagramhub_entity::item::{Item, MoveItem, RenameItem, SaveContent};
use diagramhub_storage::ItemGateway;

use crate::content::ContentCache;
use crate::keys;
use crate::mutation::{Mutation, MutationOutcome, MutationTicket, Settlement};
use crate::optimistic;

/// A completed background request.
#[derive(Debug)]
enum CacheEvent {
    Fetched {
        epoch: u64,
        result: AppResult<Vec<Item>>,
    },
    Settled {
        ticket: MutationTicket,
        result: AppResult<MutationOutcome>,
    },
}

/// What applying a background result changed.
#[derive(Debug, Clone)]
pub enum CacheUpdate {
    /// A fresh list replaced the cached one.
    Fetched,
    /// A list response arrived but was stale.
    FetchDiscarded,
    /// The newest list request failed; the cached list is unchanged.
    FetchFailed(AppError),
    /// A mutation finished.
    Settled(Settlement),
}

#[derive(Debug)]
struct InFlight {
    mutation: Mutation,
    snapshot: Option<Vec<Item>>,
}

/// Optimistic cache of the owner's item list.
#[derive(Debug)]
pub struct MutationCache {
    gateway: Arc<dyn ItemGateway>,
    content: ContentCache,
    extension: String,
    rows: Option<Vec<Item>>,
    is_loading: bool,
    next_ticket: u64,
    in_flight: HashMap<MutationTicket, InFlight>,
    queues: HashMap<ItemId, VecDeque<MutationTicket>>,
    fetch_epoch: u64,
    fetches_outstanding: usize,
    tx: mpsc::UnboundedSender<CacheEvent>,
    rx: mpsc::UnboundedReceiver<CacheEvent>,
}

impl MutationCache {
    /// Create an empty cache. Nothing is fetched until [`fetch`](Self::fetch).
    pub fn new(gateway: Arc<dyn ItemGateway>, content: ContentCache, extension: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            gateway,
            content,
            extension: extension.into(),
            rows: None,
            is_loading: false,
            next_ticket: 1,
            in_flight: HashMap::new(),
            queues: HashMap::new(),
            fetch_epoch: 0,
            fetches_outstanding: 0,
            tx,
            rx,
        }
    }

    /// The cached list; empty before the first fetch lands.
    pub fn rows(&self) -> &[Item] {
        self.rows.as_deref().unwrap_or(&[])
    }

    /// Whether a list has ever been received.
    pub fn has_data(&self) -> bool {
        self.rows.is_some()
    }

    /// Whether the first list is still being fetched.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// The content cache shared with editors.
    pub fn content(&self) -> &ContentCache {
        &self.content
    }

    /// Number of mutations issued and not yet settled.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Whether any mutation or fetch is outstanding.
    pub fn is_busy(&self) -> bool {
        !self.in_flight.is_empty() || self.fetches_outstanding > 0
    }

    /// Request the item list from the gateway.
    pub fn fetch(&mut self) {
        self.fetch_epoch += 1;
        self.fetches_outstanding += 1;
        if self.rows.is_none() {
            self.is_loading = true;
        }

        let epoch = self.fetch_epoch;
        let gateway = Arc::clone(&self.gateway);
        let tx = self.tx.clone();
        debug!(key = %keys::item_list(), epoch, "Fetching item list");
        tokio::spawn(async move {
            let result = gateway.list_items().await;
            let _ = tx.send(CacheEvent::Fetched { epoch, result });
        });
    }

    /// Apply a mutation optimistically and dispatch it.
    pub fn mutate(&mut self, mutation: Mutation) -> MutationTicket {
        let ticket = MutationTicket(self.next_ticket);
        self.next_ticket += 1;

        let snapshot = self.rows.clone();
        if let Some(rows) = self.rows.as_mut() {
            apply_patch(rows, &mutation, &self.extension);
        }
        debug!(ticket = %ticket, op = mutation.label(), "Optimistic patch applied");

        let target = mutation.target().cloned();
        self.in_flight.insert(
            ticket,
            InFlight {
                mutation: mutation.clone(),
                snapshot,
            },
        );

        match target {
            Some(id) => {
                let queue = self.queues.entry(id.clone()).or_default();
                queue.push_back(ticket);
                if queue.len() == 1 {
                    self.dispatch(ticket, mutation);
                } else {
                    debug!(ticket = %ticket, item_id = %id, "Queued behind in-flight mutation");
                }
            }
            None => self.dispatch(ticket, mutation),
        }
        ticket
    }

    /// Wait for the next background result and apply it.
    pub async fn next_event(&mut self) -> Option<CacheUpdate> {
        let event = self.rx.recv().await?;
        Some(self.apply_event(event))
    }

    /// Apply a background result if one is ready.
    pub fn try_next_event(&mut self) -> Option<CacheUpdate> {
        let event = self.rx.try_recv().ok()?;
        Some(self.apply_event(event))
    }

    fn apply_event(&mut self, event: CacheEvent) -> CacheUpdate {
        match event {
            CacheEvent::Fetched { epoch, result } => self.apply_fetch(epoch, result),
            CacheEvent::Settled { ticket, result } => self.apply_settle(ticket, result),
        }
    }

    fn apply_fetch(&mut self, epoch: u64, result: AppResult<Vec<Item>>) -> CacheUpdate {
        self.fetches_outstanding = self.fetches_outstanding.saturating_sub(1);
        if epoch != self.fetch_epoch || !self.in_flight.is_empty() {
            debug!(epoch, latest = self.fetch_epoch, "Discarding stale item list");
            return CacheUpdate::FetchDiscarded;
        }
        self.is_loading = false;
        match result {
            Ok(rows) => {
                debug!(epoch, count = rows.len(), "Item list refreshed");
                self.rows = Some(rows);
                CacheUpdate::Fetched
            }
            Err(e) => {
                warn!(epoch, error = %e, "Item list fetch failed");
                CacheUpdate::FetchFailed(e)
            }
        }
    }

    fn apply_settle(&mut self, ticket: MutationTicket, result: AppResult<MutationOutcome>) -> CacheUpdate {
        let Some(InFlight { mutation, snapshot }) = self.in_flight.remove(&ticket) else {
            warn!(ticket = %ticket, "Settlement for unknown mutation");
            return CacheUpdate::FetchDiscarded;
        };

        if let Some(id) = mutation.target() {
            self.advance_queue(id, ticket);
        }

        match &result {
            Err(e) => {
                warn!(ticket = %ticket, op = mutation.label(), error = %e, "Mutation failed, rolling back");
                if mutation.touches_list() {
                    self.rows = snapshot;
                }
            }
            Ok(MutationOutcome::Created(item)) => {
                if let (Some(rows), Mutation::Create { temp_id, .. }) = (self.rows.as_mut(), &mutation) {
                    optimistic::replace_placeholder(rows, temp_id.as_ref(), item.clone());
                }
            }
            Ok(MutationOutcome::Duplicated(item)) => {
                if let (Some(rows), Mutation::Duplicate { temp_id, .. }) = (self.rows.as_mut(), &mutation) {
                    optimistic::replace_placeholder(rows, Some(temp_id), item.clone());
                }
            }
            Ok(MutationOutcome::Done) => {}
        }

        if mutation.touches_list() {
            self.fetch();
        }

        CacheUpdate::Settled(Settlement {
            ticket,
            mutation,
            result,
        })
    }

    fn advance_queue(&mut self, id: &ItemId, settled: MutationTicket) {
        let next = match self.queues.get_mut(id) {
            Some(queue) => {
                queue.retain(|t| *t != settled);
                queue.front().copied()
            }
            None => None,
        };
        match next {
            Some(next) => {
                if let Some(entry) = self.in_flight.get(&next) {
                    let mutation = entry.mutation.clone();
                    self.dispatch(next, mutation);
                }
            }
            None => {
                self.queues.remove(id);
            }
        }
    }

    fn dispatch(&self, ticket: MutationTicket, mutation: Mutation) {
        let gateway = Arc::clone(&self.gateway);
        let content = self.content.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = run(gateway.as_ref(), &content, mutation).await;
            let _ = tx.send(CacheEvent::Settled { ticket, result });
        });
    }
}

fn apply_patch(rows: &mut Vec<Item>, mutation: &Mutation, extension: &str) {
    match mutation {
        Mutation::Create {
            input,
            temp_id: Some(temp_id),
        } => optimistic::insert_created(rows, temp_id, input, extension),
        Mutation::Create { temp_id: None, .. } => {}
        Mutation::Rename { id, new_name } => optimistic::rename(rows, id, new_name, extension),
        Mutation::Move { id, new_parent_id } => optimistic::reparent(rows, id, new_parent_id.as_ref()),
        Mutation::Delete { id } => {
            optimistic::remove_subtree(rows, id);
        }
        Mutation::Duplicate { id, temp_id } => {
            optimistic::insert_duplicate(rows, id, temp_id);
        }
        Mutation::SaveContent { .. } => {}
    }
}

async fn run(gateway: &dyn ItemGateway, content: &ContentCache, mutation: Mutation) -> AppResult<MutationOutcome> {
    match mutation {
        Mutation::Create { input, .. } => gateway.create_item(input).await.map(MutationOutcome::Created),
        Mutation::Rename { id, new_name } => gateway
            .rename_item(&id, RenameItem { new_name })
            .await
            .map(|()| MutationOutcome::Done),
        Mutation::Move { id, new_parent_id } => gateway
            .move_item(&id, MoveItem { new_parent_id })
            .await
            .map(|()| MutationOutcome::Done),
        Mutation::Delete { id } => gateway.delete_item(&id).await.map(|()| MutationOutcome::Done),
        Mutation::Duplicate { id, .. } => gateway
            .duplicate_item(&id)
            .await
            .map(MutationOutcome::Duplicated),
        Mutation::SaveContent { id, content: text } => {
            let result = gateway.save_content(&id, SaveContent { content: text }).await;
            content.invalidate(&id).await;
            result.map(|()| MutationOutcome::Done)
        }
    }
}
