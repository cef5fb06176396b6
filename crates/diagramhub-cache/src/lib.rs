//! # diagramhub-cache
//!
//! Client-side caches for DiagramHub:
//!
//! - [`MutationCache`]: the authoritative item list, optimistic patches,
//!   rollback on failure, and refetch after every settled mutation
//! - [`ContentCache`]: file contents, backed by [moka](https://crates.io/crates/moka)
//!
//! Gateway calls run on the tokio runtime; their results come back as
//! events that the owner applies with [`MutationCache::next_event`] or
//! [`MutationCache::try_next_event`].

pub mod content;
pub mod keys;
pub mod mutation;
pub mod mutation_cache;
pub mod optimistic;

pub use content::ContentCache;
pub use mutation::{Mutation, MutationOutcome, MutationTicket, Settlement};
pub use mutation_cache::{CacheUpdate, MutationCache};
