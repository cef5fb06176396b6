//! In-memory item store.

pub mod gateway;
pub mod store;

pub use gateway::MemoryGateway;
pub use store::MemoryItemStore;
