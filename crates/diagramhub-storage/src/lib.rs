//! # diagramhub-storage
//!
//! The persistence boundary of DiagramHub. [`ItemGateway`] is the contract
//! the client-side cache depends on; [`memory`] holds the reference store
//! that enforces every server rule, and [`http`] reaches that store over
//! the REST API.

pub mod gateway;
pub mod http;
pub mod memory;

pub use gateway::ItemGateway;
pub use http::HttpGateway;
pub use memory::{MemoryGateway, MemoryItemStore};
