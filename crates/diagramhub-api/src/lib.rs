//! # diagramhub-api
//!
//! HTTP API layer for DiagramHub built on Axum.
//!
//! Exposes the in-memory item store over the `/api/items` routes, with
//! request logging, CORS, DTO validation, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::AppState;
