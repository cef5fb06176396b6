//! Custom Axum extractors.

pub mod auth;
pub mod json;

pub use auth::{AuthUser, USER_ID_HEADER};
pub use json::ValidatedJson;
