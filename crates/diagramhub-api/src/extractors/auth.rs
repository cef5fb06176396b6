//! `AuthUser` extractor: reads the caller's identity from the `x-user-id` header.
//!
//! There is no real authentication; every item set is scoped by the UUID
//! the client sends, and the store treats foreign ids as missing.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use diagramhub_core::{AppError, UserId};

use crate::error::ApiError;

pub use diagramhub_storage::http::client::USER_ID_HEADER;

/// The owner every handler acts on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub UserId);

impl AuthUser {
    /// The caller's user id.
    pub fn user_id(&self) -> UserId {
        self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authentication("Missing x-user-id header"))?;

        let user_id = raw
            .trim()
            .parse::<UserId>()
            .map_err(|_| AppError::authentication("Invalid x-user-id header"))?;

        Ok(AuthUser(user_id))
    }
}
