//! Convenience result type alias for DiagramHub.

use crate::error::AppError;

/// A specialized `Result` type for DiagramHub operations.
pub type AppResult<T> = Result<T, AppError>;
