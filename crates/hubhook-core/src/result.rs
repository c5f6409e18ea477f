//! Convenience result type alias for hubhook.

use crate::error::AppError;

/// A specialized `Result` type for hubhook operations.
pub type AppResult<T> = Result<T, AppError>;
