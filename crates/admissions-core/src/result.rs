//! Convenience result type alias for Admissions Desk.

use crate::error::AppError;

/// A specialized `Result` type for Admissions Desk operations.
pub type AppResult<T> = Result<T, AppError>;
