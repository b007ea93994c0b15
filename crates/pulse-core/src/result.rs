//! Crate-wide result alias.

use crate::error::AppError;

/// Shorthand for `Result<T, AppError>`, used across all Pulse crates.
pub type AppResult<T> = Result<T, AppError>;
