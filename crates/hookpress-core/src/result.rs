//! Convenience result type alias for HookPress.

use crate::error::AppError;

/// A specialized `Result` type for HookPress operations.
///
/// Hook callbacks return this type, so every crate and plugin shares one
/// error channel.
pub type AppResult<T> = Result<T, AppError>;
