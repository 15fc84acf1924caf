//! Store error types

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the key-value backend.
///
/// Backend unavailability is transient infrastructure failure, distinct
/// from "key not found" (which is a normal `None` / `false` result, not
/// an error).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend unreachable or in an unusable state; the caller may retry
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}
