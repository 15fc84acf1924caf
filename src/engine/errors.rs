//! Engine error types
//!
//! Every failure mode of a plan operation maps to exactly one variant,
//! so the API layer can distinguish validation failures, absent keys,
//! precondition misses, partial writes, and transient backend trouble
//! without string matching.

use thiserror::Error;

use crate::store::StoreError;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Plan engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// No record stored under the requested id
    #[error("plan not found: {0}")]
    NotFound(String),

    /// Create payload lacks the identifying field
    #[error("document is missing required objectId")]
    MissingObjectId,

    /// Supplied version tag absent or stale; nothing was mutated
    #[error("version tag mismatch for {key}")]
    PreconditionFailed { key: String },

    /// Decomposition persisted some but not all derived records.
    ///
    /// There is no automatic rollback; the stored state is inconsistent
    /// until a subsequent successful write.
    #[error("partial write for {root_key}: persisted {written} of {total} records")]
    PartialWrite {
        root_key: String,
        written: usize,
        total: usize,
        #[source]
        source: StoreError,
    },

    /// Patch payload touches a field outside the merge policy
    #[error("field '{0}' cannot be merged")]
    UnmergeableField(String),

    /// Patch payload is structurally unusable
    #[error("invalid patch payload: {0}")]
    InvalidPatch(String),

    /// Stored bytes for a key no longer parse as a document
    #[error("stored record for {key} is not a valid document")]
    CorruptRecord {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Document could not be serialized
    #[error("failed to serialize document")]
    Serialize(#[source] serde_json::Error),

    /// Backend failure, possibly transient
    #[error(transparent)]
    Store(#[from] StoreError),
}
