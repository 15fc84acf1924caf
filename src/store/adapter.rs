//! Key-value backend contract

use crate::fingerprint::VersionTag;

use super::errors::StoreResult;

/// Outcome of a conditional mutation (`swap_if` / `remove_if`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    /// Precondition held; the mutation was applied
    Swapped,
    /// The key exists but its current tag differs from the expected one;
    /// nothing was mutated. Carries the tag of the value that won.
    Mismatch(VersionTag),
    /// The key does not exist; nothing was mutated
    Missing,
}

/// Contract over the key-value backend.
///
/// Every operation is atomic per key and may block on backend I/O.
/// Implementations must treat these as long-latency calls that either
/// return or fail with a transient `StoreError`; none of them are
/// allowed to conflate backend failure with key absence.
///
/// There is deliberately no cross-key primitive here: multi-key writes
/// are the caller's problem, including surfacing partial failure.
pub trait EntityStore: Send + Sync {
    /// Returns the stored bytes for `key`, or `None` if absent.
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Stores `bytes` under `key`, overwriting unconditionally.
    ///
    /// All precondition logic lives above this layer; `set` itself never
    /// inspects the prior value.
    fn set(&self, key: &str, bytes: Vec<u8>) -> StoreResult<()>;

    /// Removes `key`. Returns `true` if it existed.
    fn delete(&self, key: &str) -> StoreResult<bool>;

    /// Reports whether `key` currently exists.
    fn exists(&self, key: &str) -> StoreResult<bool>;

    /// Replaces the value under `key` with `bytes` if and only if the
    /// fingerprint of the current value equals `expected`.
    ///
    /// Compare and write happen as one atomic step with respect to
    /// concurrent callers on the same key. Two writers racing on the
    /// same prior tag cannot both observe `Swapped`.
    fn swap_if(&self, key: &str, expected: &VersionTag, bytes: Vec<u8>) -> StoreResult<SwapOutcome>;

    /// Removes `key` if and only if the fingerprint of the current value
    /// equals `expected`. Same atomicity contract as `swap_if`.
    fn remove_if(&self, key: &str, expected: &VersionTag) -> StoreResult<SwapOutcome>;
}
