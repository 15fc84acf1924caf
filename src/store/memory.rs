//! In-memory key-value backend
//!
//! A process-local `EntityStore` backed by a `RwLock<HashMap>`. The
//! write lock is held across compare and write in the conditional
//! operations, which is what gives `swap_if` / `remove_if` their
//! atomicity on this backend.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::fingerprint::{fingerprint, VersionTag};

use super::adapter::{EntityStore, SwapOutcome};
use super::errors::{StoreError, StoreResult};

/// In-memory store, suitable for tests and single-node deployments.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held, across roots and fragments.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read_guard()?.len())
    }

    fn read_guard(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, HashMap<String, Vec<u8>>>> {
        self.records
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }

    fn write_guard(
        &self,
    ) -> StoreResult<std::sync::RwLockWriteGuard<'_, HashMap<String, Vec<u8>>>> {
        self.records
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }
}

impl EntityStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.read_guard()?.get(key).cloned())
    }

    fn set(&self, key: &str, bytes: Vec<u8>) -> StoreResult<()> {
        self.write_guard()?.insert(key.to_string(), bytes);
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<bool> {
        Ok(self.write_guard()?.remove(key).is_some())
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.read_guard()?.contains_key(key))
    }

    fn swap_if(&self, key: &str, expected: &VersionTag, bytes: Vec<u8>) -> StoreResult<SwapOutcome> {
        let mut records = self.write_guard()?;
        match records.get(key) {
            None => Ok(SwapOutcome::Missing),
            Some(current) => {
                let current_tag = fingerprint(current);
                if current_tag != *expected {
                    return Ok(SwapOutcome::Mismatch(current_tag));
                }
                records.insert(key.to_string(), bytes);
                Ok(SwapOutcome::Swapped)
            }
        }
    }

    fn remove_if(&self, key: &str, expected: &VersionTag) -> StoreResult<SwapOutcome> {
        let mut records = self.write_guard()?;
        match records.get(key) {
            None => Ok(SwapOutcome::Missing),
            Some(current) => {
                let current_tag = fingerprint(current);
                if current_tag != *expected {
                    return Ok(SwapOutcome::Mismatch(current_tag));
                }
                records.remove(key);
                Ok(SwapOutcome::Swapped)
            }
        }
    }
}
