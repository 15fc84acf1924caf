//! Plan engine
//!
//! The concurrency controller for every plan operation, keyed by
//! `objectId`. Conceptually each key is in one of two states, Absent or
//! Present(tag), and every mutation is gated on a version-tag
//! precondition evaluated atomically by the store's conditional
//! primitives.
//!
//! Policy decisions baked in here:
//! - Create is an idempotent upsert: re-creating an existing id
//!   overwrites it and returns a fresh tag.
//! - Replace rewrites the root record only; it does not re-decompose.
//! - Delete removes the root record only. Fragments written at
//!   decomposition time persist independently.
//! - A conditional mutation with no supplied tag fails the precondition
//!   when the key exists; absence wins and reports not-found.
//!
//! Response tags always come from re-reading what is now persisted,
//! never from the bytes as submitted; the two can differ whenever
//! serialization is not byte-stable.

mod errors;
mod patch;

pub use errors::{EngineError, EngineResult};
pub use patch::{apply_merge_patch, APPEND_FIELDS};

use std::sync::Arc;

use serde_json::Value;

use crate::decompose::decompose;
use crate::fingerprint::{fingerprint, VersionTag};
use crate::store::{EntityStore, SwapOutcome};

/// A stored plan as returned to callers: body plus its current tag.
#[derive(Debug, Clone)]
pub struct PlanRecord {
    pub body: Value,
    pub tag: VersionTag,
}

/// Outcome of a conditional read.
#[derive(Debug, Clone)]
pub enum ReadOutcome {
    /// The caller's tag still matches; no body
    NotModified,
    /// Current body and tag
    Found(PlanRecord),
}

/// The decomposition-and-conditional-store engine.
///
/// Holds the injected store handle; constructed once at boot and shared
/// behind the HTTP state.
pub struct PlanEngine {
    store: Arc<dyn EntityStore>,
}

impl PlanEngine {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Creates (or overwrites) a plan from a validated document.
    ///
    /// Decomposes the document, persists every derived record in order,
    /// then re-reads the root record and fingerprints it for the
    /// response. A failure partway through the writes surfaces as
    /// `PartialWrite`; records already written stay written.
    pub fn create(&self, document: &Value) -> EngineResult<PlanRecord> {
        let root_key = document
            .get("objectId")
            .and_then(Value::as_str)
            .ok_or(EngineError::MissingObjectId)?
            .to_string();

        let entities = decompose(&root_key, document).map_err(EngineError::Serialize)?;
        let total = entities.len();

        for (written, entity) in entities.into_iter().enumerate() {
            if let Err(source) = self.store.set(&entity.key, entity.bytes) {
                return Err(EngineError::PartialWrite {
                    root_key,
                    written,
                    total,
                    source,
                });
            }
        }

        self.read_back(&root_key)
    }

    /// Conditional read.
    ///
    /// A supplied `If-None-Match` tag equal to the current tag
    /// short-circuits to `NotModified`; otherwise the current body and
    /// tag are returned.
    pub fn fetch(&self, id: &str, if_none_match: Option<&VersionTag>) -> EngineResult<ReadOutcome> {
        let bytes = self
            .store
            .get(id)?
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;

        let tag = fingerprint(&bytes);
        if if_none_match == Some(&tag) {
            return Ok(ReadOutcome::NotModified);
        }

        Ok(ReadOutcome::Found(PlanRecord {
            body: parse_record(id, &bytes)?,
            tag,
        }))
    }

    /// Full replacement of the root record.
    ///
    /// Requires an `If-Match` tag equal to the current one; the compare
    /// and the overwrite happen as one atomic store operation.
    pub fn replace(
        &self,
        id: &str,
        document: &Value,
        if_match: Option<&VersionTag>,
    ) -> EngineResult<PlanRecord> {
        let expected = self.require_tag(id, if_match)?;
        let bytes = serde_json::to_vec(document).map_err(EngineError::Serialize)?;

        match self.store.swap_if(id, &expected, bytes)? {
            SwapOutcome::Swapped => self.read_back(id),
            SwapOutcome::Mismatch(_) => Err(EngineError::PreconditionFailed {
                key: id.to_string(),
            }),
            SwapOutcome::Missing => Err(EngineError::NotFound(id.to_string())),
        }
    }

    /// Merge patch under the append-only policy.
    ///
    /// The merged value is computed from the current record, then
    /// persisted with the caller's tag as the swap precondition. A
    /// concurrent writer that lands between our read and the swap makes
    /// the tag stale, so the swap reports a mismatch instead of silently
    /// losing either update.
    pub fn patch(
        &self,
        id: &str,
        patch: &Value,
        if_match: Option<&VersionTag>,
    ) -> EngineResult<PlanRecord> {
        let expected = self.require_tag(id, if_match)?;

        let current_bytes = self
            .store
            .get(id)?
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;
        let current = parse_record(id, &current_bytes)?;

        let merged = apply_merge_patch(&current, patch)?;
        let merged_bytes = serde_json::to_vec(&merged).map_err(EngineError::Serialize)?;

        match self.store.swap_if(id, &expected, merged_bytes)? {
            SwapOutcome::Swapped => self.read_back(id),
            SwapOutcome::Mismatch(_) => Err(EngineError::PreconditionFailed {
                key: id.to_string(),
            }),
            SwapOutcome::Missing => Err(EngineError::NotFound(id.to_string())),
        }
    }

    /// Conditional delete of the root record.
    pub fn delete(&self, id: &str, if_match: Option<&VersionTag>) -> EngineResult<()> {
        let expected = self.require_tag(id, if_match)?;

        match self.store.remove_if(id, &expected)? {
            SwapOutcome::Swapped => Ok(()),
            SwapOutcome::Mismatch(_) => Err(EngineError::PreconditionFailed {
                key: id.to_string(),
            }),
            SwapOutcome::Missing => Err(EngineError::NotFound(id.to_string())),
        }
    }

    /// Resolves the caller's `If-Match` tag.
    ///
    /// Absence of the key takes precedence over absence of the tag, so
    /// a tagless request against a missing plan reports not-found
    /// rather than a precondition failure.
    fn require_tag(&self, id: &str, if_match: Option<&VersionTag>) -> EngineResult<VersionTag> {
        match if_match {
            Some(tag) => Ok(tag.clone()),
            None => {
                if self.store.exists(id)? {
                    Err(EngineError::PreconditionFailed {
                        key: id.to_string(),
                    })
                } else {
                    Err(EngineError::NotFound(id.to_string()))
                }
            }
        }
    }

    /// Re-reads a root record and fingerprints what is actually stored.
    fn read_back(&self, id: &str) -> EngineResult<PlanRecord> {
        let bytes = self
            .store
            .get(id)?
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;
        Ok(PlanRecord {
            tag: fingerprint(&bytes),
            body: parse_record(id, &bytes)?,
        })
    }
}

fn parse_record(key: &str, bytes: &[u8]) -> EngineResult<Value> {
    serde_json::from_slice(bytes).map_err(|source| EngineError::CorruptRecord {
        key: key.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreError, StoreResult};
    use serde_json::json;

    fn engine() -> PlanEngine {
        PlanEngine::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_create_returns_stored_body_and_tag() {
        let engine = engine();
        let doc = json!({"objectId": "p1", "linkedPlanServices": []});

        let record = engine.create(&doc).unwrap();
        assert_eq!(record.body, doc);

        match engine.fetch("p1", None).unwrap() {
            ReadOutcome::Found(read) => {
                assert_eq!(read.body, doc);
                assert_eq!(read.tag, record.tag);
            }
            other => panic!("expected found, got {:?}", other),
        }
    }

    #[test]
    fn test_create_without_object_id() {
        let engine = engine();
        assert!(matches!(
            engine.create(&json!({"planType": "inNetwork"})),
            Err(EngineError::MissingObjectId)
        ));
    }

    #[test]
    fn test_create_is_idempotent_upsert() {
        let engine = engine();
        let first = engine
            .create(&json!({"objectId": "p1", "planType": "inNetwork"}))
            .unwrap();
        let second = engine
            .create(&json!({"objectId": "p1", "planType": "outOfNetwork"}))
            .unwrap();

        assert_ne!(first.tag, second.tag);
        match engine.fetch("p1", None).unwrap() {
            ReadOutcome::Found(read) => assert_eq!(read.body["planType"], "outOfNetwork"),
            other => panic!("expected found, got {:?}", other),
        }
    }

    #[test]
    fn test_create_stores_fragments() {
        let store = Arc::new(MemoryStore::new());
        let engine = PlanEngine::new(store.clone());
        engine
            .create(&json!({
                "objectId": "p1",
                "planCostShares": {"objectId": "cs1"},
                "linkedPlanServices": [{"objectId": "s1"}]
            }))
            .unwrap();

        assert_eq!(store.len().unwrap(), 3);
        assert!(store.exists("p1").unwrap());
        assert!(store.exists("p1/planCostShares").unwrap());
        assert!(store.exists("p1/linkedPlanServices/0").unwrap());
    }

    #[test]
    fn test_fetch_missing_plan() {
        let engine = engine();
        assert!(matches!(
            engine.fetch("nope", None),
            Err(EngineError::NotFound(_))
        ));
    }

    #[test]
    fn test_fetch_idempotent_tag() {
        let engine = engine();
        engine.create(&json!({"objectId": "p1"})).unwrap();

        let first = match engine.fetch("p1", None).unwrap() {
            ReadOutcome::Found(r) => r.tag,
            other => panic!("expected found, got {:?}", other),
        };
        let second = match engine.fetch("p1", None).unwrap() {
            ReadOutcome::Found(r) => r.tag,
            other => panic!("expected found, got {:?}", other),
        };
        assert_eq!(first, second);
    }

    #[test]
    fn test_conditional_fetch_not_modified() {
        let engine = engine();
        let record = engine.create(&json!({"objectId": "p1"})).unwrap();

        assert!(matches!(
            engine.fetch("p1", Some(&record.tag)).unwrap(),
            ReadOutcome::NotModified
        ));

        let stale = fingerprint(b"something else");
        assert!(matches!(
            engine.fetch("p1", Some(&stale)).unwrap(),
            ReadOutcome::Found(_)
        ));
    }

    #[test]
    fn test_replace_requires_matching_tag() {
        let engine = engine();
        let record = engine
            .create(&json!({"objectId": "p1", "planType": "inNetwork"}))
            .unwrap();

        let stale = fingerprint(b"stale");
        assert!(matches!(
            engine.replace("p1", &json!({"objectId": "p1"}), Some(&stale)),
            Err(EngineError::PreconditionFailed { .. })
        ));
        assert!(matches!(
            engine.replace("p1", &json!({"objectId": "p1"}), None),
            Err(EngineError::PreconditionFailed { .. })
        ));

        let replaced = engine
            .replace(
                "p1",
                &json!({"objectId": "p1", "planType": "outOfNetwork"}),
                Some(&record.tag),
            )
            .unwrap();
        assert_ne!(replaced.tag, record.tag);
        assert_eq!(replaced.body["planType"], "outOfNetwork");
    }

    #[test]
    fn test_replace_missing_plan() {
        let engine = engine();
        let tag = fingerprint(b"anything");
        assert!(matches!(
            engine.replace("ghost", &json!({"objectId": "ghost"}), Some(&tag)),
            Err(EngineError::NotFound(_))
        ));
        assert!(matches!(
            engine.replace("ghost", &json!({"objectId": "ghost"}), None),
            Err(EngineError::NotFound(_))
        ));
    }

    #[test]
    fn test_patch_appends_and_rotates_tag() {
        let engine = engine();
        let record = engine
            .create(&json!({"objectId": "p1", "linkedPlanServices": [{"objectId": "a"}]}))
            .unwrap();

        let patched = engine
            .patch(
                "p1",
                &json!({"linkedPlanServices": [{"objectId": "x"}]}),
                Some(&record.tag),
            )
            .unwrap();

        assert_ne!(patched.tag, record.tag);
        assert_eq!(
            patched.body["linkedPlanServices"],
            json!([{"objectId": "a"}, {"objectId": "x"}])
        );
    }

    #[test]
    fn test_patch_with_stale_tag_leaves_value_unchanged() {
        let engine = engine();
        let record = engine
            .create(&json!({"objectId": "p1", "linkedPlanServices": []}))
            .unwrap();

        let stale = fingerprint(b"stale");
        assert!(matches!(
            engine.patch("p1", &json!({"linkedPlanServices": [{"objectId": "x"}]}), Some(&stale)),
            Err(EngineError::PreconditionFailed { .. })
        ));

        match engine.fetch("p1", None).unwrap() {
            ReadOutcome::Found(read) => {
                assert_eq!(read.body["linkedPlanServices"], json!([]));
                assert_eq!(read.tag, record.tag);
            }
            other => panic!("expected found, got {:?}", other),
        }
    }

    #[test]
    fn test_delete_lifecycle() {
        let engine = engine();
        let record = engine.create(&json!({"objectId": "p1"})).unwrap();

        let stale = fingerprint(b"stale");
        assert!(matches!(
            engine.delete("p1", Some(&stale)),
            Err(EngineError::PreconditionFailed { .. })
        ));

        engine.delete("p1", Some(&record.tag)).unwrap();
        assert!(matches!(
            engine.fetch("p1", None),
            Err(EngineError::NotFound(_))
        ));
        assert!(matches!(
            engine.delete("p1", Some(&record.tag)),
            Err(EngineError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_leaves_fragments() {
        let store = Arc::new(MemoryStore::new());
        let engine = PlanEngine::new(store.clone());
        let record = engine
            .create(&json!({"objectId": "p1", "linkedPlanServices": [{"objectId": "s1"}]}))
            .unwrap();

        engine.delete("p1", Some(&record.tag)).unwrap();
        assert!(!store.exists("p1").unwrap());
        // fragments are referenced-by, not owned-by the root
        assert!(store.exists("p1/linkedPlanServices/0").unwrap());
    }

    /// Store double that starts failing after a fixed number of writes.
    struct FlakyStore {
        inner: MemoryStore,
        budget: std::sync::Mutex<usize>,
    }

    impl FlakyStore {
        fn failing_after(sets: usize) -> Self {
            Self {
                inner: MemoryStore::new(),
                budget: std::sync::Mutex::new(sets),
            }
        }
    }

    impl EntityStore for FlakyStore {
        fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, bytes: Vec<u8>) -> StoreResult<()> {
            let mut budget = self.budget.lock().unwrap();
            if *budget == 0 {
                return Err(StoreError::Unavailable("write budget exhausted".to_string()));
            }
            *budget -= 1;
            self.inner.set(key, bytes)
        }

        fn delete(&self, key: &str) -> StoreResult<bool> {
            self.inner.delete(key)
        }

        fn exists(&self, key: &str) -> StoreResult<bool> {
            self.inner.exists(key)
        }

        fn swap_if(
            &self,
            key: &str,
            expected: &VersionTag,
            bytes: Vec<u8>,
        ) -> StoreResult<SwapOutcome> {
            self.inner.swap_if(key, expected, bytes)
        }

        fn remove_if(&self, key: &str, expected: &VersionTag) -> StoreResult<SwapOutcome> {
            self.inner.remove_if(key, expected)
        }
    }

    #[test]
    fn test_partial_write_surfaced_distinctly() {
        let store = Arc::new(FlakyStore::failing_after(2));
        let engine = PlanEngine::new(store.clone());

        let err = engine
            .create(&json!({
                "objectId": "p1",
                "planCostShares": {"objectId": "cs1"},
                "linkedPlanServices": [{"objectId": "s1"}, {"objectId": "s2"}]
            }))
            .unwrap_err();

        match err {
            EngineError::PartialWrite {
                root_key,
                written,
                total,
                ..
            } => {
                assert_eq!(root_key, "p1");
                assert_eq!(written, 2);
                assert_eq!(total, 4);
            }
            other => panic!("expected partial write, got {:?}", other),
        }
        // already-written records stay written; nothing is rolled back
        assert!(store.exists("p1").unwrap());
    }

    #[test]
    fn test_racing_writers_cannot_both_win() {
        let engine = Arc::new(engine());
        let record = engine
            .create(&json!({"objectId": "p1", "linkedPlanServices": []}))
            .unwrap();

        let mut handles = Vec::new();
        for i in 0..4 {
            let engine = Arc::clone(&engine);
            let tag = record.tag.clone();
            handles.push(std::thread::spawn(move || {
                engine.patch(
                    "p1",
                    &json!({"linkedPlanServices": [{"objectId": format!("s{}", i)}]}),
                    Some(&tag),
                )
            }));
        }

        let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let wins = outcomes.iter().filter(|o| o.is_ok()).count();
        assert_eq!(wins, 1, "only one writer may pass the shared prior tag");

        match engine.fetch("p1", None).unwrap() {
            ReadOutcome::Found(read) => {
                assert_eq!(read.body["linkedPlanServices"].as_array().unwrap().len(), 1)
            }
            other => panic!("expected found, got {:?}", other),
        }
    }
}
