//! Merge-patch application
//!
//! The merge policy is field-specific, not a generic deep merge:
//! `linkedPlanServices` is append-only concatenation (new elements go on
//! the end; no de-duplication, no removal, no reordering). Any other
//! field in a patch payload is rejected. The patch schema enforces the
//! same enumeration before this code runs; the check here keeps the
//! policy self-contained.

use serde_json::Value;

use super::errors::{EngineError, EngineResult};

/// Fields merged by appending to the existing sequence.
pub const APPEND_FIELDS: &[&str] = &["linkedPlanServices"];

/// Applies `patch` to `existing` under the merge policy, returning the
/// merged document. Neither input is mutated.
pub fn apply_merge_patch(existing: &Value, patch: &Value) -> EngineResult<Value> {
    let patch_obj = patch
        .as_object()
        .ok_or_else(|| EngineError::InvalidPatch("payload must be an object".to_string()))?;

    let mut merged = existing.clone();
    let merged_obj = merged
        .as_object_mut()
        .ok_or_else(|| EngineError::InvalidPatch("stored document is not an object".to_string()))?;

    for (field, value) in patch_obj {
        if !APPEND_FIELDS.contains(&field.as_str()) {
            return Err(EngineError::UnmergeableField(field.clone()));
        }

        let additions = value.as_array().ok_or_else(|| {
            EngineError::InvalidPatch(format!("field '{}' must be an array", field))
        })?;

        let target = merged_obj
            .entry(field.clone())
            .or_insert_with(|| Value::Array(Vec::new()));
        let existing_list = target.as_array_mut().ok_or_else(|| {
            EngineError::InvalidPatch(format!("stored field '{}' is not an array", field))
        })?;

        existing_list.extend(additions.iter().cloned());
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_append_preserves_order() {
        let existing = json!({"objectId": "p1", "linkedPlanServices": [{"objectId": "a"}, {"objectId": "b"}]});
        let patch = json!({"linkedPlanServices": [{"objectId": "x"}]});

        let merged = apply_merge_patch(&existing, &patch).unwrap();
        assert_eq!(
            merged["linkedPlanServices"],
            json!([{"objectId": "a"}, {"objectId": "b"}, {"objectId": "x"}])
        );
    }

    #[test]
    fn test_append_does_not_deduplicate() {
        let existing = json!({"objectId": "p1", "linkedPlanServices": [{"objectId": "a"}]});
        let patch = json!({"linkedPlanServices": [{"objectId": "a"}]});

        let merged = apply_merge_patch(&existing, &patch).unwrap();
        assert_eq!(merged["linkedPlanServices"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_existing_list_starts_empty() {
        let existing = json!({"objectId": "p1"});
        let patch = json!({"linkedPlanServices": [{"objectId": "x"}]});

        let merged = apply_merge_patch(&existing, &patch).unwrap();
        assert_eq!(merged["linkedPlanServices"], json!([{"objectId": "x"}]));
    }

    #[test]
    fn test_empty_patch_is_identity() {
        let existing = json!({"objectId": "p1", "linkedPlanServices": [{"objectId": "a"}]});
        let merged = apply_merge_patch(&existing, &json!({})).unwrap();
        assert_eq!(merged, existing);
    }

    #[test]
    fn test_unmergeable_field_rejected() {
        let existing = json!({"objectId": "p1"});
        let patch = json!({"planType": "outOfNetwork"});

        match apply_merge_patch(&existing, &patch) {
            Err(EngineError::UnmergeableField(field)) => assert_eq!(field, "planType"),
            other => panic!("expected unmergeable field, got {:?}", other),
        }
    }

    #[test]
    fn test_non_array_patch_value_rejected() {
        let existing = json!({"objectId": "p1"});
        let patch = json!({"linkedPlanServices": "oops"});
        assert!(matches!(
            apply_merge_patch(&existing, &patch),
            Err(EngineError::InvalidPatch(_))
        ));
    }

    #[test]
    fn test_non_object_patch_rejected() {
        let existing = json!({"objectId": "p1"});
        assert!(matches!(
            apply_merge_patch(&existing, &json!([1])),
            Err(EngineError::InvalidPatch(_))
        ));
    }

    #[test]
    fn test_inputs_not_mutated() {
        let existing = json!({"objectId": "p1", "linkedPlanServices": [{"objectId": "a"}]});
        let patch = json!({"linkedPlanServices": [{"objectId": "x"}]});
        let existing_before = existing.clone();

        let _ = apply_merge_patch(&existing, &patch).unwrap();
        assert_eq!(existing, existing_before);
    }
}
