//! Document decomposition
//!
//! Splits a plan document into an ordered sequence of independently
//! addressable records: the root document itself, followed by one record
//! per object-valued field and one per element of each array-of-objects
//! field.
//!
//! Key derivation:
//!
//! ```text
//! root document          ->  <rootKey>
//! object field           ->  <rootKey>/<field>
//! array element (object) ->  <rootKey>/<field>/<index>
//! ```
//!
//! The rule is deterministic for a given root key and document shape,
//! collision-free across unrelated roots (every derived key is prefixed
//! by its root key), and stable across repeated decomposition of
//! unchanged content. Scalar fields and scalar array elements stay in
//! the root record only.
//!
//! Fragments are referenced-by the root, not owned-by it: they persist
//! independently and have no lifecycle operations of their own.

use serde_json::Value;

/// One record produced by decomposition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntity {
    pub key: String,
    pub bytes: Vec<u8>,
}

/// Decomposes `document` into its stored records, root first.
///
/// Serialization is `serde_json` with map keys in sorted order, so the
/// emitted bytes are stable for semantically equal documents.
pub fn decompose(root_key: &str, document: &Value) -> serde_json::Result<Vec<StoredEntity>> {
    let mut entities = vec![StoredEntity {
        key: root_key.to_string(),
        bytes: serde_json::to_vec(document)?,
    }];

    let Some(fields) = document.as_object() else {
        return Ok(entities);
    };

    for (field, value) in fields {
        match value {
            Value::Object(_) => {
                entities.push(StoredEntity {
                    key: format!("{}/{}", root_key, field),
                    bytes: serde_json::to_vec(value)?,
                });
            }
            Value::Array(elements) => {
                for (index, element) in elements.iter().enumerate() {
                    if element.is_object() {
                        entities.push(StoredEntity {
                            key: format!("{}/{}/{}", root_key, field, index),
                            bytes: serde_json::to_vec(element)?,
                        });
                    }
                }
            }
            _ => {}
        }
    }

    Ok(entities)
}
