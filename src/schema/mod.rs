//! Schema validation for plan documents
//!
//! Validation is a collaborator of the engine, not part of it: the HTTP
//! layer validates payloads against the registered schema before any
//! decomposition or precondition work happens, through the
//! `DocumentValidator` trait. Tests substitute their own implementation.
//!
//! Validation semantics:
//! - All required fields are present
//! - No undeclared fields exist
//! - Field types exactly match schema types
//! - No null values, no implicit coercion, no defaults
//!
//! Two schemas ship built in: the full plan document schema (create and
//! replace) and the looser plan patch schema, which enumerates exactly
//! the fields a merge patch may carry.

mod errors;
mod registry;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, ValidationDetails};
pub use registry::{SchemaRegistry, PLAN_PATCH_SCHEMA, PLAN_SCHEMA};
pub use types::{FieldDef, FieldType, Schema};
pub use validator::SchemaValidator;

use serde_json::Value;

/// Document validation as seen by the rest of the system.
pub trait DocumentValidator: Send + Sync {
    /// Validates `document` against the schema registered under
    /// `schema_id`.
    fn validate(&self, schema_id: &str, document: &Value) -> SchemaResult<()>;
}
