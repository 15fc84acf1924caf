//! Built-in schema registry
//!
//! Holds schemas in memory, indexed by id. The two built-in schemas
//! describe the plan document and the merge-patch payload. The patch
//! schema is deliberately looser: it enumerates exactly the fields a
//! patch may carry, and leaves list elements unconstrained.

use std::collections::HashMap;

use super::types::{FieldDef, FieldType, Schema};

/// Schema id for full plan documents (create, replace)
pub const PLAN_SCHEMA: &str = "plan";

/// Schema id for merge-patch payloads
pub const PLAN_PATCH_SCHEMA: &str = "plan.patch";

/// In-memory schema registry
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Schema>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in plan and patch schemas.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(plan_schema());
        registry.register(plan_patch_schema());
        registry
    }

    /// Registers a schema, replacing any previous one with the same id.
    pub fn register(&mut self, schema: Schema) {
        self.schemas.insert(schema.id.clone(), schema);
    }

    /// Looks up a schema by id.
    pub fn get(&self, schema_id: &str) -> Option<&Schema> {
        self.schemas.get(schema_id)
    }

    /// Reports whether a schema id is registered.
    pub fn contains(&self, schema_id: &str) -> bool {
        self.schemas.contains_key(schema_id)
    }
}

/// Cost-share sub-object shared by the plan and its services.
fn cost_shares_fields() -> HashMap<String, FieldDef> {
    HashMap::from([
        ("deductible".to_string(), FieldDef::optional(FieldType::Int)),
        ("copay".to_string(), FieldDef::optional(FieldType::Int)),
        ("_org".to_string(), FieldDef::optional(FieldType::String)),
        ("objectId".to_string(), FieldDef::required(FieldType::String)),
        (
            "objectType".to_string(),
            FieldDef::optional(FieldType::String),
        ),
    ])
}

fn linked_service_fields() -> HashMap<String, FieldDef> {
    HashMap::from([
        ("_org".to_string(), FieldDef::optional(FieldType::String)),
        ("objectId".to_string(), FieldDef::required(FieldType::String)),
        (
            "objectType".to_string(),
            FieldDef::optional(FieldType::String),
        ),
        ("name".to_string(), FieldDef::optional(FieldType::String)),
    ])
}

fn plan_service_fields() -> HashMap<String, FieldDef> {
    HashMap::from([
        ("_org".to_string(), FieldDef::optional(FieldType::String)),
        ("objectId".to_string(), FieldDef::required(FieldType::String)),
        (
            "objectType".to_string(),
            FieldDef::optional(FieldType::String),
        ),
        (
            "linkedService".to_string(),
            FieldDef::optional(FieldType::Object {
                fields: linked_service_fields(),
            }),
        ),
        (
            "planserviceCostShares".to_string(),
            FieldDef::optional(FieldType::Object {
                fields: cost_shares_fields(),
            }),
        ),
    ])
}

/// The full plan document schema.
///
/// Only `objectId` is required; the remaining fields are declared so
/// that undeclared fields are still rejected.
fn plan_schema() -> Schema {
    Schema {
        id: PLAN_SCHEMA.to_string(),
        fields: HashMap::from([
            ("objectId".to_string(), FieldDef::required(FieldType::String)),
            (
                "objectType".to_string(),
                FieldDef::optional(FieldType::String),
            ),
            ("_org".to_string(), FieldDef::optional(FieldType::String)),
            ("planType".to_string(), FieldDef::optional(FieldType::String)),
            (
                "creationDate".to_string(),
                FieldDef::optional(FieldType::String),
            ),
            (
                "planCostShares".to_string(),
                FieldDef::optional(FieldType::Object {
                    fields: cost_shares_fields(),
                }),
            ),
            (
                "linkedPlanServices".to_string(),
                FieldDef::optional(FieldType::Array {
                    element_type: Box::new(FieldType::Object {
                        fields: plan_service_fields(),
                    }),
                }),
            ),
        ]),
    }
}

/// The merge-patch payload schema.
///
/// Enumerates the complete set of patchable fields. `linkedPlanServices`
/// elements are unconstrained here; the append merge stores them
/// verbatim.
fn plan_patch_schema() -> Schema {
    Schema {
        id: PLAN_PATCH_SCHEMA.to_string(),
        fields: HashMap::from([(
            "linkedPlanServices".to_string(),
            FieldDef::optional(FieldType::Array {
                element_type: Box::new(FieldType::Any),
            }),
        )]),
    }
}
