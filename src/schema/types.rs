//! Schema type definitions
//!
//! Supported types:
//! - string: UTF-8 string
//! - int: 64-bit signed integer
//! - bool: Boolean
//! - float: 64-bit floating point
//! - object: Nested object with field schema
//! - array: Homogeneous array with element type
//! - any: Unconstrained non-null value (used by the patch schema, whose
//!   list elements are validated only downstream)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Supported field types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Int,
    /// Boolean
    Bool,
    /// 64-bit floating point
    Float,
    /// Any non-null JSON value
    Any,
    /// Nested object with its own field schema
    Object {
        /// Nested field definitions
        fields: HashMap<String, FieldDef>,
    },
    /// Homogeneous array with single element type
    Array {
        /// Element type (boxed to allow recursive types)
        #[serde(rename = "element_type")]
        element_type: Box<FieldType>,
    },
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Bool => "bool",
            FieldType::Float => "float",
            FieldType::Any => "any",
            FieldType::Object { .. } => "object",
            FieldType::Array { .. } => "array",
        }
    }
}

/// Field definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field data type
    #[serde(flatten)]
    pub field_type: FieldType,
    /// Whether field must be present
    pub required: bool,
}

impl FieldDef {
    /// A required field of the given type
    pub fn required(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: true,
        }
    }

    /// An optional field of the given type
    pub fn optional(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
        }
    }
}

/// A named document schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Schema identifier
    pub id: String,
    /// Top-level field definitions
    pub fields: HashMap<String, FieldDef>,
}
