//! Strict document validator
//!
//! Walks a document against a registered schema. The validator does not
//! mutate documents and validation is deterministic.

use serde_json::Value;
use std::collections::HashMap;

use super::errors::{SchemaError, SchemaResult, ValidationDetails};
use super::registry::SchemaRegistry;
use super::types::{FieldDef, FieldType};
use super::DocumentValidator;

/// Schema validator backed by a registry.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    registry: SchemaRegistry,
}

impl SchemaValidator {
    /// Creates a validator over the given registry.
    pub fn new(registry: SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Creates a validator holding the built-in plan schemas.
    pub fn with_builtin() -> Self {
        Self::new(SchemaRegistry::with_builtin())
    }

    fn validate_document(&self, schema_id: &str, document: &Value) -> SchemaResult<()> {
        let schema = self
            .registry
            .get(schema_id)
            .ok_or_else(|| SchemaError::unknown_schema(schema_id))?;

        let doc_obj = document.as_object().ok_or_else(|| {
            SchemaError::validation_failed(
                schema_id,
                ValidationDetails::type_mismatch("$root", "object", json_type_name(document)),
            )
        })?;

        self.validate_object(schema_id, doc_obj, &schema.fields, "")
    }

    fn validate_object(
        &self,
        schema_id: &str,
        obj: &serde_json::Map<String, Value>,
        fields: &HashMap<String, FieldDef>,
        path_prefix: &str,
    ) -> SchemaResult<()> {
        // No undeclared fields allowed
        for key in obj.keys() {
            if !fields.contains_key(key) {
                return Err(SchemaError::validation_failed(
                    schema_id,
                    ValidationDetails::extra_field(make_path(path_prefix, key)),
                ));
            }
        }

        for (field_name, field_def) in fields {
            let field_path = make_path(path_prefix, field_name);

            match obj.get(field_name) {
                Some(value) => {
                    if value.is_null() {
                        return Err(SchemaError::validation_failed(
                            schema_id,
                            ValidationDetails::null_value(&field_path),
                        ));
                    }
                    self.validate_value(schema_id, value, &field_def.field_type, &field_path)?;
                }
                None => {
                    if field_def.required {
                        return Err(SchemaError::validation_failed(
                            schema_id,
                            ValidationDetails::missing_field(field_path),
                        ));
                    }
                }
            }
        }

        Ok(())
    }

    fn validate_value(
        &self,
        schema_id: &str,
        value: &Value,
        expected_type: &FieldType,
        field_path: &str,
    ) -> SchemaResult<()> {
        match expected_type {
            FieldType::String => {
                if !value.is_string() {
                    return Err(type_error(schema_id, field_path, "string", value));
                }
            }
            FieldType::Int => {
                // Must be an integer, not a float
                if !value.is_i64() && !value.is_u64() {
                    return Err(type_error(schema_id, field_path, "int", value));
                }
            }
            FieldType::Bool => {
                if !value.is_boolean() {
                    return Err(type_error(schema_id, field_path, "bool", value));
                }
            }
            FieldType::Float => {
                // Integers are acceptable floats
                if !value.is_number() {
                    return Err(type_error(schema_id, field_path, "float", value));
                }
            }
            FieldType::Any => {
                // Anything non-null; nulls were rejected by the caller
            }
            FieldType::Object { fields } => {
                let obj = value
                    .as_object()
                    .ok_or_else(|| type_error(schema_id, field_path, "object", value))?;
                self.validate_object(schema_id, obj, fields, field_path)?;
            }
            FieldType::Array { element_type } => {
                let arr = value
                    .as_array()
                    .ok_or_else(|| type_error(schema_id, field_path, "array", value))?;

                for (i, elem) in arr.iter().enumerate() {
                    let elem_path = format!("{}[{}]", field_path, i);
                    if elem.is_null() {
                        return Err(SchemaError::validation_failed(
                            schema_id,
                            ValidationDetails::null_value(&elem_path),
                        ));
                    }
                    self.validate_value(schema_id, elem, element_type, &elem_path)?;
                }
            }
        }

        Ok(())
    }
}

impl DocumentValidator for SchemaValidator {
    fn validate(&self, schema_id: &str, document: &Value) -> SchemaResult<()> {
        self.validate_document(schema_id, document)
    }
}

fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

fn type_error(schema_id: &str, field_path: &str, expected: &str, actual: &Value) -> SchemaError {
    SchemaError::validation_failed(
        schema_id,
        ValidationDetails::type_mismatch(field_path, expected, json_type_name(actual)),
    )
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_i64() || n.is_u64() => "int",
        Value::Number(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
