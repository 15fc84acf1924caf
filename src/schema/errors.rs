//! Schema error types

use serde::Serialize;
use std::fmt;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Schema ID not registered
    UnknownSchema,
    /// Document violates the schema
    ValidationFailed,
}

impl SchemaErrorCode {
    /// Returns the string code reported to clients
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::UnknownSchema => "PLAN_UNKNOWN_SCHEMA",
            SchemaErrorCode::ValidationFailed => "PLAN_SCHEMA_VALIDATION_FAILED",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Validation failure details, serialized into 400 response bodies.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationDetails {
    /// Field path (e.g., "planCostShares.deductible")
    pub field: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(field, "field to be present", "missing")
    }

    pub fn extra_field(field: impl Into<String>) -> Self {
        Self::new(field, "no undeclared fields", "extra field present")
    }

    pub fn null_value(field: impl Into<String>) -> Self {
        Self::new(field, "non-null value", "null")
    }

    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::new(field, expected, actual)
    }
}

/// Schema error with enough structure for the caller to distinguish
/// unknown schemas from per-field validation failures.
#[derive(Debug, Clone)]
pub struct SchemaError {
    code: SchemaErrorCode,
    schema_id: String,
    details: Option<ValidationDetails>,
}

impl SchemaError {
    pub fn unknown_schema(schema_id: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::UnknownSchema,
            schema_id: schema_id.into(),
            details: None,
        }
    }

    pub fn validation_failed(schema_id: impl Into<String>, details: ValidationDetails) -> Self {
        Self {
            code: SchemaErrorCode::ValidationFailed,
            schema_id: schema_id.into(),
            details: Some(details),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the schema the document was validated against
    pub fn schema_id(&self) -> &str {
        &self.schema_id
    }

    /// Returns the per-field failure detail, if any
    pub fn details(&self) -> Option<&ValidationDetails> {
        self.details.as_ref()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] schema '{}'", self.code.code(), self.schema_id)?;
        if let Some(ref details) = self.details {
            write!(
                f,
                ": field '{}' expected {}, got {}",
                details.field, details.expected, details.actual
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchemaErrorCode::UnknownSchema.code(), "PLAN_UNKNOWN_SCHEMA");
        assert_eq!(
            SchemaErrorCode::ValidationFailed.code(),
            "PLAN_SCHEMA_VALIDATION_FAILED"
        );
    }

    #[test]
    fn test_display_contains_field_detail() {
        let err = SchemaError::validation_failed(
            "plan",
            ValidationDetails::type_mismatch("planCostShares.copay", "int", "string"),
        );
        let rendered = err.to_string();
        assert!(rendered.contains("PLAN_SCHEMA_VALIDATION_FAILED"));
        assert!(rendered.contains("planCostShares.copay"));
        assert!(rendered.contains("int"));
    }
}
