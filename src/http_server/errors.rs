//! # HTTP API Errors
//!
//! Error types for the plan routes. Every engine, schema, and auth
//! failure maps to one HTTP status, and the JSON body carries enough
//! structure for the caller to distinguish the failure kinds.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;
use crate::engine::EngineError;
use crate::schema::{SchemaError, ValidationDetails};

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Plan API errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Credential missing or rejected
    #[error("Unauthorized")]
    Unauthorized(#[from] AuthError),

    /// Payload failed schema validation
    #[error("Validation failed")]
    Validation(#[from] SchemaError),

    /// Engine operation failed
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Engine(engine) => match engine {
                EngineError::NotFound(_) => StatusCode::NOT_FOUND,
                EngineError::PreconditionFailed { .. } => StatusCode::PRECONDITION_FAILED,
                EngineError::MissingObjectId
                | EngineError::UnmergeableField(_)
                | EngineError::InvalidPatch(_) => StatusCode::BAD_REQUEST,
                EngineError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
                EngineError::PartialWrite { .. }
                | EngineError::CorruptRecord { .. }
                | EngineError::Serialize(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Machine-readable code for failure kinds a caller may act on
    fn code(&self) -> Option<&'static str> {
        match self {
            ApiError::Engine(EngineError::PartialWrite { .. }) => Some("PARTIAL_WRITE"),
            ApiError::Engine(EngineError::Store(_)) => Some("BACKEND_UNAVAILABLE"),
            _ => None,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Unauthorized(_) => "Unauthorized".to_string(),
            ApiError::Validation(_) => "Validation failed".to_string(),
            ApiError::Engine(engine) => match engine {
                EngineError::NotFound(_) => "Plan not found".to_string(),
                EngineError::PreconditionFailed { .. } => {
                    "Precondition failed - version tag mismatch".to_string()
                }
                other => other.to_string(),
            },
        }
    }

    fn validation_errors(&self) -> Option<Vec<ValidationDetails>> {
        match self {
            ApiError::Validation(schema_err) => {
                schema_err.details().map(|d| vec![d.clone()])
            }
            _ => None,
        }
    }
}

/// JSON error body
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<ValidationDetails>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            message: self.message(),
            code: self.code(),
            errors: self.validation_errors(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
