//! Auth error types

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication errors
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Authorization header missing or not a bearer credential
    #[error("Authorization header missing or invalid")]
    MissingBearer,

    /// Token is malformed
    #[error("Malformed token")]
    MalformedToken,

    /// Token has expired
    #[error("Token expired")]
    TokenExpired,

    /// Token signature is invalid
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Token generation failed
    #[error("Internal error: token generation failed")]
    TokenGenerationFailed,
}
