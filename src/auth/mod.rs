//! Identity verification
//!
//! Every plan route requires a bearer token. The engine and routes
//! depend on the `IdentityVerifier` trait rather than a concrete token
//! scheme, so tests can substitute their own verifier and deployments
//! can swap the token source without touching the core.
//!
//! The default implementation is `JwtManager`: stateless HS256
//! validation with issuer/audience checks and short-lived tokens.

mod errors;
mod jwt;

pub use errors::{AuthError, AuthResult};
pub use jwt::{JwtClaims, JwtConfig, JwtManager};

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Stable subject identifier
    pub subject: String,
    /// Caller's email, when the token carries one
    pub email: String,
}

/// Credential verification as seen by the rest of the system.
pub trait IdentityVerifier: Send + Sync {
    /// Verifies a bearer token and returns the authenticated principal,
    /// or rejects the credential.
    fn verify(&self, bearer_token: &str) -> AuthResult<Principal>;
}
