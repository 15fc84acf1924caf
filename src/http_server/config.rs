//! HTTP server configuration
//!
//! Configuration for the HTTP server including bind address, CORS
//! settings, and the token verifier.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::auth::JwtConfig;

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 3000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins (default: empty, permissive in development)
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Secret for bearer-token verification
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    /// Expected token issuer
    #[serde(default = "default_token_party")]
    pub jwt_issuer: String,

    /// Expected token audience
    #[serde(default = "default_token_party")]
    pub jwt_audience: String,

    /// Issued-token lifetime in minutes
    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: i64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_jwt_secret() -> String {
    "CHANGE_THIS_SECRET_IN_PRODUCTION".to_string()
}

fn default_token_party() -> String {
    "planvault".to_string()
}

fn default_token_ttl_minutes() -> i64 {
    15
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            jwt_secret: default_jwt_secret(),
            jwt_issuer: default_token_party(),
            jwt_audience: default_token_party(),
            token_ttl_minutes: default_token_ttl_minutes(),
        }
    }
}

impl ServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Token settings for the default verifier
    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.jwt_secret.clone(),
            access_token_ttl: Duration::minutes(self.token_ttl_minutes),
            issuer: self.jwt_issuer.clone(),
            audience: self.jwt_audience.clone(),
        }
    }

    /// Rejects configurations that cannot serve requests.
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("port must be > 0".to_string());
        }
        if self.jwt_secret.is_empty() {
            return Err("jwt_secret must not be empty".to_string());
        }
        if self.token_ttl_minutes <= 0 {
            return Err("token_ttl_minutes must be > 0".to_string());
        }
        Ok(())
    }
}
