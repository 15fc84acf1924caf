//! # HTTP Server
//!
//! Combines the health and plan routers into the unified service
//! entrypoint. All collaborators are constructed once here and injected
//! down: store into engine, engine plus verifier and validator into the
//! route state.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::auth::JwtManager;
use crate::engine::PlanEngine;
use crate::observability::Logger;
use crate::schema::SchemaValidator;
use crate::store::MemoryStore;

use super::config::ServerConfig;
use super::plan_routes::{plan_routes, PlanServiceState};

/// HTTP server for the plan service
pub struct PlanServer {
    config: ServerConfig,
    router: Router,
}

impl PlanServer {
    /// Create a new server with default configuration
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    /// Create a new server with custom configuration
    pub fn with_config(config: ServerConfig) -> Self {
        let router = Self::build_router(&config);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &ServerConfig) -> Router {
        let store = Arc::new(MemoryStore::new());
        let state = Arc::new(PlanServiceState {
            engine: PlanEngine::new(store),
            validator: Arc::new(SchemaValidator::with_builtin()),
            verifier: Arc::new(JwtManager::new(config.jwt_config())),
        });

        // Configure CORS from config
        let cors = if config.cors_origins.is_empty() {
            // If no origins configured, use permissive for development
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            use tower_http::cors::AllowOrigin;
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(health_routes())
            .nest("/v1", plan_routes(state))
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .expect("Invalid socket address");

        Logger::info(
            "server_started",
            &[("addr", addr.to_string().as_str()), ("service", "planvault")],
        );

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await?;

        Ok(())
    }
}

impl Default for PlanServer {
    fn default() -> Self {
        Self::new()
    }
}

/// Liveness probe, unauthenticated
fn health_routes() -> Router {
    Router::new().route("/health", get(health_handler))
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({"status": "ok", "service": "planvault"}))
}
