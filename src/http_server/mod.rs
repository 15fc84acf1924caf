//! # Planvault HTTP Server
//!
//! HTTP surface for the plan engine: one router per concern, combined
//! into a unified axum server.
//!
//! # Endpoints
//!
//! - `/health` - Health check (no auth)
//! - `/v1/plan` - Create a plan
//! - `/v1/plan/{id}` - Read / replace / merge-patch / delete a plan,
//!   gated by `If-Match` / `If-None-Match` version tags

pub mod config;
pub mod errors;
pub mod plan_routes;
pub mod server;

pub use config::ServerConfig;
pub use errors::{ApiError, ApiResult};
pub use plan_routes::{plan_routes, PlanServiceState};
pub use server::PlanServer;
