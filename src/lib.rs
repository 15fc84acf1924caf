//! planvault - A strict, self-hostable plan document store
//!
//! Plans are structured documents stored in a key-value backend with
//! content-derived version tags providing optimistic concurrency. The
//! core is the decomposition-and-conditional-store engine; auth, schema
//! validation, and transport are collaborators injected around it.

pub mod auth;
pub mod cli;
pub mod decompose;
pub mod engine;
pub mod fingerprint;
pub mod http_server;
pub mod observability;
pub mod schema;
pub mod store;
