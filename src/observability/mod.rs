//! Observability for planvault
//!
//! Structured JSON logging with deterministic field ordering. One log
//! line is one event; writes are synchronous and unbuffered.

mod logger;

pub use logger::{Logger, Severity};
