//! webMetrics gateway library entry.
//!
//! Mounts the core request instrumentation on axum: the `track_requests`
//! middleware, strict YAML config loading, shared state and a small demo
//! router. Consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod instrument;
pub mod router;
pub mod routes;
