//! Top-level facade crate for webMetrics.
//!
//! Re-exports the core instrumentation and the axum gateway so users can depend on a single crate.

pub mod core {
    pub use webmetrics_core::*;
}

pub mod gateway {
    pub use webmetrics_gateway::*;
}
