//! webMetrics core: per-request HTTP instrumentation primitives.
//!
//! This crate holds the bookkeeping behind the request-metrics middleware:
//! path keys, status buckets, the lazily-populated metric registry, the
//! request timer and the status-observing response decorator. It carries no
//! HTTP framework dependency; adapters (axum, ...) live in other crates.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Bookkeeping edge cases are absorbed; downstream failures pass through
//! untouched.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod backend;
pub mod config;
pub mod error;
pub mod memory;
pub mod middleware;
pub mod path;
pub mod registry;
pub mod response;
pub mod timer;

/// Shared result type.
pub use error::{Result, WebMetricsError};

pub use backend::{Counter, Meter, MetricName, MetricsBackend, TimeUnit, Timer, TimerContext};
pub use config::BucketConfig;
pub use memory::{InMemoryMetrics, MetricsSnapshot};
pub use middleware::{MetricsMiddleware, RequestScope};
pub use path::PathKey;
pub use registry::{MetricRegistry, PathMeters};
pub use response::{ResponseSink, StatusObservingResponse};
pub use timer::RequestTimer;
