//! Shared application state for the webMetrics gateway.
//!
//! Owns the in-memory metrics store and the middleware built on top of it.
//! Startup errors surface as `Result` instead of panics.

use std::sync::Arc;

use webmetrics_core::error::Result;
use webmetrics_core::{InMemoryMetrics, MetricsMiddleware};

use crate::config::GatewayConfig;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    store: Arc<InMemoryMetrics>,
    metrics: Arc<MetricsMiddleware>,
}

struct AppStateInner {
    cfg: GatewayConfig,
}

impl AppState {
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        let store = Arc::new(InMemoryMetrics::new());
        let metrics = MetricsMiddleware::new(store.clone(), cfg.metrics.clone())?;

        tracing::info!(
            namespace = %cfg.metrics.namespace,
            buckets = cfg.metrics.status_buckets.len(),
            other = %cfg.metrics.other_bucket,
            "request metrics ready"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg }),
            store,
            metrics: Arc::new(metrics),
        })
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> Arc<MetricsMiddleware> {
        Arc::clone(&self.metrics)
    }

    pub fn store(&self) -> Arc<InMemoryMetrics> {
        Arc::clone(&self.store)
    }
}
