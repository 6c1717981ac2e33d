//! Path-keyed metric registry.
//!
//! Two read-mostly maps: path key -> status meters, path key -> latency
//! timer. Reads go through `DashMap::get`; a miss falls back to
//! `entry().or_insert_with`, which holds the shard lock while the full meter
//! set is built, so each path is registered exactly once and no other thread
//! can observe a half-built entry. The aggregate (`total`) entries exist from
//! construction.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;

use crate::backend::{Meter, MetricName, MetricsBackend, TimeUnit, Timer};
use crate::config::BucketConfig;
use crate::path::PathKey;

/// Event type of status meters.
pub const RESPONSES_EVENT: &str = "responses";
/// Name of per-path latency timers.
pub const REQUESTS_TIMER: &str = "requests";

/// Status meters of a single path: one per configured code plus a catch-all.
pub struct PathMeters {
    by_status: HashMap<u16, Arc<dyn Meter>>,
    other: Arc<dyn Meter>,
}

impl PathMeters {
    /// Meter for `status`, or the catch-all when the code is not configured.
    pub fn meter_for(&self, status: u16) -> &Arc<dyn Meter> {
        self.by_status.get(&status).unwrap_or(&self.other)
    }

    pub fn other(&self) -> &Arc<dyn Meter> {
        &self.other
    }

    /// Number of meters including the catch-all.
    pub fn meter_count(&self) -> usize {
        self.by_status.len() + 1
    }

    fn mark(&self, status: u16) {
        self.meter_for(status).mark();
    }
}

pub struct MetricRegistry {
    backend: Arc<dyn MetricsBackend>,
    config: BucketConfig,
    meters: DashMap<PathKey, Arc<PathMeters>>,
    timers: DashMap<PathKey, Arc<dyn Timer>>,
}

impl MetricRegistry {
    /// Build the registry and pre-create the aggregate entries.
    pub fn new(backend: Arc<dyn MetricsBackend>, config: BucketConfig) -> Self {
        let registry = Self {
            backend,
            config,
            meters: DashMap::new(),
            timers: DashMap::new(),
        };
        let total = PathKey::total();
        let meters = registry.build_path_meters(&total);
        let timer = registry.build_timer(&total);
        registry.meters.insert(total.clone(), meters);
        registry.timers.insert(total, timer);
        registry
    }

    pub fn config(&self) -> &BucketConfig {
        &self.config
    }

    pub fn backend(&self) -> &Arc<dyn MetricsBackend> {
        &self.backend
    }

    /// Status meters for `path`, registering them on first sight.
    pub fn resolve_status_bucket_map(&self, path: &PathKey) -> Arc<PathMeters> {
        if let Some(existing) = self.meters.get(path) {
            return Arc::clone(existing.value());
        }
        let entry = self.meters.entry(path.clone()).or_insert_with(|| {
            tracing::debug!(path = %path, "registering status meters for new path");
            self.build_path_meters(path)
        });
        Arc::clone(entry.value())
    }

    /// Latency timer for `path`, registering it on first sight.
    pub fn resolve_timer(&self, path: &PathKey) -> Arc<dyn Timer> {
        if let Some(existing) = self.timers.get(path) {
            return Arc::clone(existing.value());
        }
        let entry = self.timers.entry(path.clone()).or_insert_with(|| {
            tracing::debug!(path = %path, "registering request timer for new path");
            self.build_timer(path)
        });
        Arc::clone(entry.value())
    }

    /// Mark the status meter for `path`, and for the aggregate unless `path`
    /// is the aggregate itself.
    pub fn record_outcome(&self, path: &PathKey, status: u16) {
        self.resolve_status_bucket_map(path).mark(status);
        if !path.is_total() {
            self.resolve_status_bucket_map(&PathKey::total()).mark(status);
        }
    }

    /// Paths currently registered (including `total`).
    pub fn paths(&self) -> Vec<PathKey> {
        let mut paths: Vec<PathKey> = self.meters.iter().map(|r| r.key().clone()).collect();
        paths.sort();
        paths
    }

    fn build_path_meters(&self, path: &PathKey) -> Arc<PathMeters> {
        let group = &self.config.namespace;
        let by_status = self
            .config
            .status_buckets
            .iter()
            .map(|(&code, label)| {
                let name = MetricName::scoped(group, path.as_str(), label);
                (code, self.backend.new_meter(&name, RESPONSES_EVENT, TimeUnit::Seconds))
            })
            .collect();
        let other_name = MetricName::scoped(group, path.as_str(), &self.config.other_bucket);
        let other = self.backend.new_meter(&other_name, RESPONSES_EVENT, TimeUnit::Seconds);
        Arc::new(PathMeters { by_status, other })
    }

    fn build_timer(&self, path: &PathKey) -> Arc<dyn Timer> {
        let name = MetricName::scoped(&self.config.namespace, path.as_str(), REQUESTS_TIMER);
        self.backend.new_timer(&name, TimeUnit::Milliseconds, TimeUnit::Seconds)
    }
}
