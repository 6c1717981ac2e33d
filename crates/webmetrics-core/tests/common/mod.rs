//! Shared fixtures for core integration tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use webmetrics_core::{
    BucketConfig, Counter, InMemoryMetrics, Meter, MetricName, MetricsBackend, ResponseSink, TimeUnit,
    Timer, WebMetricsError,
};

pub const NS: &str = "webmetrics";

/// `{200: ok, 404: notFound}` with catch-all `other`.
pub fn small_config() -> BucketConfig {
    let mut buckets = BTreeMap::new();
    buckets.insert(200, "ok".to_string());
    buckets.insert(404, "notFound".to_string());
    BucketConfig::new(buckets, "other")
}

pub fn meter_name(scope: &str, label: &str) -> MetricName {
    MetricName::scoped(NS, scope, label)
}

/// In-memory backend that also counts factory calls per name.
#[derive(Default)]
pub struct CountingBackend {
    pub inner: InMemoryMetrics,
    pub meter_calls: DashMap<MetricName, usize>,
    pub timer_calls: DashMap<MetricName, usize>,
    pub shutdowns: AtomicUsize,
}

impl CountingBackend {
    pub fn meter(&self, scope: &str, label: &str) -> u64 {
        self.inner.meter(&meter_name(scope, label)).unwrap_or(0)
    }

    pub fn timer(&self, scope: &str) -> u64 {
        self.inner.timer(&meter_name(scope, "requests")).unwrap_or(0)
    }

    pub fn meter_calls_for_scope(&self, scope: &str) -> usize {
        self.meter_calls
            .iter()
            .filter(|r| r.key().scope.as_deref() == Some(scope))
            .map(|r| *r.value())
            .sum()
    }

    pub fn active(&self) -> i64 {
        self.inner
            .counter(&MetricName::new(NS, "activeRequests"))
            .unwrap_or(0)
    }
}

impl MetricsBackend for CountingBackend {
    fn new_counter(&self, name: &MetricName) -> Arc<dyn Counter> {
        self.inner.new_counter(name)
    }

    fn new_meter(&self, name: &MetricName, event_type: &str, rate_unit: TimeUnit) -> Arc<dyn Meter> {
        *self.meter_calls.entry(name.clone()).or_insert(0) += 1;
        self.inner.new_meter(name, event_type, rate_unit)
    }

    fn new_timer(&self, name: &MetricName, duration_unit: TimeUnit, rate_unit: TimeUnit) -> Arc<dyn Timer> {
        *self.timer_calls.entry(name.clone()).or_insert(0) += 1;
        self.inner.new_timer(name, duration_unit, rate_unit)
    }

    fn shutdown(&self) {
        self.shutdowns.fetch_add(1, Ordering::Relaxed);
        self.inner.shutdown();
    }
}

/// Response sink that records every forwarded call.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<String>,
    pub fail_send_error: bool,
}

impl ResponseSink for RecordingSink {
    fn set_status(&mut self, code: u16) {
        self.calls.push(format!("set_status({code})"));
    }

    fn send_error(&mut self, code: u16) -> webmetrics_core::Result<()> {
        self.calls.push(format!("send_error({code})"));
        if self.fail_send_error {
            return Err(WebMetricsError::Response("connection reset".into()));
        }
        Ok(())
    }

    fn send_error_with_message(&mut self, code: u16, message: &str) -> webmetrics_core::Result<()> {
        self.calls.push(format!("send_error({code}, {message})"));
        if self.fail_send_error {
            return Err(WebMetricsError::Response("connection reset".into()));
        }
        Ok(())
    }
}
