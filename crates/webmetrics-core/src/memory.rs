//! In-process metrics store.
//!
//! A create-or-fetch backend with counters, meters and timers backed by
//! atomics inside `DashMap`s. Timer buckets are fixed in microseconds to
//! avoid floating point math on the hot path. Used by tests and the demo
//! gateway; production hosts can plug their own `MetricsBackend`.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::Serialize;

use crate::backend::{Counter, Meter, MetricName, MetricsBackend, TimeUnit, Timer};

// 100us, 500us, 1ms, 5ms, 10ms, 50ms, 100ms, 500ms, 1s
const BUCKETS_MICROS: [u64; 9] = [100, 500, 1_000, 5_000, 10_000, 50_000, 100_000, 500_000, 1_000_000];

#[derive(Default)]
struct MemCounter {
    value: AtomicI64,
}

impl Counter for MemCounter {
    fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }
    fn dec(&self) {
        self.value.fetch_sub(1, Ordering::Relaxed);
    }
    fn count(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }
}

struct MemMeter {
    count: AtomicU64,
    created: Instant,
    event_type: String,
    rate_unit: TimeUnit,
}

impl MemMeter {
    fn mean_rate(&self) -> f64 {
        let elapsed = self.rate_unit.convert(self.created.elapsed());
        if elapsed <= 0.0 {
            return 0.0;
        }
        self.count.load(Ordering::Relaxed) as f64 / elapsed
    }
}

impl Meter for MemMeter {
    fn mark(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }
    fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

struct MemTimer {
    count: AtomicU64,
    sum_micros: AtomicU64,
    max_micros: AtomicU64,
    buckets: [AtomicU64; 9],
    duration_unit: TimeUnit,
    rate_unit: TimeUnit,
}

impl MemTimer {
    fn new(duration_unit: TimeUnit, rate_unit: TimeUnit) -> Self {
        Self {
            count: AtomicU64::new(0),
            sum_micros: AtomicU64::new(0),
            max_micros: AtomicU64::new(0),
            buckets: Default::default(),
            duration_unit,
            rate_unit,
        }
    }

    fn mean(&self) -> f64 {
        let count = self.count.load(Ordering::Relaxed);
        if count == 0 {
            return 0.0;
        }
        let mean = Duration::from_micros(self.sum_micros.load(Ordering::Relaxed) / count);
        self.duration_unit.convert(mean)
    }
}

impl Timer for MemTimer {
    fn update(&self, elapsed: Duration) {
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);

        self.count.fetch_add(1, Ordering::Relaxed);
        self.sum_micros.fetch_add(micros, Ordering::Relaxed);
        self.max_micros.fetch_max(micros, Ordering::Relaxed);

        // Cumulative: every bucket at or above the value.
        for (i, &le) in BUCKETS_MICROS.iter().enumerate() {
            if micros <= le {
                self.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CounterSnapshot {
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeterSnapshot {
    pub name: String,
    pub event_type: String,
    pub count: u64,
    pub mean_rate: f64,
    pub rate_unit: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct BucketSnapshot {
    pub le_micros: u64,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimerSnapshot {
    pub name: String,
    pub count: u64,
    pub mean: f64,
    pub max: f64,
    pub duration_unit: &'static str,
    pub rate_unit: &'static str,
    pub buckets: Vec<BucketSnapshot>,
}

/// Point-in-time copy of every registered metric, sorted by name.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSnapshot {
    pub counters: Vec<CounterSnapshot>,
    pub meters: Vec<MeterSnapshot>,
    pub timers: Vec<TimerSnapshot>,
}

#[derive(Default)]
pub struct InMemoryMetrics {
    counters: DashMap<MetricName, Arc<MemCounter>>,
    meters: DashMap<MetricName, Arc<MemMeter>>,
    timers: DashMap<MetricName, Arc<MemTimer>>,
    closed: AtomicBool,
}

impl InMemoryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a counter, if registered.
    pub fn counter(&self, name: &MetricName) -> Option<i64> {
        self.counters.get(name).map(|c| c.count())
    }

    /// Number of marks on a meter, if registered.
    pub fn meter(&self, name: &MetricName) -> Option<u64> {
        self.meters.get(name).map(|m| m.count())
    }

    /// Number of observations on a timer, if registered.
    pub fn timer(&self, name: &MetricName) -> Option<u64> {
        self.timers.get(name).map(|t| t.count())
    }

    pub fn is_shut_down(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let mut counters: Vec<CounterSnapshot> = self
            .counters
            .iter()
            .map(|r| CounterSnapshot {
                name: r.key().to_string(),
                count: r.value().count(),
            })
            .collect();
        counters.sort_by(|a, b| a.name.cmp(&b.name));

        let mut meters: Vec<MeterSnapshot> = self
            .meters
            .iter()
            .map(|r| {
                let m = r.value();
                MeterSnapshot {
                    name: r.key().to_string(),
                    event_type: m.event_type.clone(),
                    count: m.count(),
                    mean_rate: m.mean_rate(),
                    rate_unit: m.rate_unit.as_str(),
                }
            })
            .collect();
        meters.sort_by(|a, b| a.name.cmp(&b.name));

        let mut timers: Vec<TimerSnapshot> = self
            .timers
            .iter()
            .map(|r| {
                let t = r.value();
                let max = Duration::from_micros(t.max_micros.load(Ordering::Relaxed));
                TimerSnapshot {
                    name: r.key().to_string(),
                    count: t.count(),
                    mean: t.mean(),
                    max: t.duration_unit.convert(max),
                    duration_unit: t.duration_unit.as_str(),
                    rate_unit: t.rate_unit.as_str(),
                    buckets: BUCKETS_MICROS
                        .iter()
                        .zip(t.buckets.iter())
                        .map(|(&le, n)| BucketSnapshot {
                            le_micros: le,
                            count: n.load(Ordering::Relaxed),
                        })
                        .collect(),
                }
            })
            .collect();
        timers.sort_by(|a, b| a.name.cmp(&b.name));

        MetricsSnapshot { counters, meters, timers }
    }
}

impl MetricsBackend for InMemoryMetrics {
    fn new_counter(&self, name: &MetricName) -> Arc<dyn Counter> {
        self
            .counters
            .entry(name.clone())
            .or_insert_with(|| Arc::new(MemCounter::default()))
            .value()
            .clone()
    }

    fn new_meter(&self, name: &MetricName, event_type: &str, rate_unit: TimeUnit) -> Arc<dyn Meter> {
        self
            .meters
            .entry(name.clone())
            .or_insert_with(|| {
                Arc::new(MemMeter {
                    count: AtomicU64::new(0),
                    created: Instant::now(),
                    event_type: event_type.to_string(),
                    rate_unit,
                })
            })
            .value()
            .clone()
    }

    fn new_timer(&self, name: &MetricName, duration_unit: TimeUnit, rate_unit: TimeUnit) -> Arc<dyn Timer> {
        self
            .timers
            .entry(name.clone())
            .or_insert_with(|| Arc::new(MemTimer::new(duration_unit, rate_unit)))
            .value()
            .clone()
    }

    /// Marks the store closed. Metrics stay readable.
    fn shutdown(&self) {
        if self.closed.swap(true, Ordering::Relaxed) {
            return;
        }
        tracing::info!(
            counters = self.counters.len(),
            meters = self.meters.len(),
            timers = self.timers.len(),
            "in-memory metrics shut down"
        );
    }
}
