//! Contract of the metrics collaborator.
//!
//! The middleware never aggregates or exports anything itself; it asks a
//! `MetricsBackend` for named counters/meters/timers and updates them.
//! Backends are create-or-fetch: requesting the same `MetricName` twice must
//! hand back the same instance.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Unique metric name: `(group, scope, name)`.
///
/// `scope` is the path key for per-path metrics and `None` for process-wide
/// ones (e.g. the active request counter).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetricName {
    pub group: String,
    pub scope: Option<String>,
    pub name: String,
}

impl MetricName {
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            scope: None,
            name: name.into(),
        }
    }

    pub fn scoped(group: impl Into<String>, scope: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            scope: Some(scope.into()),
            name: name.into(),
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Some(scope) => write!(f, "{}.{}.{}", self.group, scope, self.name),
            None => write!(f, "{}.{}", self.group, self.name),
        }
    }
}

/// Units for timer durations and meter/timer rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
}

impl TimeUnit {
    /// Express `d` in this unit.
    pub fn convert(self, d: Duration) -> f64 {
        let secs = d.as_secs_f64();
        match self {
            TimeUnit::Nanoseconds => secs * 1e9,
            TimeUnit::Microseconds => secs * 1e6,
            TimeUnit::Milliseconds => secs * 1e3,
            TimeUnit::Seconds => secs,
            TimeUnit::Minutes => secs / 60.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "ns",
            TimeUnit::Microseconds => "us",
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Seconds => "s",
            TimeUnit::Minutes => "min",
        }
    }
}

/// Point-in-time count that can go up and down.
pub trait Counter: Send + Sync {
    fn inc(&self);
    fn dec(&self);
    fn count(&self) -> i64;
}

/// Rate of events.
pub trait Meter: Send + Sync {
    fn mark(&self);
    fn count(&self) -> u64;
}

/// Duration distribution.
pub trait Timer: Send + Sync {
    fn update(&self, elapsed: Duration);
    fn count(&self) -> u64;
}

/// Running observation against one timer; recorded on `stop`.
pub struct TimerContext {
    timer: Arc<dyn Timer>,
    started: Instant,
}

impl TimerContext {
    pub fn start(timer: Arc<dyn Timer>) -> Self {
        Self {
            timer,
            started: Instant::now(),
        }
    }

    /// Record the elapsed time. Consumes the context so it records once.
    pub fn stop(self) -> Duration {
        let elapsed = self.started.elapsed();
        self.timer.update(elapsed);
        elapsed
    }
}

/// Create-or-fetch factory for named metrics.
pub trait MetricsBackend: Send + Sync {
    fn new_counter(&self, name: &MetricName) -> Arc<dyn Counter>;
    fn new_meter(&self, name: &MetricName, event_type: &str, rate_unit: TimeUnit) -> Arc<dyn Meter>;
    fn new_timer(&self, name: &MetricName, duration_unit: TimeUnit, rate_unit: TimeUnit) -> Arc<dyn Timer>;
    /// Release/flush. Idempotence is up to the implementation.
    fn shutdown(&self);
}
