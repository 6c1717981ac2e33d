//! Request instrumentation orchestrator.
//!
//! Per request:
//! 1. wrap the response in a `StatusObservingResponse`
//! 2. derive the path key
//! 3. bump the active request counter
//! 4. start the request timer
//! 5. run downstream
//! 6. stop the timer, drop the counter, record the observed status
//!
//! Step 6 lives in `RequestScope::drop`, so it runs exactly once whether
//! downstream returns, fails, panics, or (for async hosts) is cancelled.

use std::sync::Arc;

use crate::backend::{Counter, MetricName, MetricsBackend};
use crate::config::BucketConfig;
use crate::error::Result;
use crate::path::PathKey;
use crate::registry::MetricRegistry;
use crate::response::{ResponseSink, StatusObservingResponse};
use crate::timer::RequestTimer;

/// Name of the process-wide in-flight request counter.
pub const ACTIVE_REQUESTS: &str = "activeRequests";

/// Construct once at startup, then share via Arc.
pub struct MetricsMiddleware {
    registry: MetricRegistry,
    active_requests: Arc<dyn Counter>,
}

impl MetricsMiddleware {
    pub fn new(backend: Arc<dyn MetricsBackend>, config: BucketConfig) -> Result<Self> {
        config.validate()?;
        let active_requests = backend.new_counter(&MetricName::new(&config.namespace, ACTIVE_REQUESTS));
        let registry = MetricRegistry::new(backend, config);
        Ok(Self {
            registry,
            active_requests,
        })
    }

    pub fn registry(&self) -> &MetricRegistry {
        &self.registry
    }

    /// Requests currently between `begin` and scope drop.
    pub fn active_requests(&self) -> i64 {
        self.active_requests.count()
    }

    /// Open the instrumentation scope for one request.
    ///
    /// Metrics are recorded when the returned scope is dropped.
    pub fn begin<R: ResponseSink>(&self, route_path: &str, response: R) -> RequestScope<'_, R> {
        let response = StatusObservingResponse::new(response);
        let path = PathKey::from_path(route_path);

        self.active_requests.inc();
        self.registry.resolve_status_bucket_map(&path);
        let mut timer = RequestTimer::new(path.clone());
        timer.start(&self.registry);

        RequestScope {
            middleware: self,
            path,
            timer,
            response,
        }
    }

    /// Run `downstream` inside a request scope.
    ///
    /// The downstream result is returned untouched, errors included; the
    /// metrics are recorded before this returns.
    pub fn handle<R, T, E, F>(&self, route_path: &str, response: R, downstream: F) -> std::result::Result<T, E>
    where
        R: ResponseSink,
        F: FnOnce(&mut StatusObservingResponse<R>) -> std::result::Result<T, E>,
    {
        let mut scope = self.begin(route_path, response);
        let out = downstream(scope.response_mut());
        drop(scope);
        out
    }

    /// Release the metrics backend.
    pub fn shutdown(&self) {
        tracing::info!(
            paths = self.registry.paths().len(),
            active = self.active_requests(),
            "metrics middleware shutting down"
        );
        self.registry.backend().shutdown();
    }
}

/// One in-flight request. Dropping it completes the bookkeeping.
pub struct RequestScope<'a, R: ResponseSink> {
    middleware: &'a MetricsMiddleware,
    path: PathKey,
    timer: RequestTimer,
    response: StatusObservingResponse<R>,
}

impl<R: ResponseSink> RequestScope<'_, R> {
    pub fn path(&self) -> &PathKey {
        &self.path
    }

    pub fn response(&self) -> &StatusObservingResponse<R> {
        &self.response
    }

    pub fn response_mut(&mut self) -> &mut StatusObservingResponse<R> {
        &mut self.response
    }
}

impl<R: ResponseSink> Drop for RequestScope<'_, R> {
    fn drop(&mut self) {
        self.timer.stop();
        self.middleware.active_requests.dec();
        self.middleware
            .registry
            .record_outcome(&self.path, self.response.status());
    }
}
