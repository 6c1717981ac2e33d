//! axum adapter for the request instrumentation.
//!
//! `track_requests` opens a `RequestScope` before the inner service runs
//! and keeps it alive across the await. The scope records on drop, so a
//! handler panic or a dropped request future (client gone, timeout layer)
//! still releases the active request count and stops the timers.

use std::sync::Arc;

use axum::{extract::Request, extract::State, middleware::Next, response::Response};
use webmetrics_core::{MetricsMiddleware, ResponseSink};

/// Response sink for hosts where the status is only known once the inner
/// future resolves. It keeps the code and nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeferredStatus {
    status: Option<u16>,
}

impl DeferredStatus {
    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

impl ResponseSink for DeferredStatus {
    fn set_status(&mut self, code: u16) {
        self.status = Some(code);
    }

    fn send_error(&mut self, code: u16) -> webmetrics_core::Result<()> {
        self.status = Some(code);
        Ok(())
    }

    fn send_error_with_message(&mut self, code: u16, _message: &str) -> webmetrics_core::Result<()> {
        self.status = Some(code);
        Ok(())
    }
}

/// Middleware for `axum::middleware::from_fn_with_state`.
///
/// ```ignore
/// let app = Router::new()
///     .route("/items/:id", get(item))
///     .layer(middleware::from_fn_with_state(metrics, track_requests));
/// ```
pub async fn track_requests(
    State(metrics): State<Arc<MetricsMiddleware>>,
    request: Request,
    next: Next,
) -> Response {
    let mut scope = metrics.begin(request.uri().path(), DeferredStatus::default());

    let response = next.run(request).await;

    scope.response_mut().set_status(response.status().as_u16());
    drop(scope);
    response
}
