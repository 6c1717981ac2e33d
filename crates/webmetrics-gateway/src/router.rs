//! Axum router wiring.
//!
//! Every route, including the 404 fallback, runs inside `track_requests`.

use axum::{middleware, routing::get, Router};

use crate::{app_state::AppState, instrument::track_requests, routes};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/healthz", get(routes::healthz))
        .route("/items/:id", get(routes::item))
        .route("/fail", get(routes::fail))
        .fallback(routes::not_found)
        .layer(middleware::from_fn_with_state(state.metrics(), track_requests))
}
