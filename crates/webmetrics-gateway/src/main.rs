//! webMetrics demo gateway.
//!
//! Serves a few routes behind the request instrumentation, then logs the
//! final metrics snapshot on Ctrl-C.
//!
//! Config: `$WEBMETRICS_CONFIG` or `webmetrics.yaml`; defaults when absent.

use std::path::Path;

use tracing_subscriber::{fmt, EnvFilter};

use webmetrics_core::error::{Result, WebMetricsError};
use webmetrics_gateway::{app_state::AppState, config, router};

const DEFAULT_CONFIG: &str = "webmetrics.yaml";

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, kind = e.kind().as_str(), "webmetrics-gateway failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::var("WEBMETRICS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG.to_string());
    let cfg = if Path::new(&path).exists() {
        config::load_from_file(&path)?
    } else {
        tracing::warn!(%path, "config file not found, using defaults");
        config::GatewayConfig::default()
    };
    let listen = cfg.gateway.listen_addr()?;

    let state = AppState::new(cfg)?;
    let app = router::build_router(state.clone());

    tracing::info!(%listen, "webmetrics-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| WebMetricsError::Internal(format!("bind failed: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| WebMetricsError::Internal(format!("server failed: {e}")))?;

    let snapshot = serde_json::to_string(&state.store().snapshot())
        .map_err(|e| WebMetricsError::Internal(format!("snapshot encode failed: {e}")))?;
    tracing::info!(%snapshot, "final request metrics");

    state.metrics().shutdown();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler unavailable, shutting down");
    }
}
