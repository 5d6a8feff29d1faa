//! Health check endpoint

use axum::{Json, extract::State};
use serde_json::{Value, json};
use tracing::debug;

use super::AppState;

/// Liveness plus a little context: version, start time, uptime and the
/// store revision (number of committed field changes)
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    debug!("Health check requested");

    Json(json!({
        "status": "UP",
        "version": env!("CARGO_PKG_VERSION"),
        "started_at": state.started_at.to_rfc3339(),
        "uptime_secs": state.uptime_secs(),
        "revision": state.engine.query().revision().await,
    }))
}
