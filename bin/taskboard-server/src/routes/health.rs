//! Health / heartbeat endpoint.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use taskboard_types::timestamp;
use utoipa::OpenApi;

use crate::error::route_not_found;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(get_health))]
pub struct HealthApi;

/// Register health-check routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(get_health).fallback(route_not_found))
}

/// Heartbeat endpoint.
///
/// Returns `{"status": "ok", "server": "running", ...}` with the current
/// size of each collection under `data`.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Server is healthy", body = Value)
    )
)]
pub async fn get_health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status":    "ok",
        "server":    "running",
        "version":   env!("CARGO_PKG_VERSION"),
        "timestamp": timestamp::format(&timestamp::now()),
        "data": {
            "tasks":    state.store.tasks.len().await,
            "projects": state.store.projects.len().await,
        },
    }))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
