//! HTTP status interface.
//!
//! ## Endpoints
//!
//! - `GET  /`         — plain-text liveness banner
//! - `GET  /status`   — `{sensor_data, state, settings}` snapshot
//! - `POST /settings` — partial settings patch, answers `{"status": "ok"}`
//! - `GET  /health`   — loop state, cycle count, sensor degradation
//!
//! Handlers only copy shared values under their locks; no lock is held
//! across request I/O. Patch application writes the settings file, so it
//! runs on the blocking pool.

use std::future::Future;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use log::{error, info, warn};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use crate::app::shared::{SharedState, SystemSnapshot};
use crate::config::SettingsPatch;

pub const BANNER: &str = "Ventilation system running";

/// Build the router over `shared`.
pub fn router(shared: Arc<SharedState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/status", get(status))
        .route("/settings", post(update_settings))
        .route("/health", get(health))
        .with_state(shared)
}

/// Serve until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    shared: Arc<SharedState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Status interface listening on http://{}", addr);
    }
    axum::serve(listener, router(shared))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn index() -> &'static str {
    BANNER
}

async fn status(State(shared): State<Arc<SharedState>>) -> Json<SystemSnapshot> {
    Json(shared.snapshot())
}

async fn update_settings(
    State(shared): State<Arc<SharedState>>,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let patch = match SettingsPatch::from_json(&body) {
        Ok(p) => p,
        Err(e) => {
            warn!("Rejected settings patch: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "status": "error", "message": e.to_string() })),
            );
        }
    };

    let applied =
        tokio::task::spawn_blocking(move || shared.config().apply_patch(&patch)).await;

    match applied {
        Ok(Ok(_)) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Ok(Err(e)) => {
            warn!("Rejected settings patch: {}", e);
            let code = if e.is_client_error() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (
                code,
                Json(json!({ "status": "error", "message": e.to_string() })),
            )
        }
        Err(e) => {
            error!("Settings patch task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error", "message": "internal error" })),
            )
        }
    }
}

async fn health(State(shared): State<Arc<SharedState>>) -> Json<Value> {
    let h = shared.health();
    Json(json!({
        "status": "ok",
        "loop_state": if h.running { "running" } else { "stopped" },
        "cycles": h.cycles,
        "sensor_degraded": h.sensor_degraded,
    }))
}
