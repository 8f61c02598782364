//! Local health endpoint, answered by the proxy itself. Never forwarded
//! upstream.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::http::server::AppState;

/// Service identifier reported by the health endpoint.
pub const SERVICE_NAME: &str = "llm-proxy-server";

/// Health payload. `uptime` is seconds since process start.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: String,
    pub uptime: f64,
}

/// Handle `/health` for any method.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        service: SERVICE_NAME,
        timestamp: Utc::now().to_rfc3339(),
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}
