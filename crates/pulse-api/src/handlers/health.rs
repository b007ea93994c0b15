//! Health probes.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{DetailedHealthResponse, HealthResponse};
use crate::state::AppState;

/// `GET /api/health`: liveness probe.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
    })
}

/// `GET /api/health/detailed`: liveness plus subsystem snapshot.
pub async fn detailed_health(State(state): State<AppState>) -> Json<DetailedHealthResponse> {
    let push = if state.config.push.enabled {
        "enabled"
    } else {
        "disabled"
    };

    Json(DetailedHealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        connections: state.engine.registry.count(),
        push: push.to_string(),
    })
}
