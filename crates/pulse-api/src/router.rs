//! Route table and middleware stack.
//!
//! Two surfaces share one router: REST under `/api`, and the WebSocket
//! upgrade at `/ws`. Compression, request tracing, and CORS wrap both.

use std::time::Duration;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::handlers::{device_token, health, ws};
use crate::state::AppState;

/// Builds the complete application router.
pub fn build_router(state: AppState) -> Router {
    let rest = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/detailed", get(health::detailed_health))
        .route("/users/fcm-token", post(device_token::register_fcm_token));

    let cors = cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", rest)
        .route("/ws", get(ws::ws_upgrade))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Translates [`CorsConfig`] into a `tower-http` layer.
///
/// A `"*"` entry in origins or headers selects the permissive `Any`;
/// concrete entries are parsed, and unparseable ones are logged and
/// skipped rather than failing startup.
///
/// [`CorsConfig`]: pulse_core::config::CorsConfig
fn cors_layer(config: &pulse_core::config::CorsConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    if config.allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "Skipping invalid CORS origin");
                    None
                }
            })
            .collect();
        cors = cors.allow_origin(origins);
    }

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|method| method.parse::<Method>().ok())
        .collect();
    cors = cors.allow_methods(methods);

    if config.allowed_headers.iter().any(|h| h == "*") {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<HeaderName> = config
            .allowed_headers
            .iter()
            .filter_map(|header| header.parse::<HeaderName>().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors.max_age(Duration::from_secs(config.max_age_seconds))
}
