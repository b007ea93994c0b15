//! Shared application state.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use pulse_auth::CredentialGate;
use pulse_core::config::AppConfig;
use pulse_core::traits::DeviceTokenStore;
use pulse_realtime::RealtimeEngine;

/// State threaded through every handler via axum's `State` extractor.
///
/// Cheap to clone: every field is an `Arc` or a small copy type.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub gate: Arc<CredentialGate>,
    pub engine: Arc<RealtimeEngine>,
    pub device_tokens: Arc<dyn DeviceTokenStore>,
    /// Process start time, reported by the health endpoints.
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        config: Arc<AppConfig>,
        gate: Arc<CredentialGate>,
        engine: Arc<RealtimeEngine>,
        device_tokens: Arc<dyn DeviceTokenStore>,
    ) -> Self {
        Self {
            config,
            gate,
            engine,
            device_tokens,
            started_at: Utc::now(),
        }
    }

    /// Seconds elapsed since the state was constructed.
    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds().max(0)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}
