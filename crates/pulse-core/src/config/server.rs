//! Listener and CORS settings.

use serde::{Deserialize, Serialize};

/// HTTP listener settings.
///
/// Missing fields in a partial `[server]` table fall back to the values in
/// the `Default` impl.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// How long shutdown waits for background tasks before giving up.
    pub shutdown_grace_seconds: u64,
    /// Browser cross-origin policy.
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_grace_seconds: 30,
            cors: CorsConfig::default(),
        }
    }
}

/// Cross-origin policy applied to the REST routes and the WebSocket
/// upgrade. The `"*"` wildcard is meant for development.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    /// Preflight cache lifetime, in seconds.
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            allowed_methods: ["GET", "POST", "OPTIONS"]
                .map(String::from)
                .to_vec(),
            allowed_headers: vec!["*".to_string()],
            max_age_seconds: 3600,
        }
    }
}
