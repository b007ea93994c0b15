//! Log output settings.

use serde::{Deserialize, Serialize};

/// Controls the `tracing` subscriber installed at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset. Accepts anything
    /// an `EnvFilter` does, from `"info"` to per-target directives.
    pub level: String,
    /// `"json"` for machine-readable lines, `"pretty"` for humans.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
        }
    }
}
