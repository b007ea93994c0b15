//! Push fallback settings.

use serde::{Deserialize, Serialize};

/// Firebase Cloud Messaging fallback knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PushConfig {
    /// Turns the fallback on. When off, offline recipients are simply
    /// unreachable and delivery reports them as such.
    pub enabled: bool,
    /// Firebase service account key file (JSON).
    pub credentials_path: String,
    /// Ceiling on one provider HTTP call, in seconds.
    pub send_timeout_seconds: u64,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            credentials_path: "config/firebase-service-account.json".to_string(),
            send_timeout_seconds: 10,
        }
    }
}
