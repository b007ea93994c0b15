//! Credential gate settings.

use serde::{Deserialize, Serialize};

/// Token validation and revocation knobs.
///
/// Pulse validates tokens minted by the account service; the shared HMAC
/// secret is the only coupling between the two. Issuance settings here
/// exist for the dev/test encoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC-SHA256 secret shared with the token issuer.
    pub jwt_secret: String,
    /// Lifetime of locally minted access tokens, in minutes.
    pub jwt_access_ttl_minutes: u64,
    /// How often the revocation list drops entries for expired tokens.
    pub revocation_prune_interval_hours: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "CHANGE_ME_IN_PRODUCTION".to_string(),
            jwt_access_ttl_minutes: 60,
            revocation_prune_interval_hours: 24,
        }
    }
}
