//! JWT claim set carried by Pulse access tokens.

use chrono::{DateTime, Utc};
use pulse_core::types::UserId;
use serde::{Deserialize, Serialize};

/// Claims embedded in every access token.
///
/// `sub` is the authenticated user id. `name` and `email` are optional
/// profile hints used for presence announcements and push notification
/// bodies; tokens minted by other services may omit them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user this token authenticates.
    pub sub: UserId,

    /// Display name, if the issuer included one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Email address, if the issuer included one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,

    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

impl Claims {
    /// Name to show other users, falling back to a generic label when the
    /// issuer did not embed one.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("User")
    }

    /// Expiry as a UTC timestamp.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Whether the token has expired relative to the current clock.
    pub fn is_expired(&self) -> bool {
        self.exp < Utc::now().timestamp()
    }
}
