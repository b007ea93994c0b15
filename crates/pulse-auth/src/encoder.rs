//! Access token minting.
//!
//! Pulse normally validates tokens issued elsewhere, but local tooling and
//! the integration tests need a way to mint compatible ones.

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use pulse_core::config::AuthConfig;
use pulse_core::error::ErrorKind;
use pulse_core::types::UserId;
use pulse_core::{AppError, AppResult};

use crate::claims::Claims;

/// Signs access tokens with the shared HMAC secret.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    access_ttl_minutes: i64,
}

impl JwtEncoder {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl_minutes: config.jwt_access_ttl_minutes as i64,
        }
    }

    /// Mint an HS256 access token for `user_id` with the configured TTL.
    pub fn issue(
        &self,
        user_id: UserId,
        name: Option<&str>,
        email: Option<&str>,
    ) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            name: name.map(String::from),
            email: email.map(String::from),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.access_ttl_minutes)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to sign access token", e)
        })
    }
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .finish_non_exhaustive()
    }
}
