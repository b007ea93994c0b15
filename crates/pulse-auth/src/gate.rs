//! Bearer token verification and the authenticated caller identity.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use pulse_core::config::AuthConfig;
use pulse_core::types::UserId;

use crate::claims::Claims;
use crate::error::AuthError;
use crate::revocation::RevocationList;

/// Identity established by a successful credential check.
///
/// Downstream components treat this as the sole source of caller identity;
/// user ids carried inside client payloads are never trusted over it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub display_name: String,
}

/// Validates bearer tokens for every WebSocket handshake and HTTP request.
#[derive(Clone)]
pub struct CredentialGate {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
    /// Tokens invalidated before their natural expiry.
    revocations: Arc<RevocationList>,
}

impl std::fmt::Debug for CredentialGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialGate")
            .field("validation", &self.validation)
            .field("revocations", &self.revocations.len())
            .finish()
    }
}

impl CredentialGate {
    /// Creates a new gate from auth configuration.
    pub fn new(config: &AuthConfig, revocations: Arc<RevocationList>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // 5 seconds leeway for clock skew

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            revocations,
        }
    }

    /// Verifies a presented token and resolves the caller identity.
    ///
    /// Checks, in order:
    /// 1. A token was presented at all
    /// 2. The token is not on the revocation list
    /// 3. Signature validity and expiry
    ///
    /// The revocation check runs before the token is decoded, so a token
    /// that is both revoked and expired is reported as revoked.
    pub fn verify(&self, token: Option<&str>) -> Result<AuthenticatedUser, AuthError> {
        let token = token.ok_or(AuthError::Missing)?;

        if self.revocations.contains(token) {
            return Err(AuthError::Revoked);
        }

        let data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
                    _ => AuthError::Invalid,
                }
            })?;

        let claims = data.claims;
        Ok(AuthenticatedUser {
            user_id: claims.sub,
            display_name: claims.display_name().to_string(),
        })
    }

    /// Revokes a token, typically on logout.
    ///
    /// The expiry claim is read with a lenient decode so the list entry can
    /// be pruned once the token would have died naturally; when the claim
    /// cannot be read the entry is kept for 24 hours.
    pub fn revoke(&self, token: &str) {
        let mut lenient = self.validation.clone();
        lenient.validate_exp = false;

        let expires_at = decode::<Claims>(token, &self.decoding_key, &lenient)
            .map(|data| data.claims.exp)
            .unwrap_or_else(|_| chrono::Utc::now().timestamp() + 86_400);

        self.revocations.revoke(token, expires_at);
    }

    /// The revocation list backing this gate.
    pub fn revocations(&self) -> &Arc<RevocationList> {
        &self.revocations
    }
}
