//! Rejection taxonomy for credential checks.

use pulse_core::AppError;
use thiserror::Error;

/// Why a presented credential was rejected.
///
/// The variants are checked in a fixed order by the gate: a missing token is
/// reported before anything else, and a revoked token is reported before the
/// token is ever decoded. A token that is both revoked and expired therefore
/// surfaces as [`AuthError::Revoked`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No token was presented at all.
    #[error("Access token required")]
    Missing,

    /// The token matches an entry on the revocation list.
    #[error("Token has been revoked")]
    Revoked,

    /// The token failed signature or structural validation.
    #[error("Invalid token")]
    Invalid,

    /// The token was well formed but its expiry has passed.
    #[error("Token has expired")]
    Expired,
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::authentication(err.to_string())
    }
}
