//! Bearer-token authentication extractor.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use pulse_auth::AuthenticatedUser;

use crate::error::ApiError;
use crate::state::AppState;

/// Extractor that authenticates a request through the credential gate.
///
/// Rejects with 401 before the handler body runs, so handlers using it can
/// assume a verified identity.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthenticatedUser);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers);
        let user = state.gate.verify(token.as_deref())?;
        Ok(Self(user))
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}
