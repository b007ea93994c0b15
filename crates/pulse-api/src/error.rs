//! HTTP error mapping.
//!
//! `pulse-core` stays free of HTTP types, so the translation from
//! [`AppError`] to a status code and JSON body lives here.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

use pulse_auth::AuthError;
use pulse_core::AppError;
use pulse_core::error::ErrorKind;

/// Wrapper that renders an [`AppError`] as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

/// JSON body returned for every failed request.
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: String,
    pub message: String,
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.kind {
            ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::ExternalService => StatusCode::BAD_GATEWAY,
            ErrorKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Internal | ErrorKind::Configuration | ErrorKind::Serialization => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            error!(kind = %self.0.kind, message = %self.0.message, "Request failed");
        }

        let body = ApiErrorResponse {
            error: self.0.kind.to_string(),
            message: self.0.message,
        };
        (status, Json(body)).into_response()
    }
}
