//! Device token registration for the push fallback.

use axum::Json;
use axum::extract::State;
use tracing::info;

use pulse_core::AppError;

use crate::dto::request::RegisterDeviceTokenRequest;
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// `POST /api/users/fcm-token`: stores the caller's device token.
///
/// Overwrites any previously registered token for the same user.
pub async fn register_fcm_token(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<RegisterDeviceTokenRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let token = body.fcm_token.trim();
    if token.is_empty() {
        return Err(AppError::validation("fcmToken must not be empty").into());
    }

    state
        .device_tokens
        .register(user.user_id, token.to_string())
        .await?;

    info!(user_id = %user.user_id, "FCM token registered");

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "FCM token saved successfully".to_string(),
    })))
}
