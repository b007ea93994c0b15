//! Request bodies.

use serde::Deserialize;

/// Body of `POST /api/users/fcm-token`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDeviceTokenRequest {
    pub fcm_token: String,
}
