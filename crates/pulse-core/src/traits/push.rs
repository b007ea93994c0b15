//! Push provider trait for asynchronous notification transports.

use async_trait::async_trait;
use serde_json::Value;

use crate::result::AppResult;

/// Trait for push transports (FCM, or a stub when push is disabled).
///
/// A call delivers at most one notification and is never retried by the
/// caller; a returned error means the attempt is spent.
#[async_trait]
pub trait PushProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Send one push notification to a device token.
    ///
    /// `data` carries the auxiliary payload shown to the client application.
    /// Values should be strings; FCM rejects non-string data fields.
    async fn send(&self, device_token: &str, title: &str, body: &str, data: Value)
    -> AppResult<()>;
}
