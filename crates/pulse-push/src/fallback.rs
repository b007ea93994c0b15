//! Single-attempt push fallback.
//!
//! Delivery routes here when the recipient has no live connection. The
//! policy is at-most-once: the provider is called exactly once per
//! fallback, and a provider failure is logged and absorbed rather than
//! propagated, so a flaky push channel can never fail live delivery paths.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use pulse_core::AppResult;
use pulse_core::traits::{DeviceTokenStore, PushProvider};
use pulse_core::types::UserId;

/// What became of a push fallback attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// The provider accepted the notification.
    Accepted,
    /// The recipient has no registered device token; nothing was sent.
    NoToken,
    /// The token lookup or the provider call failed. The attempt is spent.
    ProviderError,
}

/// Resolves a recipient to a device token and makes one provider call.
#[derive(Debug)]
pub struct PushFallback {
    tokens: Arc<dyn DeviceTokenStore>,
    provider: Arc<dyn PushProvider>,
}

impl PushFallback {
    pub fn new(tokens: Arc<dyn DeviceTokenStore>, provider: Arc<dyn PushProvider>) -> Self {
        Self { tokens, provider }
    }

    /// Attempt one push to `recipient`. Never retries and never errors.
    pub async fn send_push(
        &self,
        recipient: UserId,
        title: &str,
        body: &str,
        data: Value,
    ) -> PushOutcome {
        let token = match self.tokens.token_for(recipient).await {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!(user_id = %recipient, "No device token registered, skipping push");
                return PushOutcome::NoToken;
            }
            Err(err) => {
                warn!(user_id = %recipient, error = %err, "Device token lookup failed");
                return PushOutcome::ProviderError;
            }
        };

        match self.provider.send(&token, title, body, data).await {
            Ok(()) => {
                debug!(user_id = %recipient, "Push notification dispatched");
                PushOutcome::Accepted
            }
            Err(err) => {
                warn!(user_id = %recipient, error = %err, "Push provider rejected the notification");
                PushOutcome::ProviderError
            }
        }
    }
}

/// Provider used when no push credentials are configured.
///
/// Every send fails, which the fallback records as [`PushOutcome::ProviderError`]
/// without disturbing live delivery.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledPushProvider;

#[async_trait::async_trait]
impl PushProvider for DisabledPushProvider {
    async fn send(
        &self,
        _device_token: &str,
        _title: &str,
        _body: &str,
        _data: Value,
    ) -> AppResult<()> {
        Err(pulse_core::AppError::service_unavailable(
            "Push delivery is disabled",
        ))
    }
}
