//! Device token lookup for push delivery.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::id::UserId;

/// Trait for the per-user device token store.
///
/// A user has at most one registered token; registering again replaces the
/// previous one (the client re-registers whenever FCM rotates its token).
#[async_trait]
pub trait DeviceTokenStore: Send + Sync + std::fmt::Debug + 'static {
    /// Returns the registered device token for a user, if any.
    async fn token_for(&self, user_id: UserId) -> AppResult<Option<String>>;

    /// Registers (or replaces) the device token for a user.
    async fn register(&self, user_id: UserId, token: String) -> AppResult<()>;
}
