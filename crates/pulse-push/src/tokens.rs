//! In-memory device token store.

use async_trait::async_trait;
use dashmap::DashMap;

use pulse_core::AppResult;
use pulse_core::traits::DeviceTokenStore;
use pulse_core::types::UserId;

/// Process-local [`DeviceTokenStore`].
///
/// Tokens live as long as the process; clients re-register on connect, so a
/// restart only delays push delivery until the next registration.
#[derive(Debug, Default)]
pub struct MemoryDeviceTokenStore {
    tokens: DashMap<UserId, String>,
}

impl MemoryDeviceTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl DeviceTokenStore for MemoryDeviceTokenStore {
    async fn token_for(&self, user_id: UserId) -> AppResult<Option<String>> {
        Ok(self.tokens.get(&user_id).map(|entry| entry.value().clone()))
    }

    async fn register(&self, user_id: UserId, token: String) -> AppResult<()> {
        self.tokens.insert(user_id, token);
        Ok(())
    }
}
