//! Notification ledger: the persistence boundary for activity notifications.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::notification::NotificationRecord;

/// Trait for the notification history store.
///
/// The delivery layer only ever appends; listing, read-state mutation, and
/// cleanup belong to the REST layer that owns the store. Writes happen on
/// detached tasks, so an implementation must tolerate being called after
/// the originating delivery already completed.
#[async_trait]
pub trait NotificationLedger: Send + Sync + std::fmt::Debug + 'static {
    /// Appends one notification record.
    async fn create(&self, record: NotificationRecord) -> AppResult<()>;
}
