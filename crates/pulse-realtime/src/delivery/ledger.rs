//! In-memory notification ledger.

use async_trait::async_trait;
use dashmap::DashMap;

use pulse_core::AppResult;
use pulse_core::traits::NotificationLedger;
use pulse_core::types::{NotificationRecord, UserId};

/// Process-local [`NotificationLedger`].
///
/// The production deployment points the engine at the real store; this one
/// backs tests and single-process setups. Append-only, like the trait.
#[derive(Debug, Default)]
pub struct MemoryNotificationLedger {
    records: DashMap<UserId, Vec<NotificationRecord>>,
}

impl MemoryNotificationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records appended for one recipient, oldest first.
    pub fn records_for(&self, recipient: UserId) -> Vec<NotificationRecord> {
        self.records
            .get(&recipient)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Total records across all recipients.
    pub fn len(&self) -> usize {
        self.records.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl NotificationLedger for MemoryNotificationLedger {
    async fn create(&self, record: NotificationRecord) -> AppResult<()> {
        self.records
            .entry(record.recipient)
            .or_default()
            .push(record);
        Ok(())
    }
}
