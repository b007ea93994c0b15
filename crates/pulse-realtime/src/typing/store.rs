//! Typing indicator state, keyed by sender.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use pulse_core::types::UserId;

use crate::connection::registry::ConnectionRegistry;
use crate::event::types::ServerEvent;

/// One user's in-progress typing activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingState {
    /// Who the sender is typing to.
    pub receiver: UserId,
    /// Last `typing` event from the sender.
    pub last_activity: DateTime<Utc>,
}

/// Tracks at most one [`TypingState`] per sender and forwards indicator
/// events to the receiver's live connection.
///
/// Indicators are ephemeral: never queued for offline receivers, never
/// pushed, and expired by the sweeper once idle past the configured TTL.
#[derive(Debug)]
pub struct TypingStore {
    entries: DashMap<UserId, TypingState>,
    registry: Arc<ConnectionRegistry>,
}

impl TypingStore {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self {
            entries: DashMap::new(),
            registry,
        }
    }

    /// Upserts the sender's typing state and notifies the receiver if live.
    pub fn set_typing(&self, sender: UserId, receiver: UserId) {
        self.entries.insert(
            sender,
            TypingState {
                receiver,
                last_activity: Utc::now(),
            },
        );
        self.registry.emit_to(
            receiver,
            ServerEvent::Typing {
                sender_id: sender,
                receiver_id: receiver,
                timestamp: Utc::now(),
            },
        );
    }

    /// Clears the sender's typing state; notifies the receiver only when an
    /// entry was actually removed, so a repeated clear is a strict no-op.
    pub fn clear_typing(&self, sender: UserId, receiver: UserId) {
        if self.entries.remove(&sender).is_some() {
            self.registry.emit_to(
                receiver,
                ServerEvent::StopTyping {
                    sender_id: sender,
                    receiver_id: receiver,
                    timestamp: Utc::now(),
                },
            );
        }
    }

    /// Clears the sender's typing state without notifying anyone. Invoked
    /// when the sender's chat message is routed: the arriving message
    /// replaces the indicator on the receiver's screen.
    pub fn clear_silent(&self, sender: UserId) {
        self.entries.remove(&sender);
    }

    /// Removes entries idle longer than `idle`. Returns how many were
    /// removed. Expiry does not notify receivers; their UI times the
    /// indicator out independently.
    pub fn sweep(&self, idle: Duration) -> usize {
        self.sweep_at(Utc::now(), idle)
    }

    fn sweep_at(&self, now: DateTime<Utc>, idle: Duration) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, state| now - state.last_activity <= idle);
        before - self.entries.len()
    }

    /// Current state for a sender, if any.
    pub fn state_of(&self, sender: UserId) -> Option<TypingState> {
        self.entries.get(&sender).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
