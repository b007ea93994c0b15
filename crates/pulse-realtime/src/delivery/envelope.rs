//! The routed unit of work and its live payload mapping.

use chrono::{DateTime, Utc};

use pulse_core::types::{NotificationRecord, UserId};

use crate::event::types::ServerEvent;

/// What a delivery envelope carries.
///
/// Each kind holds the sender identity it renders; activity records may
/// have none (system notices).
#[derive(Debug, Clone)]
pub enum EnvelopeKind {
    /// A chat message. Falls back to push when the recipient is offline.
    ChatMessage {
        sender: UserId,
        message_id: String,
        text: String,
    },
    /// Seen receipt addressed to the original message sender. Live-only.
    SeenReceipt {
        seer: UserId,
        message_ids: Vec<String>,
    },
    /// Persisted activity notification. Falls back to push.
    ActivityNotification { record: NotificationRecord },
    /// Ad-hoc notification with a free-form label. Live-only.
    Custom {
        sender: UserId,
        label: String,
        message: String,
    },
}

impl EnvelopeKind {
    /// Short label for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ChatMessage { .. } => "chat_message",
            Self::SeenReceipt { .. } => "seen_receipt",
            Self::ActivityNotification { .. } => "activity_notification",
            Self::Custom { .. } => "custom",
        }
    }
}

/// A transient unit of routed work. Built, routed, dropped; never persisted
/// by the router.
#[derive(Debug, Clone)]
pub struct DeliveryEnvelope {
    pub kind: EnvelopeKind,
    /// Sender display name for notification bodies, when known.
    pub sender_name: Option<String>,
    pub recipient: UserId,
    pub created_at: DateTime<Utc>,
}

impl DeliveryEnvelope {
    /// Chat message from `sender` to `recipient`.
    pub fn chat(
        sender: UserId,
        sender_name: impl Into<String>,
        recipient: UserId,
        message_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            kind: EnvelopeKind::ChatMessage {
                sender,
                message_id: message_id.into(),
                text: text.into(),
            },
            sender_name: Some(sender_name.into()),
            recipient,
            created_at: Utc::now(),
        }
    }

    /// Seen receipt routed to `recipient`, the user whose messages `seer`
    /// just read.
    pub fn seen_receipt(seer: UserId, recipient: UserId, message_ids: Vec<String>) -> Self {
        Self {
            kind: EnvelopeKind::SeenReceipt { seer, message_ids },
            sender_name: None,
            recipient,
            created_at: Utc::now(),
        }
    }

    /// Activity notification wrapping an already-minted ledger record.
    pub fn activity(record: NotificationRecord, sender_name: Option<String>) -> Self {
        let recipient = record.recipient;
        Self {
            kind: EnvelopeKind::ActivityNotification { record },
            sender_name,
            recipient,
            created_at: Utc::now(),
        }
    }

    /// Ad-hoc notification from `sender` to `recipient`.
    pub fn custom(
        sender: UserId,
        sender_name: Option<String>,
        recipient: UserId,
        label: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: EnvelopeKind::Custom {
                sender,
                label: label.into(),
                message: message.into(),
            },
            sender_name,
            recipient,
            created_at: Utc::now(),
        }
    }

    /// The event emitted to the recipient's live connection.
    pub fn live_event(&self) -> ServerEvent {
        let timestamp = Utc::now();
        match &self.kind {
            EnvelopeKind::ChatMessage {
                sender,
                message_id,
                text,
            } => ServerEvent::Message {
                sender_id: *sender,
                receiver_id: self.recipient,
                text: text.clone(),
                message_id: message_id.clone(),
                timestamp,
                show_notification: true,
            },
            EnvelopeKind::SeenReceipt { seer, message_ids } => ServerEvent::MessageSeen {
                message_ids: message_ids.clone(),
                sender_id: *seer,
                timestamp,
            },
            EnvelopeKind::ActivityNotification { record } => ServerEvent::Notification {
                id: Some(record.id),
                kind: record.kind.as_str().to_string(),
                message: None,
                sender_id: record.sender,
                sender_name: self.sender_name.clone(),
                related_entity_id: record.related_entity_id.clone(),
                timestamp,
            },
            EnvelopeKind::Custom {
                sender,
                label,
                message,
            } => ServerEvent::Notification {
                id: None,
                kind: label.clone(),
                message: Some(message.clone()),
                sender_id: Some(*sender),
                sender_name: self.sender_name.clone(),
                related_entity_id: None,
                timestamp,
            },
        }
    }
}

/// Terminal result of routing one envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Emitted to the recipient's live connection.
    DeliveredLive,
    /// Recipient offline; the push provider accepted the notification.
    DeliveredPush,
    /// Not delivered anywhere. Terminal, never retried.
    Undeliverable,
}
