//! Push payload mapping.
//!
//! Decides which envelope kinds fall back to push at all, and what the
//! notification looks like when they do. Data values are strings because
//! FCM rejects non-string data fields.

use serde_json::{Map, Value};

use crate::delivery::envelope::{DeliveryEnvelope, EnvelopeKind};

/// Longest chat excerpt shown in a push body.
const BODY_EXCERPT_CHARS: usize = 100;

/// A fully-formed push notification ready for the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct PushNotice {
    pub title: String,
    pub body: String,
    pub data: Value,
}

impl PushNotice {
    /// Builds the push rendition of an envelope, or `None` for kinds that
    /// never fall back (seen receipts, ad-hoc notifications).
    pub fn for_envelope(envelope: &DeliveryEnvelope) -> Option<PushNotice> {
        match &envelope.kind {
            EnvelopeKind::ChatMessage {
                sender,
                message_id,
                text,
            } => {
                let sender_name = envelope.sender_name.as_deref().unwrap_or("Someone");
                let mut data = Map::new();
                data.insert("type".to_string(), Value::from("message"));
                data.insert("senderId".to_string(), Value::from(sender.to_string()));
                data.insert(
                    "receiverId".to_string(),
                    Value::from(envelope.recipient.to_string()),
                );
                data.insert("messageId".to_string(), Value::from(message_id.clone()));
                data.insert("text".to_string(), Value::from(text.clone()));
                data.insert("senderName".to_string(), Value::from(sender_name));
                data.insert(
                    "timestamp".to_string(),
                    Value::from(envelope.created_at.to_rfc3339()),
                );
                data.insert("showNotification".to_string(), Value::from("true"));

                Some(PushNotice {
                    title: "New Message".to_string(),
                    body: format!("{sender_name}: {}", excerpt(text)),
                    data: Value::Object(data),
                })
            }
            EnvelopeKind::ActivityNotification { record } => {
                let mut data = Map::new();
                data.insert("id".to_string(), Value::from(record.id.to_string()));
                data.insert("type".to_string(), Value::from(record.kind.as_str()));
                if let Some(entity) = &record.related_entity_id {
                    data.insert("relatedEntityId".to_string(), Value::from(entity.clone()));
                }
                if let Some(sender) = record.sender {
                    data.insert("senderId".to_string(), Value::from(sender.to_string()));
                }
                if let Some(name) = &envelope.sender_name {
                    data.insert("senderName".to_string(), Value::from(name.clone()));
                }

                Some(PushNotice {
                    title: record.kind.push_title().to_string(),
                    body: record.kind.push_body(envelope.sender_name.as_deref()),
                    data: Value::Object(data),
                })
            }
            EnvelopeKind::SeenReceipt { .. } | EnvelopeKind::Custom { .. } => None,
        }
    }
}

/// First `BODY_EXCERPT_CHARS` characters of a message, no suffix.
fn excerpt(text: &str) -> String {
    text.chars().take(BODY_EXCERPT_CHARS).collect()
}
