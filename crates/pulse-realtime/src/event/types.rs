//! Wire protocol event types.
//!
//! Events travel as JSON text frames, discriminated by a snake_case `type`
//! tag with camelCase payload fields, matching the client protocol.
//! Both unions are closed: unknown inbound tags fail to parse and are
//! dropped at the transport boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pulse_core::types::{NotificationId, UserId};

/// Events a client may send.
///
/// Client payloads also carry the acting user's own id and name, but those
/// fields are deliberately not modeled here: the authenticated connection
/// identity is authoritative, so the server never reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// The sender started typing to `receiver_id`.
    #[serde(rename_all = "camelCase")]
    Typing { receiver_id: UserId },

    /// The sender stopped typing to `receiver_id`.
    #[serde(rename_all = "camelCase")]
    StopTyping { receiver_id: UserId },

    /// A chat message for `receiver_id`.
    #[serde(rename_all = "camelCase")]
    Message {
        receiver_id: UserId,
        text: String,
        message_id: String,
    },

    /// The sender has seen messages originally sent by `sender_id`.
    #[serde(rename_all = "camelCase")]
    MessageSeen {
        message_ids: Vec<String>,
        sender_id: UserId,
    },

    /// Bulk presence probe for `user_ids`.
    #[serde(rename_all = "camelCase")]
    RequestUserStatuses { user_ids: Vec<UserId> },

    /// Ad-hoc notification for `target_user_id` (live-only, not persisted).
    #[serde(rename_all = "camelCase")]
    SendNotification {
        target_user_id: UserId,
        #[serde(default, rename = "notificationType")]
        kind: Option<String>,
        message: String,
    },
}

/// Events the server emits.
///
/// Keepalive uses protocol-level Ping/Pong control frames, not application
/// events, so this list is exhaustive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Greeting to a connection that just completed its handshake.
    #[serde(rename_all = "camelCase")]
    Connected {
        message: String,
        user_id: UserId,
        timestamp: DateTime<Utc>,
    },

    /// A user's connection went live (broadcast to everyone).
    #[serde(rename_all = "camelCase")]
    UserOnline {
        user_id: UserId,
        user_name: String,
        timestamp: DateTime<Utc>,
    },

    /// A user's connection went away (broadcast to everyone).
    #[serde(rename_all = "camelCase")]
    UserOffline {
        user_id: UserId,
        user_name: String,
        timestamp: DateTime<Utc>,
    },

    /// Current live connection count (broadcast on every registry mutation).
    #[serde(rename_all = "camelCase")]
    ConnectedUsersCount { count: usize },

    /// `sender_id` is typing to `receiver_id` (sent to the receiver only).
    #[serde(rename_all = "camelCase")]
    Typing {
        sender_id: UserId,
        receiver_id: UserId,
        timestamp: DateTime<Utc>,
    },

    /// `sender_id` stopped typing to `receiver_id` (sent to the receiver only).
    #[serde(rename_all = "camelCase")]
    StopTyping {
        sender_id: UserId,
        receiver_id: UserId,
        timestamp: DateTime<Utc>,
    },

    /// A chat message delivered to its recipient's live connection.
    #[serde(rename_all = "camelCase")]
    Message {
        sender_id: UserId,
        receiver_id: UserId,
        text: String,
        message_id: String,
        timestamp: DateTime<Utc>,
        show_notification: bool,
    },

    /// Live-delivery acknowledgement sent back to the message sender.
    #[serde(rename_all = "camelCase")]
    MessageDelivered {
        message_id: String,
        receiver_id: UserId,
        timestamp: DateTime<Utc>,
    },

    /// Seen receipt forwarded to the original message sender.
    #[serde(rename_all = "camelCase")]
    MessageSeen {
        message_ids: Vec<String>,
        sender_id: UserId,
        timestamp: DateTime<Utc>,
    },

    /// Reply to a bulk presence probe.
    #[serde(rename_all = "camelCase")]
    UserStatuses { statuses: Vec<UserStatus> },

    /// Activity or ad-hoc notification (one schema, optional fields).
    #[serde(rename_all = "camelCase")]
    Notification {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<NotificationId>,
        #[serde(rename = "notificationType")]
        kind: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        sender_id: Option<UserId>,
        #[serde(skip_serializing_if = "Option::is_none")]
        sender_name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        related_entity_id: Option<String>,
        timestamp: DateTime<Utc>,
    },
}

/// One entry of a `user_statuses` reply.
///
/// `last_seen` is always present on the wire: `null` while the user is
/// online, the probe instant when offline. No true last-seen time is
/// tracked, so the offline value is a placeholder with known precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatus {
    pub user_id: UserId,
    pub is_online: bool,
    pub last_seen: Option<DateTime<Utc>>,
}
