//! Notification domain types shared between the delivery layer and the ledger.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::{NotificationId, UserId};

/// Category of an activity notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    /// Someone liked the recipient's content.
    Like,
    /// Someone commented on the recipient's content.
    Comment,
    /// Someone sent the recipient a friend request.
    FriendRequest,
    /// A system-generated announcement.
    System,
}

impl NotificationType {
    /// Returns the wire representation of this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Comment => "comment",
            Self::FriendRequest => "friend_request",
            Self::System => "system",
        }
    }

    /// Title used when this notification is delivered as a push message.
    pub fn push_title(&self) -> &'static str {
        match self {
            Self::Like => "New Like",
            Self::Comment => "New Comment",
            Self::FriendRequest => "Friend Request",
            Self::System => "New Notification",
        }
    }

    /// Body used when this notification is delivered as a push message.
    pub fn push_body(&self, sender_name: Option<&str>) -> String {
        let who = sender_name.unwrap_or("Someone");
        match self {
            Self::Like => format!("{who} liked your post"),
            Self::Comment => format!("{who} commented on your post"),
            Self::FriendRequest => format!("{who} sent you a friend request"),
            Self::System => "You have a new notification".to_string(),
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An activity notification as handed to the [`NotificationLedger`].
///
/// The delivery layer mints the `id` locally so routing never waits on the
/// ledger; read-state mutation happens outside this subsystem.
///
/// [`NotificationLedger`]: crate::traits::NotificationLedger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// Ledger entry identifier (time-ordered).
    pub id: NotificationId,
    /// User the notification is addressed to.
    pub recipient: UserId,
    /// Acting user, if the notification has one (system notices do not).
    pub sender: Option<UserId>,
    /// Notification category.
    pub kind: NotificationType,
    /// Domain entity the notification refers to (post, comment, ...).
    pub related_entity_id: Option<String>,
    /// Whether the recipient has read the notification.
    pub read: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl NotificationRecord {
    /// Creates an unread record stamped now with a fresh time-ordered id.
    pub fn new(
        recipient: UserId,
        sender: Option<UserId>,
        kind: NotificationType,
        related_entity_id: Option<String>,
    ) -> Self {
        Self {
            id: NotificationId::now_v7(),
            recipient,
            sender,
            kind,
            related_entity_id,
            read: false,
            created_at: Utc::now(),
        }
    }
}
