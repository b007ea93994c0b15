//! Presence event construction.
//!
//! The registry owns the fan-out; this type owns the payload shapes, so
//! every presence event in the system is stamped in exactly one place.

use chrono::Utc;

use pulse_core::types::UserId;

use crate::event::types::{ServerEvent, UserStatus};

/// Builds the presence events broadcast on registry mutations and the
/// replies to bulk status probes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresenceBroadcaster;

impl PresenceBroadcaster {
    /// `user_online` announcement for a user whose connection went live.
    pub fn user_online(&self, user_id: UserId, user_name: &str) -> ServerEvent {
        ServerEvent::UserOnline {
            user_id,
            user_name: user_name.to_string(),
            timestamp: Utc::now(),
        }
    }

    /// `user_offline` announcement for a user whose connection went away.
    pub fn user_offline(&self, user_id: UserId, user_name: &str) -> ServerEvent {
        ServerEvent::UserOffline {
            user_id,
            user_name: user_name.to_string(),
            timestamp: Utc::now(),
        }
    }

    /// `connected_users_count` snapshot after a registry mutation.
    pub fn connected_count(&self, count: usize) -> ServerEvent {
        ServerEvent::ConnectedUsersCount { count }
    }

    /// Greeting sent to a connection that just completed its handshake.
    pub fn greeting(&self, user_id: UserId) -> ServerEvent {
        ServerEvent::Connected {
            message: "Connected to server".to_string(),
            user_id,
            timestamp: Utc::now(),
        }
    }

    /// One probe entry: `last_seen` is `null` while online and the probe
    /// instant when offline (no true last-seen is tracked).
    pub fn status_of(&self, user_id: UserId, is_online: bool) -> UserStatus {
        UserStatus {
            user_id,
            is_online,
            last_seen: if is_online { None } else { Some(Utc::now()) },
        }
    }

    /// Wraps probe entries into a `user_statuses` reply.
    pub fn status_reply(&self, statuses: Vec<UserStatus>) -> ServerEvent {
        ServerEvent::UserStatuses { statuses }
    }
}
