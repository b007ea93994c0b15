//! Connection registry: at most one live session per user.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info};

use pulse_core::types::UserId;

use super::handle::{ConnectionHandle, ConnectionId};
use crate::event::types::ServerEvent;
use crate::presence::broadcaster::PresenceBroadcaster;

/// Thread-safe registry of all live WebSocket connections, keyed by user.
///
/// The single-session invariant is enforced here: registering a handle for
/// a user who already has one atomically swaps the slot and force-closes
/// the superseded handle, so the per-user state never passes through
/// "absent" during a reconnect.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    /// User ID → their one live connection handle.
    sessions: DashMap<UserId, Arc<ConnectionHandle>>,
    /// Presence event formatting.
    presence: PresenceBroadcaster,
}

impl ConnectionRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection, superseding any previous session for the same user.
    ///
    /// Presence side effects fire in protocol order: `user_online` to every
    /// live connection, the `connected` greeting to the new connection, then
    /// the updated `connected_users_count` to everyone.
    pub fn register(&self, handle: Arc<ConnectionHandle>) {
        let user_id = handle.user_id;

        if let Some(superseded) = self.sessions.insert(user_id, handle.clone()) {
            info!(
                user_id = %user_id,
                old_connection = %superseded.id,
                new_connection = %handle.id,
                "Superseding existing session"
            );
            superseded.close();
        }

        self.broadcast(&self.presence.user_online(user_id, &handle.display_name));
        handle.try_send(self.presence.greeting(user_id));
        self.broadcast(&self.presence.connected_count(self.count()));
    }

    /// Removes a connection, but only when the stored handle matches
    /// `connection_id`.
    ///
    /// A teardown racing against a supersede therefore becomes a no-op: the
    /// registry already points at the newer handle, nothing is removed, and
    /// no presence events fire. Returns whether a removal happened.
    pub fn remove(&self, user_id: UserId, connection_id: ConnectionId) -> bool {
        let removed = self
            .sessions
            .remove_if(&user_id, |_, handle| handle.id == connection_id);

        match removed {
            Some((_, handle)) => {
                self.broadcast(&self.presence.user_offline(user_id, &handle.display_name));
                self.broadcast(&self.presence.connected_count(self.count()));
                true
            }
            None => {
                debug!(
                    user_id = %user_id,
                    connection_id = %connection_id,
                    "Stale disconnect ignored"
                );
                false
            }
        }
    }

    /// Current handle for a user, whether or not it is still live.
    pub fn lookup(&self, user_id: UserId) -> Option<Arc<ConnectionHandle>> {
        self.sessions.get(&user_id).map(|entry| entry.value().clone())
    }

    /// Current handle for a user, filtered to handles not yet flagged closed.
    pub fn live_handle(&self, user_id: UserId) -> Option<Arc<ConnectionHandle>> {
        self.lookup(user_id).filter(|handle| !handle.is_closed())
    }

    /// Whether a user has a live connection right now.
    pub fn is_live(&self, user_id: UserId) -> bool {
        self.live_handle(user_id).is_some()
    }

    /// Number of registered connections.
    pub fn count(&self) -> usize {
        self.sessions.len()
    }

    /// User IDs with a registered connection.
    pub fn identities(&self) -> Vec<UserId> {
        self.sessions.iter().map(|entry| *entry.key()).collect()
    }

    /// All registered connection handles.
    pub fn handles(&self) -> Vec<Arc<ConnectionHandle>> {
        self.sessions
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Sends an event to one user's live connection. Returns whether the
    /// event was enqueued.
    pub fn emit_to(&self, user_id: UserId, event: ServerEvent) -> bool {
        match self.live_handle(user_id) {
            Some(handle) => handle.try_send(event),
            None => false,
        }
    }

    /// Sends an event to every registered connection, best effort.
    pub fn broadcast(&self, event: &ServerEvent) {
        for entry in self.sessions.iter() {
            entry.value().try_send(event.clone());
        }
    }

    /// Builds a `user_statuses` reply for a bulk presence probe.
    pub fn user_statuses(&self, user_ids: &[UserId]) -> ServerEvent {
        let statuses = user_ids
            .iter()
            .map(|&id| self.presence.status_of(id, self.is_live(id)))
            .collect();
        self.presence.status_reply(statuses)
    }

    /// Force-closes every connection. Used at shutdown; the socket tasks
    /// observe their cancellation tokens and tear down normally.
    pub fn close_all(&self) {
        for entry in self.sessions.iter() {
            entry.value().close();
        }
    }
}
