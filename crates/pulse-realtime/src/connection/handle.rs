//! Individual WebSocket connection handle.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use pulse_core::types::UserId;

use crate::event::types::ServerEvent;

/// Unique connection identifier.
pub type ConnectionId = Uuid;

/// A handle to a single WebSocket connection.
///
/// Holds the sender channel for pushing events to the client, the cached
/// caller identity, and the cancellation token the socket task watches for
/// forced closes (supersede, shutdown).
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID, distinct from the user identity.
    pub id: ConnectionId,
    /// User who owns this connection.
    pub user_id: UserId,
    /// Display name cached from the credential at handshake time.
    pub display_name: String,
    /// Sender for outbound events.
    pub sender: mpsc::Sender<ServerEvent>,
    /// When the connection was established.
    pub connected_at: DateTime<Utc>,
    /// Cancelled when the connection must close.
    pub closed: CancellationToken,
    /// When the last pong frame arrived, in epoch milliseconds.
    last_pong: AtomicI64,
}

impl ConnectionHandle {
    /// Create a new connection handle.
    pub fn new(user_id: UserId, display_name: String, sender: mpsc::Sender<ServerEvent>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            display_name,
            sender,
            connected_at: now,
            closed: CancellationToken::new(),
            last_pong: AtomicI64::new(now.timestamp_millis()),
        }
    }

    /// Enqueue an outbound event without blocking.
    ///
    /// Returns `false` when the event was not enqueued: the connection is
    /// already closed, its buffer is full (the event is dropped with a
    /// warning), or the receiving task went away (the handle is closed).
    pub fn try_send(&self, event: ServerEvent) -> bool {
        if self.is_closed() {
            return false;
        }
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(
                    connection_id = %self.id,
                    user_id = %self.user_id,
                    "Connection send buffer full, dropping event"
                );
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.close();
                false
            }
        }
    }

    /// Signal the socket task to close this connection.
    pub fn close(&self) {
        self.closed.cancel();
    }

    /// Whether the connection has been flagged closed.
    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    /// Record an incoming pong frame.
    pub fn record_pong(&self) {
        self.last_pong
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    /// Time since the last pong frame arrived.
    pub fn pong_age(&self) -> std::time::Duration {
        let elapsed = Utc::now().timestamp_millis() - self.last_pong.load(Ordering::Relaxed);
        std::time::Duration::from_millis(elapsed.max(0) as u64)
    }
}
