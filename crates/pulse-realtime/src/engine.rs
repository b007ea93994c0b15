//! The realtime engine: owns the registry, typing store, router, and the
//! background tasks that keep them healthy.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use pulse_core::config::RealtimeConfig;
use pulse_core::traits::NotificationLedger;
use pulse_core::types::{NotificationRecord, NotificationType, UserId};
use pulse_push::PushFallback;

use crate::connection::handle::ConnectionHandle;
use crate::connection::registry::ConnectionRegistry;
use crate::delivery::envelope::{DeliveryEnvelope, DeliveryOutcome};
use crate::delivery::router::DeliveryRouter;
use crate::event::types::{ClientEvent, ServerEvent};
use crate::typing::store::TypingStore;
use crate::typing::sweeper::run_sweeper;

/// Largest inbound event frame the engine will decode.
const MAX_EVENT_BYTES: usize = 64 * 1024;

/// Coordinator for the realtime subsystem.
///
/// The socket layer drives it per connection (`connect`, `handle_event`,
/// `disconnect`); the REST layer enters through `deliver_notification`.
#[derive(Debug)]
pub struct RealtimeEngine {
    pub registry: Arc<ConnectionRegistry>,
    pub typing: Arc<TypingStore>,
    pub router: Arc<DeliveryRouter>,
    ledger: Arc<dyn NotificationLedger>,
    config: RealtimeConfig,
    shutdown_tx: broadcast::Sender<()>,
}

impl RealtimeEngine {
    pub fn new(
        config: RealtimeConfig,
        push: Arc<PushFallback>,
        ledger: Arc<dyn NotificationLedger>,
    ) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let typing = Arc::new(TypingStore::new(registry.clone()));
        let router = Arc::new(DeliveryRouter::new(registry.clone(), push));
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            registry,
            typing,
            router,
            ledger,
            config,
            shutdown_tx,
        }
    }

    /// Spawns the typing sweeper, bound to the engine's shutdown signal.
    pub fn start_sweeper(&self) {
        tokio::spawn(run_sweeper(
            self.typing.clone(),
            self.config.clone(),
            self.shutdown_tx.subscribe(),
        ));
    }

    /// Creates and registers a connection for an authenticated user.
    ///
    /// Returns the handle and the receiver the socket task drains into the
    /// wire. Presence side effects fire inside registration.
    pub fn connect(
        &self,
        user_id: UserId,
        display_name: impl Into<String>,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<ServerEvent>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size);
        let handle = Arc::new(ConnectionHandle::new(user_id, display_name.into(), tx));
        info!(
            user_id = %user_id,
            connection_id = %handle.id,
            "Connection established"
        );
        self.registry.register(handle.clone());
        (handle, rx)
    }

    /// Removes a connection at socket teardown. Handle-matched, so a
    /// superseded socket's teardown cannot evict its successor.
    pub fn disconnect(&self, handle: &ConnectionHandle) {
        if self.registry.remove(handle.user_id, handle.id) {
            info!(
                user_id = %handle.user_id,
                connection_id = %handle.id,
                "Connection removed"
            );
        }
    }

    /// Decodes and dispatches one inbound text frame.
    ///
    /// The single decode point for the wire: oversized and malformed frames
    /// are logged and dropped, everything else dispatches on the closed
    /// event union.
    pub async fn handle_event(&self, conn: &ConnectionHandle, raw: &str) {
        if raw.len() > MAX_EVENT_BYTES {
            warn!(
                connection_id = %conn.id,
                size = raw.len(),
                "Dropping oversized event frame"
            );
            return;
        }

        let event: ClientEvent = match serde_json::from_str(raw) {
            Ok(event) => event,
            Err(err) => {
                warn!(
                    connection_id = %conn.id,
                    error = %err,
                    "Dropping malformed event frame"
                );
                return;
            }
        };

        self.dispatch(conn, event).await;
    }

    async fn dispatch(&self, conn: &ConnectionHandle, event: ClientEvent) {
        match event {
            ClientEvent::Typing { receiver_id } => {
                self.typing.set_typing(conn.user_id, receiver_id);
            }
            ClientEvent::StopTyping { receiver_id } => {
                self.typing.clear_typing(conn.user_id, receiver_id);
            }
            ClientEvent::Message {
                receiver_id,
                text,
                message_id,
            } => {
                let envelope = DeliveryEnvelope::chat(
                    conn.user_id,
                    conn.display_name.clone(),
                    receiver_id,
                    message_id,
                    text,
                );
                let outcome = self.router.deliver(envelope).await;
                debug!(
                    sender = %conn.user_id,
                    recipient = %receiver_id,
                    outcome = ?outcome,
                    "Chat message routed"
                );
                // Sending a message ends the sender's typing indicator
                // without a stop_typing event; the arriving message
                // replaces it on the receiver's screen.
                self.typing.clear_silent(conn.user_id);
            }
            ClientEvent::MessageSeen {
                message_ids,
                sender_id,
            } => {
                let envelope =
                    DeliveryEnvelope::seen_receipt(conn.user_id, sender_id, message_ids);
                self.router.deliver(envelope).await;
            }
            ClientEvent::RequestUserStatuses { user_ids } => {
                conn.try_send(self.registry.user_statuses(&user_ids));
            }
            ClientEvent::SendNotification {
                target_user_id,
                kind,
                message,
            } => {
                let label = kind.unwrap_or_else(|| "custom".to_string());
                let envelope = DeliveryEnvelope::custom(
                    conn.user_id,
                    Some(conn.display_name.clone()),
                    target_user_id,
                    label,
                    message,
                );
                self.router.deliver(envelope).await;
            }
        }
    }

    /// Entry point for REST-side collaborators: persist an activity
    /// notification and route it.
    ///
    /// The record id is minted here and the ledger write runs on a detached
    /// task, so delivery latency never includes the store. A ledger failure
    /// is logged; the notification still routes.
    pub async fn deliver_notification(
        &self,
        recipient: UserId,
        sender: Option<UserId>,
        sender_name: Option<String>,
        kind: NotificationType,
        related_entity_id: Option<String>,
    ) -> DeliveryOutcome {
        let record = NotificationRecord::new(recipient, sender, kind, related_entity_id);

        let ledger = self.ledger.clone();
        let ledger_record = record.clone();
        tokio::spawn(async move {
            if let Err(err) = ledger.create(ledger_record).await {
                warn!(error = %err, "Notification ledger write failed");
            }
        });

        self.router
            .deliver(DeliveryEnvelope::activity(record, sender_name))
            .await
    }

    /// Signals background tasks to stop and force-closes every connection.
    pub fn shutdown(&self) {
        info!("Realtime engine shutting down");
        let _ = self.shutdown_tx.send(());
        self.registry.close_all();
    }
}
