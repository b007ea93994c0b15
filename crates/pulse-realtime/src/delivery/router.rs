//! Two-tier delivery routing.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use pulse_push::{PushFallback, PushOutcome};

use crate::connection::registry::ConnectionRegistry;
use crate::delivery::envelope::{DeliveryEnvelope, DeliveryOutcome, EnvelopeKind};
use crate::delivery::notice::PushNotice;
use crate::event::types::ServerEvent;

/// Routes envelopes live-first with a single push fallback.
///
/// At-most-once: a failed push is never retried, and the router never
/// touches the notification ledger. Every envelope resolves to exactly one
/// [`DeliveryOutcome`].
#[derive(Debug)]
pub struct DeliveryRouter {
    registry: Arc<ConnectionRegistry>,
    push: Arc<PushFallback>,
}

impl DeliveryRouter {
    pub fn new(registry: Arc<ConnectionRegistry>, push: Arc<PushFallback>) -> Self {
        Self { registry, push }
    }

    /// Deliver one envelope: live emit if the recipient has a live
    /// connection, otherwise one push attempt for kinds that fall back.
    pub async fn deliver(&self, envelope: DeliveryEnvelope) -> DeliveryOutcome {
        if let Some(handle) = self.registry.live_handle(envelope.recipient) {
            if handle.try_send(envelope.live_event()) {
                debug!(
                    recipient = %envelope.recipient,
                    kind = envelope.kind.name(),
                    "Delivered live"
                );
                self.acknowledge(&envelope);
                return DeliveryOutcome::DeliveredLive;
            }
            // Live emit failed (buffer full or connection just died); treat
            // the recipient as offline and continue to the fallback.
        }

        match PushNotice::for_envelope(&envelope) {
            Some(notice) => {
                let PushNotice { title, body, data } = notice;
                match self
                    .push
                    .send_push(envelope.recipient, &title, &body, data)
                    .await
                {
                    PushOutcome::Accepted => {
                        debug!(
                            recipient = %envelope.recipient,
                            kind = envelope.kind.name(),
                            "Delivered via push"
                        );
                        DeliveryOutcome::DeliveredPush
                    }
                    PushOutcome::NoToken | PushOutcome::ProviderError => {
                        debug!(
                            recipient = %envelope.recipient,
                            kind = envelope.kind.name(),
                            "Undeliverable"
                        );
                        DeliveryOutcome::Undeliverable
                    }
                }
            }
            None => {
                debug!(
                    recipient = %envelope.recipient,
                    kind = envelope.kind.name(),
                    "Recipient offline and kind does not fall back"
                );
                DeliveryOutcome::Undeliverable
            }
        }
    }

    /// Best-effort `message_delivered` acknowledgement to a chat sender
    /// after a live delivery.
    fn acknowledge(&self, envelope: &DeliveryEnvelope) {
        if let EnvelopeKind::ChatMessage {
            sender, message_id, ..
        } = &envelope.kind
        {
            self.registry.emit_to(
                *sender,
                ServerEvent::MessageDelivered {
                    message_id: message_id.clone(),
                    receiver_id: envelope.recipient,
                    timestamp: Utc::now(),
                },
            );
        }
    }
}
