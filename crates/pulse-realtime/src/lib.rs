//! # pulse-realtime
//!
//! The realtime core of Pulse: tracks which users hold a live WebSocket
//! connection, broadcasts presence changes, expires typing indicators, and
//! routes chat messages and activity notifications live-first with a push
//! fallback.
//!
//! The transport layer (`pulse-api`) owns the sockets; this crate owns the
//! state. A socket session calls [`RealtimeEngine::connect`] after the
//! handshake, feeds inbound text frames to [`RealtimeEngine::handle_event`],
//! drains the returned channel into the socket, and calls
//! [`RealtimeEngine::disconnect`] on teardown. REST-side collaborators enter
//! through [`RealtimeEngine::deliver_notification`].

pub mod connection;
pub mod delivery;
pub mod engine;
pub mod event;
pub mod presence;
pub mod typing;

pub use connection::handle::{ConnectionHandle, ConnectionId};
pub use connection::registry::ConnectionRegistry;
pub use delivery::envelope::{DeliveryEnvelope, DeliveryOutcome, EnvelopeKind};
pub use delivery::ledger::MemoryNotificationLedger;
pub use delivery::router::DeliveryRouter;
pub use engine::RealtimeEngine;
pub use event::types::{ClientEvent, ServerEvent, UserStatus};
pub use typing::store::TypingStore;
