//! # pulse-api
//!
//! HTTP and WebSocket surface for the Pulse realtime service.
//!
//! Everything in this crate is a thin adapter: requests are authenticated
//! through [`pulse_auth::CredentialGate`], upgraded sessions are driven by
//! [`pulse_realtime::RealtimeEngine`], and REST handlers only touch the
//! traits exposed by `pulse-core`.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
