//! # pulse-auth
//!
//! Credential handling for the Pulse realtime gateway.
//!
//! Every WebSocket handshake and HTTP request passes through the
//! [`CredentialGate`], which checks the presented bearer token against the
//! [`RevocationList`] before validating its signature and expiry. The gate
//! produces an [`AuthenticatedUser`] that downstream components treat as the
//! sole source of caller identity.

pub mod claims;
pub mod encoder;
pub mod error;
pub mod gate;
pub mod revocation;

pub use claims::Claims;
pub use encoder::JwtEncoder;
pub use error::AuthError;
pub use gate::{AuthenticatedUser, CredentialGate};
pub use revocation::{RevocationList, run_pruner};
