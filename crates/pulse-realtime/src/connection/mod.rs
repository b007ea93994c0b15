//! Connection handles and the single-session-per-user registry.

pub mod handle;
pub mod registry;

pub use handle::{ConnectionHandle, ConnectionId};
pub use registry::ConnectionRegistry;
