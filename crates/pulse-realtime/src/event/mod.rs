//! Inbound and outbound event schema for the realtime wire protocol.

pub mod types;

pub use types::{ClientEvent, ServerEvent, UserStatus};
