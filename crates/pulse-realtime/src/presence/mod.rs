//! Presence event formatting and bulk status queries.

pub mod broadcaster;

pub use broadcaster::PresenceBroadcaster;
