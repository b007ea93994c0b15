//! Collaborator traits defined in `pulse-core` and implemented elsewhere.
//!
//! The delivery layer talks to its neighbors (push provider, device-token
//! lookup, notification ledger) exclusively through these traits; production
//! deployments supply real implementations, tests supply mocks.

pub mod ledger;
pub mod push;
pub mod tokens;

pub use ledger::NotificationLedger;
pub use push::PushProvider;
pub use tokens::DeviceTokenStore;
