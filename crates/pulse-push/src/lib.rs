//! # pulse-push
//!
//! Push notification fallback for the Pulse realtime gateway.
//!
//! When a recipient has no live connection, delivery falls back to a single
//! push attempt through [`PushFallback`]: look up the recipient's device
//! token, hand the notification to the configured [`PushProvider`], and
//! report the [`PushOutcome`]. The FCM HTTP v1 transport lives in
//! [`fcm::FcmClient`]; deployments without Firebase credentials run with
//! [`DisabledPushProvider`] instead.

pub mod fallback;
pub mod fcm;
pub mod tokens;

pub use fallback::{DisabledPushProvider, PushFallback, PushOutcome};
pub use fcm::{FcmClient, ServiceAccountKey, load_service_account};
pub use tokens::MemoryDeviceTokenStore;
