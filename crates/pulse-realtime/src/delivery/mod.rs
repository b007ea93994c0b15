//! Two-tier delivery: live emit first, single push attempt second.

pub mod envelope;
pub mod ledger;
pub mod notice;
pub mod router;

pub use envelope::{DeliveryEnvelope, DeliveryOutcome, EnvelopeKind};
pub use ledger::MemoryNotificationLedger;
pub use notice::PushNotice;
pub use router::DeliveryRouter;
