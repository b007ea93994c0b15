//! Self-expiring typing indicators.

pub mod store;
pub mod sweeper;

pub use store::{TypingState, TypingStore};
pub use sweeper::run_sweeper;
