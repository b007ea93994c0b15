//! # pulse-core
//!
//! Foundation crate shared by every Pulse service crate: configuration
//! schemas, typed identifiers, notification domain types, the collaborator
//! traits, and the error system.
//!
//! Depends only on third-party crates, never on the other Pulse crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
