//! HTTP request handlers.

pub mod device_token;
pub mod health;
pub mod ws;
