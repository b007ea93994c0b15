//! Shared domain types.

pub mod id;
pub mod notification;

pub use id::{NotificationId, UserId};
pub use notification::{NotificationRecord, NotificationType};
