//! Alerts and toasts with automatic expiry
//!
//! Expiry is deadline based: the manager records when each notification is
//! due and the page's event loop calls
//! [`NotificationManager::expire_due`] when the earliest deadline passes.

mod manager;
mod notification;

pub use manager::*;
pub use notification::*;
