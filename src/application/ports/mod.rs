//! Application ports
//!
//! Outbound contracts implemented by infrastructure and notification adapters.

pub mod notifier;

pub use notifier::{NotificationError, NotificationSender};
