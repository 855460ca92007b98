//! Outbound notification port
//!
//! Services call it after a change commits. Delivery is best effort: a
//! failure is logged by the caller and never undoes the change.

use async_trait::async_trait;
use thiserror::Error;

use crate::notifications::Event;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("no delivery channel available")]
    NoReceivers,

    #[error("delivery failed: {0}")]
    Delivery(String),
}

#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, event: Event) -> Result<(), NotificationError>;
}
