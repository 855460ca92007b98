//! Application services
//!
//! Orchestrate repositories, the clock and the notification port for each
//! use case. HTTP handlers call these and nothing below them.

pub mod assignment;
pub mod booking;
pub mod catalog;
pub mod ledger;

use std::sync::Arc;

use tracing::warn;

use super::ports::NotificationSender;
use crate::notifications::Event;

pub use assignment::{
    AssignPackCommand, AssignmentDetails, AssignmentSummary, ConflictCheck, PackAssignmentService,
    WeeklySlotInput,
};
pub use booking::{BookingService, BusySlot, CreateReservationCommand};
pub use catalog::{CreatePackCommand, PackCatalogService, UpdatePackCommand};
pub use ledger::PaymentLedgerService;

/// Hand `event` to the notifier without waiting for the outcome.
pub(crate) fn notify_detached(notifier: &Arc<dyn NotificationSender>, event: Event) {
    let notifier = notifier.clone();
    tokio::spawn(async move {
        let event_type = event.event_type();
        let user_id = event.user_id();
        if let Err(e) = notifier.send(event).await {
            warn!(error = %e, event_type, user_id, "Notification not delivered");
        }
    });
}
