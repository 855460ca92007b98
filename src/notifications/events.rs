//! Notification events
//!
//! Messages emitted after scheduling and billing changes commit.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Event types for notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    /// Pack assigned and its reservations generated
    PackAssigned(PackAssignedEvent),
    /// Pack assignment cancelled
    AssignmentCancelled(AssignmentCancelledEvent),
    /// Monthly due marked paid
    PaymentSettled(PaymentSettledEvent),
    /// Standalone booking created
    ReservationCreated(ReservationCreatedEvent),
}

impl Event {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::PackAssigned(_) => "pack_assigned",
            Event::AssignmentCancelled(_) => "assignment_cancelled",
            Event::PaymentSettled(_) => "payment_settled",
            Event::ReservationCreated(_) => "reservation_created",
        }
    }

    /// User the event is addressed to
    pub fn user_id(&self) -> i32 {
        match self {
            Event::PackAssigned(e) => e.user_id,
            Event::AssignmentCancelled(e) => e.user_id,
            Event::PaymentSettled(e) => e.user_id,
            Event::ReservationCreated(e) => e.professional_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackAssignedEvent {
    pub assignment_id: i32,
    pub user_id: i32,
    pub user_name: String,
    pub user_email: String,
    pub pack_name: String,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub reservations_generated: usize,
    pub monthly_payments: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentCancelledEvent {
    pub assignment_id: i32,
    pub user_id: i32,
    pub reservations_cancelled: usize,
    pub payments_cancelled: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSettledEvent {
    pub payment_id: i32,
    pub assignment_id: i32,
    pub user_id: i32,
    /// "YYYY-MM"
    pub month: String,
    pub amount: i64,
    pub reservations_updated: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreatedEvent {
    pub reservation_id: i32,
    pub room_id: i32,
    pub professional_id: i32,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
}

/// Envelope carried by the event bus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: Event,
}

impl EventMessage {
    pub fn new(event: Event) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serializes_with_type_tag() {
        let msg = EventMessage::new(Event::AssignmentCancelled(AssignmentCancelledEvent {
            assignment_id: 4,
            user_id: 2,
            reservations_cancelled: 3,
            payments_cancelled: 1,
        }));
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "AssignmentCancelled");
        assert_eq!(json["data"]["reservations_cancelled"], 3);
        assert!(json["id"].is_string());
        assert_eq!(msg.event.user_id(), 2);
        assert_eq!(msg.event.event_type(), "assignment_cancelled");
    }
}
