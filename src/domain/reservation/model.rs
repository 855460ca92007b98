//! Reservation domain entity

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::domain::payment::PaymentStatus;
use crate::domain::schedule::{Occupancy, TimeRange};
use crate::domain::{DomainError, DomainResult};

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservationStatus {
    /// Booked, awaiting confirmation
    Pending,
    /// Confirmed by the clinic (pack-generated bookings start here)
    Confirmed,
    /// Cancelled; frees the room
    Cancelled,
    /// Session took place
    Completed,
    /// Professional did not show up
    NoShow,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
            Self::NoShow => "no_show",
        }
    }

    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Completed)
                | (Confirmed, NoShow)
                | (Confirmed, Cancelled)
        )
    }

    /// Whether the booking still holds its room.
    pub fn blocks_room(&self) -> bool {
        *self != Self::Cancelled
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            "no_show" => Ok(Self::NoShow),
            other => Err(DomainError::Validation(format!(
                "unknown reservation status '{}'",
                other
            ))),
        }
    }
}

/// Room booking, either standalone or generated by a pack assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub id: i32,
    pub room_id: i32,
    /// Psychologist holding the room
    pub professional_id: i32,
    pub date: NaiveDate,
    pub range: TimeRange,
    pub status: ReservationStatus,
    pub payment_status: PaymentStatus,
    /// Generating assignment; `None` for standalone bookings
    pub pack_assignment_id: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Apply a lifecycle transition.
    ///
    /// Cancelling also cancels a still pending payment; paid bookings keep
    /// their payment state.
    pub fn transition_to(
        &mut self,
        next: ReservationStatus,
        at: DateTime<Utc>,
    ) -> DomainResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                entity: "reservation",
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        if next == ReservationStatus::Cancelled
            && self.payment_status == PaymentStatus::PendingPayment
        {
            self.payment_status = PaymentStatus::Cancelled;
        }
        self.updated_at = at;
        Ok(())
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.range.start())
    }

    pub fn is_future(&self, now: NaiveDateTime) -> bool {
        self.starts_at() > now
    }

    pub fn occupancy(&self) -> Occupancy {
        Occupancy {
            reservation_id: self.id,
            room_id: self.room_id,
            professional_id: self.professional_id,
            date: self.date,
            range: self.range,
        }
    }
}

/// Values for inserting a reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    pub room_id: i32,
    pub professional_id: i32,
    pub date: NaiveDate,
    pub range: TimeRange,
    pub status: ReservationStatus,
    pub payment_status: PaymentStatus,
    pub pack_assignment_id: Option<i32>,
    pub notes: Option<String>,
}

impl NewReservation {
    /// Standalone booking as created through the booking endpoint.
    pub fn standalone(
        room_id: i32,
        professional_id: i32,
        date: NaiveDate,
        range: TimeRange,
        notes: Option<String>,
    ) -> Self {
        Self {
            room_id,
            professional_id,
            date,
            range,
            status: ReservationStatus::Pending,
            payment_status: PaymentStatus::PendingPayment,
            pack_assignment_id: None,
            notes,
        }
    }
}

/// Query filter for listing reservations. All fields are optional and combine with AND.
#[derive(Debug, Clone, Default)]
pub struct ReservationFilter {
    pub room_id: Option<i32>,
    pub professional_id: Option<i32>,
    pub pack_assignment_id: Option<i32>,
    pub status: Option<ReservationStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(status: ReservationStatus, payment: PaymentStatus) -> Reservation {
        let now = Utc::now();
        Reservation {
            id: 1,
            room_id: 1,
            professional_id: 2,
            date: NaiveDate::from_ymd_opt(2025, 9, 8).unwrap(),
            range: TimeRange::parse("09:00", "10:00").unwrap(),
            status,
            payment_status: payment,
            pack_assignment_id: Some(3),
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_status_transitions() {
        use ReservationStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(!Pending.can_transition_to(Completed));
        assert!(Confirmed.can_transition_to(NoShow));
        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!NoShow.can_transition_to(Completed));
    }

    #[test]
    fn test_status_roundtrip() {
        for s in ["pending", "confirmed", "cancelled", "completed", "no_show"] {
            assert_eq!(s.parse::<ReservationStatus>().unwrap().as_str(), s);
        }
        assert!("expired".parse::<ReservationStatus>().is_err());
    }

    #[test]
    fn test_cancel_cancels_pending_payment() {
        let mut r = sample(ReservationStatus::Confirmed, PaymentStatus::PendingPayment);
        r.transition_to(ReservationStatus::Cancelled, Utc::now()).unwrap();
        assert_eq!(r.status, ReservationStatus::Cancelled);
        assert_eq!(r.payment_status, PaymentStatus::Cancelled);
        assert!(!r.status.blocks_room());
    }

    #[test]
    fn test_cancel_keeps_paid_payment() {
        let mut r = sample(ReservationStatus::Confirmed, PaymentStatus::Paid);
        r.transition_to(ReservationStatus::Cancelled, Utc::now()).unwrap();
        assert_eq!(r.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn test_illegal_transition_leaves_state() {
        let mut r = sample(ReservationStatus::Completed, PaymentStatus::Paid);
        let err = r
            .transition_to(ReservationStatus::Pending, Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
        assert_eq!(r.status, ReservationStatus::Completed);
    }

    #[test]
    fn test_is_future() {
        let r = sample(ReservationStatus::Confirmed, PaymentStatus::PendingPayment);
        let before = NaiveDate::from_ymd_opt(2025, 9, 8)
            .unwrap()
            .and_hms_opt(8, 59, 0)
            .unwrap();
        let at_start = r.starts_at();
        assert!(r.is_future(before));
        assert!(!r.is_future(at_start));
    }
}
