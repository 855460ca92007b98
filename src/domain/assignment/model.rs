//! Pack assignment entities and planning
//!
//! An assignment binds a pack to a professional with a set of weekly slots.
//! Planning turns the request into concrete reservations and ledger rows;
//! cancellation releases future bookings and unbilled months.

use std::collections::HashSet;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::domain::pack::PackDefinition;
use crate::domain::payment::{
    plan_monthly_dues, BillingMonth, DuePlan, MonthlyPaymentDue, PaymentStatus,
};
use crate::domain::reservation::{NewReservation, Reservation, ReservationStatus};
use crate::domain::schedule::{
    ensure_patterns_disjoint, expand, weekday_index, DateRange, ExpandedSlot, SlotPattern,
    TimeRange,
};
use crate::domain::{DomainError, DomainResult};

/// Assignment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignmentStatus {
    Active,
    Cancelled,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn can_transition_to(&self, next: AssignmentStatus) -> bool {
        matches!((self, next), (Self::Active, Self::Cancelled))
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AssignmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(DomainError::Validation(format!(
                "unknown assignment status '{}'",
                other
            ))),
        }
    }
}

/// Persisted weekly slot of an assignment. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklySlot {
    pub id: i32,
    pub assignment_id: i32,
    /// 0–6, 0 = Sunday
    pub weekday: u8,
    pub range: TimeRange,
    pub room_id: i32,
}

impl WeeklySlot {
    pub fn pattern(&self) -> DomainResult<SlotPattern> {
        SlotPattern::new(self.weekday, self.range, self.room_id)
    }
}

/// A pack granted to a professional
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackAssignment {
    pub id: i32,
    pub pack_id: i32,
    pub user_id: i32,
    pub status: AssignmentStatus,
    pub recurring: bool,
    pub date_from: NaiveDate,
    pub deadline: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl PackAssignment {
    pub fn is_active(&self) -> bool {
        self.status == AssignmentStatus::Active
    }

    pub fn cancel(&mut self, at: DateTime<Utc>) -> DomainResult<()> {
        if !self.status.can_transition_to(AssignmentStatus::Cancelled) {
            return Err(DomainError::InvalidTransition {
                entity: "pack assignment",
                from: self.status.to_string(),
                to: AssignmentStatus::Cancelled.to_string(),
            });
        }
        self.status = AssignmentStatus::Cancelled;
        self.cancelled_at = Some(at);
        Ok(())
    }
}

/// Validated, fully expanded assignment request ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentPlan {
    pub pack_id: i32,
    pub user_id: i32,
    pub recurring: bool,
    pub range: DateRange,
    pub patterns: Vec<SlotPattern>,
    /// Chronological occurrences, one reservation each
    pub slots: Vec<ExpandedSlot>,
    pub dues: Vec<DuePlan>,
}

impl AssignmentPlan {
    /// Expand `patterns` over `range` and split the pack price by month.
    ///
    /// Non-recurring packs with included hours keep only the first
    /// occurrences that fit within those hours.
    pub fn build(
        pack: &PackDefinition,
        user_id: i32,
        recurring: bool,
        range: DateRange,
        patterns: Vec<SlotPattern>,
    ) -> DomainResult<Self> {
        pack.ensure_assignable()?;
        if patterns.is_empty() {
            return Err(DomainError::validation("at least one weekly slot is required"));
        }
        ensure_patterns_disjoint(&patterns)?;

        let mut slots = expand(&patterns, range);
        if !recurring {
            if let Some(limit) = pack.included_minutes() {
                slots = cap_to_minutes(slots, limit);
            }
        }
        if slots.is_empty() {
            return Err(DomainError::Validation(format!(
                "no occurrences of the requested weekdays between {} and {}",
                range.from(),
                range.to()
            )));
        }

        let dates: Vec<NaiveDate> = slots.iter().map(|s| s.date).collect();
        let dues = plan_monthly_dues(&dates, pack.price);

        Ok(Self {
            pack_id: pack.id,
            user_id,
            recurring,
            range,
            patterns,
            slots,
            dues,
        })
    }

    /// Date the assignment runs until: the deadline for recurring packs,
    /// the last booked occurrence for one-off packs.
    pub fn last_date(&self) -> NaiveDate {
        if self.recurring {
            return self.range.to();
        }
        self.slots.last().map_or(self.range.to(), |s| s.date)
    }

    /// Reservation rows for this plan, held by the assigned professional.
    pub fn reservations(&self, assignment_id: i32) -> Vec<NewReservation> {
        self.slots
            .iter()
            .map(|slot| NewReservation {
                room_id: slot.room_id,
                professional_id: self.user_id,
                date: slot.date,
                range: slot.range,
                status: ReservationStatus::Confirmed,
                payment_status: PaymentStatus::PendingPayment,
                pack_assignment_id: Some(assignment_id),
                notes: None,
            })
            .collect()
    }

    pub fn weekly_slots(&self, assignment_id: i32) -> Vec<WeeklySlot> {
        self.patterns
            .iter()
            .map(|p| WeeklySlot {
                id: 0,
                assignment_id,
                weekday: weekday_index(p.weekday),
                range: p.range,
                room_id: p.room_id,
            })
            .collect()
    }
}

fn cap_to_minutes(slots: Vec<ExpandedSlot>, limit: i64) -> Vec<ExpandedSlot> {
    let mut used = 0;
    slots
        .into_iter()
        .take_while(|slot| {
            used += slot.range.duration_minutes();
            used <= limit
        })
        .collect()
}

/// Everything written by a successful assignment.
#[derive(Debug, Clone)]
pub struct MaterializedAssignment {
    pub assignment: PackAssignment,
    pub slots: Vec<WeeklySlot>,
    pub reservations_generated: usize,
    pub payments: Vec<MonthlyPaymentDue>,
}

/// IDs of rows changed by a cancellation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CancellationEffects {
    pub reservations: Vec<i32>,
    pub payments: Vec<i32>,
}

/// Cancel `assignment` and release what it still holds.
///
/// Future pending or confirmed reservations are cancelled; past, completed
/// and paid-for history stays. Pending dues whose month keeps no live
/// reservation are cancelled too. Paid dues are never touched.
pub fn cancel_assignment(
    assignment: &mut PackAssignment,
    reservations: &mut [Reservation],
    dues: &mut [MonthlyPaymentDue],
    now: NaiveDateTime,
    at: DateTime<Utc>,
) -> DomainResult<CancellationEffects> {
    assignment.cancel(at)?;

    let mut effects = CancellationEffects::default();
    for reservation in reservations.iter_mut() {
        let releasable = matches!(
            reservation.status,
            ReservationStatus::Pending | ReservationStatus::Confirmed
        );
        if releasable && reservation.is_future(now) {
            reservation.transition_to(ReservationStatus::Cancelled, at)?;
            effects.reservations.push(reservation.id);
        }
    }

    let live_months: HashSet<BillingMonth> = reservations
        .iter()
        .filter(|r| r.status.blocks_room())
        .map(|r| BillingMonth::of(r.date))
        .collect();
    for due in dues.iter_mut() {
        if due.status == PaymentStatus::PendingPayment && !live_months.contains(&due.month) {
            due.cancel(at)?;
            effects.payments.push(due.id);
        }
    }

    Ok(effects)
}

/// Result of cancelling an assignment.
#[derive(Debug, Clone)]
pub struct CancellationOutcome {
    pub assignment: PackAssignment,
    pub reservations_cancelled: usize,
    pub payments_cancelled: usize,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const PENDING: PaymentStatus = PaymentStatus::PendingPayment;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn pack(hours: i32, price: i64) -> PackDefinition {
        let mut p = PackDefinition::new("Pack", None, hours, price, "CLP");
        p.id = 5;
        p
    }

    fn monday_nine_to_ten() -> Vec<SlotPattern> {
        vec![SlotPattern::new(1, TimeRange::parse("09:00", "10:00").unwrap(), 1).unwrap()]
    }

    fn assignment() -> PackAssignment {
        PackAssignment {
            id: 9,
            pack_id: 5,
            user_id: 2,
            status: AssignmentStatus::Active,
            recurring: true,
            date_from: date("2025-09-01"),
            deadline: date("2025-10-31"),
            created_at: Utc::now(),
            cancelled_at: None,
        }
    }

    fn reservation(
        id: i32,
        d: &str,
        status: ReservationStatus,
        payment: PaymentStatus,
    ) -> Reservation {
        Reservation {
            id,
            room_id: 1,
            professional_id: 2,
            date: date(d),
            range: TimeRange::parse("09:00", "10:00").unwrap(),
            status,
            payment_status: payment,
            pack_assignment_id: Some(9),
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn due(id: i32, month: u32, status: PaymentStatus) -> MonthlyPaymentDue {
        MonthlyPaymentDue {
            id,
            assignment_id: 9,
            user_id: 2,
            month: BillingMonth::new(2025, month).unwrap(),
            amount_due: 100,
            amount_paid: if status == PaymentStatus::Paid { 100 } else { 0 },
            amount_refunded: 0,
            status,
            due_date: date("2025-09-01"),
            paid_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_plan_five_mondays_one_month() {
        let range = DateRange::new(date("2025-09-01"), date("2025-09-30")).unwrap();
        let plan = AssignmentPlan::build(&pack(0, 50_000), 2, true, range, monday_nine_to_ten())
            .unwrap();
        assert_eq!(plan.slots.len(), 5);
        assert_eq!(plan.dues.len(), 1);
        assert_eq!(plan.dues[0].amount_due, 50_000);
        assert_eq!(plan.dues[0].due_date, date("2025-09-01"));

        let rows = plan.reservations(9);
        assert!(rows.iter().all(|r| r.pack_assignment_id == Some(9)
            && r.status == ReservationStatus::Confirmed
            && r.payment_status == PaymentStatus::PendingPayment
            && r.professional_id == 2));
        assert_eq!(plan.weekly_slots(9)[0].weekday, 1);
    }

    #[test]
    fn test_plan_dues_sum_to_price_across_months() {
        let range = DateRange::new(date("2025-09-01"), date("2025-11-30")).unwrap();
        let plan =
            AssignmentPlan::build(&pack(0, 100_001), 2, true, range, monday_nine_to_ten())
                .unwrap();
        assert_eq!(plan.dues.len(), 3);
        assert_eq!(plan.dues.iter().map(|d| d.amount_due).sum::<i64>(), 100_001);
    }

    #[test]
    fn test_non_recurring_pack_is_capped_by_hours() {
        let range = DateRange::new(date("2025-09-01"), date("2025-11-30")).unwrap();
        let plan = AssignmentPlan::build(&pack(3, 900), 2, false, range, monday_nine_to_ten())
            .unwrap();
        assert_eq!(plan.slots.len(), 3);
        assert_eq!(plan.last_date(), date("2025-09-15"));
        assert_eq!(plan.dues.len(), 1);

        let recurring =
            AssignmentPlan::build(&pack(3, 900), 2, true, range, monday_nine_to_ten())
                .unwrap();
        assert_eq!(recurring.slots.len(), 13);
        assert_eq!(recurring.last_date(), date("2025-11-30"));
    }

    #[test]
    fn test_plan_rejects_empty_and_inactive() {
        let range = DateRange::new(date("2025-09-02"), date("2025-09-07")).unwrap();
        let empty = AssignmentPlan::build(&pack(0, 1), 2, true, range, monday_nine_to_ten());
        assert!(empty.is_err());
        assert!(AssignmentPlan::build(&pack(0, 1), 2, true, range, vec![]).is_err());

        let mut inactive = pack(0, 1);
        inactive.deactivate();
        let range = DateRange::new(date("2025-09-01"), date("2025-09-30")).unwrap();
        assert!(AssignmentPlan::build(&inactive, 2, true, range, monday_nine_to_ten()).is_err());
    }

    #[test]
    fn test_cancel_releases_future_only() {
        let mut a = assignment();
        let mut rows = vec![
            reservation(1, "2025-09-01", ReservationStatus::Completed, PaymentStatus::Paid),
            reservation(2, "2025-09-15", ReservationStatus::Confirmed, PENDING),
            reservation(3, "2025-10-06", ReservationStatus::Confirmed, PENDING),
        ];
        let mut dues = vec![due(1, 9, PENDING), due(2, 10, PENDING)];
        let now = date("2025-09-10").and_hms_opt(12, 0, 0).unwrap();

        let effects = cancel_assignment(&mut a, &mut rows, &mut dues, now, Utc::now()).unwrap();
        assert_eq!(a.status, AssignmentStatus::Cancelled);
        assert!(a.cancelled_at.is_some());
        assert_eq!(effects.reservations, vec![2, 3]);
        assert_eq!(rows[0].status, ReservationStatus::Completed);
        assert_eq!(rows[1].payment_status, PaymentStatus::Cancelled);
        // September keeps the completed session, October is empty now.
        assert_eq!(effects.payments, vec![2]);
        assert_eq!(dues[0].status, PaymentStatus::PendingPayment);
        assert_eq!(dues[1].status, PaymentStatus::Cancelled);
    }

    #[test]
    fn test_cancel_keeps_paid_months() {
        let mut a = assignment();
        let mut rows = vec![reservation(
            1,
            "2025-10-06",
            ReservationStatus::Confirmed,
            PaymentStatus::Paid,
        )];
        let mut dues = vec![due(1, 10, PaymentStatus::Paid)];
        let now = date("2025-09-10").and_hms_opt(0, 0, 0).unwrap();

        let effects = cancel_assignment(&mut a, &mut rows, &mut dues, now, Utc::now()).unwrap();
        assert_eq!(effects.reservations, vec![1]);
        assert_eq!(rows[0].payment_status, PaymentStatus::Paid);
        assert!(effects.payments.is_empty());
        assert_eq!(dues[0].status, PaymentStatus::Paid);
    }

    #[test]
    fn test_cancel_twice_is_a_state_error() {
        let mut a = assignment();
        let now = date("2025-09-10").and_hms_opt(0, 0, 0).unwrap();
        cancel_assignment(&mut a, &mut [], &mut [], now, Utc::now()).unwrap();
        let err = cancel_assignment(&mut a, &mut [], &mut [], now, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("ACTIVE".parse::<AssignmentStatus>().unwrap(), AssignmentStatus::Active);
        assert_eq!("cancelled".parse::<AssignmentStatus>().unwrap(), AssignmentStatus::Cancelled);
        assert!("PAUSED".parse::<AssignmentStatus>().is_err());
    }
}
