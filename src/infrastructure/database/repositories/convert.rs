//! Conversions between SeaORM models and domain types

use crate::domain::assignment::{AssignmentStatus, PackAssignment, WeeklySlot};
use crate::domain::directory::{Room, Sede, User, UserRole};
use crate::domain::pack::PackDefinition;
use crate::domain::payment::{BillingMonth, MonthlyPaymentDue, PaymentStatus};
use crate::domain::reservation::{Reservation, ReservationStatus};
use crate::domain::schedule::TimeRange;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{
    assignment_slot, monthly_payment, pack, pack_assignment, reservation, room, sede, user,
};

pub(crate) fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

fn stored_range(
    start: chrono::NaiveTime,
    end: chrono::NaiveTime,
    table: &str,
    id: i32,
) -> DomainResult<TimeRange> {
    TimeRange::new(start, end)
        .map_err(|e| {
            DomainError::Storage(format!("{} row {} has an invalid range: {}", table, id, e))
        })
}

// ── Status enums ────────────────────────────────────────────────

impl From<monthly_payment::PaymentStatus> for PaymentStatus {
    fn from(s: monthly_payment::PaymentStatus) -> Self {
        match s {
            monthly_payment::PaymentStatus::PendingPayment => Self::PendingPayment,
            monthly_payment::PaymentStatus::Paid => Self::Paid,
            monthly_payment::PaymentStatus::Refunded => Self::Refunded,
            monthly_payment::PaymentStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<PaymentStatus> for monthly_payment::PaymentStatus {
    fn from(s: PaymentStatus) -> Self {
        match s {
            PaymentStatus::PendingPayment => Self::PendingPayment,
            PaymentStatus::Paid => Self::Paid,
            PaymentStatus::Refunded => Self::Refunded,
            PaymentStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<reservation::ReservationStatus> for ReservationStatus {
    fn from(s: reservation::ReservationStatus) -> Self {
        match s {
            reservation::ReservationStatus::Pending => Self::Pending,
            reservation::ReservationStatus::Confirmed => Self::Confirmed,
            reservation::ReservationStatus::Cancelled => Self::Cancelled,
            reservation::ReservationStatus::Completed => Self::Completed,
            reservation::ReservationStatus::NoShow => Self::NoShow,
        }
    }
}

impl From<ReservationStatus> for reservation::ReservationStatus {
    fn from(s: ReservationStatus) -> Self {
        match s {
            ReservationStatus::Pending => Self::Pending,
            ReservationStatus::Confirmed => Self::Confirmed,
            ReservationStatus::Cancelled => Self::Cancelled,
            ReservationStatus::Completed => Self::Completed,
            ReservationStatus::NoShow => Self::NoShow,
        }
    }
}

impl From<pack_assignment::AssignmentStatus> for AssignmentStatus {
    fn from(s: pack_assignment::AssignmentStatus) -> Self {
        match s {
            pack_assignment::AssignmentStatus::Active => Self::Active,
            pack_assignment::AssignmentStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<AssignmentStatus> for pack_assignment::AssignmentStatus {
    fn from(s: AssignmentStatus) -> Self {
        match s {
            AssignmentStatus::Active => Self::Active,
            AssignmentStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<user::UserRole> for UserRole {
    fn from(r: user::UserRole) -> Self {
        match r {
            user::UserRole::Psychologist => Self::Psychologist,
            user::UserRole::Patient => Self::Patient,
            user::UserRole::Admin => Self::Admin,
        }
    }
}

impl From<UserRole> for user::UserRole {
    fn from(r: UserRole) -> Self {
        match r {
            UserRole::Psychologist => Self::Psychologist,
            UserRole::Patient => Self::Patient,
            UserRole::Admin => Self::Admin,
        }
    }
}

// ── Models ──────────────────────────────────────────────────────

pub(crate) fn reservation_to_domain(m: reservation::Model) -> DomainResult<Reservation> {
    Ok(Reservation {
        id: m.id,
        room_id: m.room_id,
        professional_id: m.professional_id,
        date: m.date,
        range: stored_range(m.start_time, m.end_time, "reservations", m.id)?,
        status: m.status.into(),
        payment_status: m.payment_status.into(),
        pack_assignment_id: m.pack_assignment_id,
        notes: m.notes,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

pub(crate) fn payment_to_domain(m: monthly_payment::Model) -> DomainResult<MonthlyPaymentDue> {
    let month = u32::try_from(m.month)
        .ok()
        .and_then(|month| BillingMonth::new(m.year, month).ok())
        .ok_or_else(|| {
            DomainError::Storage(format!(
                "monthly_payments row {} has an invalid month {}-{}",
                m.id, m.year, m.month
            ))
        })?;
    Ok(MonthlyPaymentDue {
        id: m.id,
        assignment_id: m.assignment_id,
        user_id: m.user_id,
        month,
        amount_due: m.amount_due,
        amount_paid: m.amount_paid,
        amount_refunded: m.amount_refunded,
        status: m.status.into(),
        due_date: m.due_date,
        paid_at: m.paid_at,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

pub(crate) fn assignment_to_domain(m: pack_assignment::Model) -> PackAssignment {
    PackAssignment {
        id: m.id,
        pack_id: m.pack_id,
        user_id: m.user_id,
        status: m.status.into(),
        recurring: m.recurring,
        date_from: m.date_from,
        deadline: m.deadline,
        created_at: m.created_at,
        cancelled_at: m.cancelled_at,
    }
}

pub(crate) fn slot_to_domain(m: assignment_slot::Model) -> DomainResult<WeeklySlot> {
    let weekday = u8::try_from(m.weekday)
        .ok()
        .filter(|w| *w <= 6)
        .ok_or_else(|| {
            DomainError::Storage(format!(
                "assignment_slots row {} has an invalid weekday {}",
                m.id, m.weekday
            ))
        })?;
    Ok(WeeklySlot {
        id: m.id,
        assignment_id: m.assignment_id,
        weekday,
        range: stored_range(m.start_time, m.end_time, "assignment_slots", m.id)?,
        room_id: m.room_id,
    })
}

pub(crate) fn pack_to_domain(m: pack::Model) -> PackDefinition {
    PackDefinition {
        id: m.id,
        name: m.name,
        description: m.description,
        included_hours: m.included_hours,
        price: m.price,
        currency: m.currency,
        is_active: m.is_active,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

pub(crate) fn room_to_domain(m: room::Model) -> Room {
    Room {
        id: m.id,
        sede_id: m.sede_id,
        name: m.name,
        is_active: m.is_active,
    }
}

pub(crate) fn sede_to_domain(m: sede::Model) -> Sede {
    Sede {
        id: m.id,
        name: m.name,
        address: m.address,
        is_active: m.is_active,
    }
}

pub(crate) fn user_to_domain(m: user::Model) -> User {
    User {
        id: m.id,
        name: m.name,
        email: m.email,
        role: m.role.into(),
        is_active: m.is_active,
        created_at: m.created_at,
    }
}
