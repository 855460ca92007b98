//! Pack assignment use cases
//!
//! Assigning a pack validates the request against the directory and the
//! catalog, expands the weekly slots, rejects the whole request on any
//! conflict and otherwise materializes everything in one transaction.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use super::notify_detached;
use crate::application::ports::NotificationSender;
use crate::domain::assignment::{
    AssignmentPlan, AssignmentStatus, CancellationOutcome, PackAssignment, WeeklySlot,
};
use crate::domain::pack::PackDefinition;
use crate::domain::payment::{MonthlyPaymentDue, PaymentFilter};
use crate::domain::reservation::{Reservation, ReservationFilter};
use crate::domain::schedule::{SchedulingWindow, ScheduleConflict, SlotPattern, TimeRange};
use crate::domain::{DomainError, DomainResult, RepositoryProvider, Room, User};
use crate::notifications::{AssignmentCancelledEvent, Event, PackAssignedEvent};
use crate::shared::Clock;

/// One weekly slot as requested by the caller.
#[derive(Debug, Clone)]
pub struct WeeklySlotInput {
    /// 0–6, 0 = Sunday
    pub weekday: u8,
    pub start_time: String,
    pub end_time: String,
    pub room_id: i32,
}

#[derive(Debug, Clone)]
pub struct AssignPackCommand {
    pub pack_id: i32,
    pub user_id: i32,
    pub recurring: bool,
    pub start_date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    /// When set, every room must belong to this sede
    pub sede_id: Option<i32>,
    pub weekly_slots: Vec<WeeklySlotInput>,
}

/// Result of a successful assignment
#[derive(Debug, Clone)]
pub struct AssignmentSummary {
    pub assignment: PackAssignment,
    pub reservations_generated: usize,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub monthly_payments: Vec<MonthlyPaymentDue>,
}

/// Dry run of an assignment request
#[derive(Debug, Clone)]
pub struct ConflictCheck {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub reservations_planned: usize,
    pub conflicts: Vec<ScheduleConflict>,
}

#[derive(Debug, Clone)]
pub struct AssignmentDetails {
    pub assignment: PackAssignment,
    pub slots: Vec<WeeklySlot>,
}

struct PreparedAssignment {
    pack: PackDefinition,
    user: User,
    plan: AssignmentPlan,
}

pub struct PackAssignmentService {
    repos: Arc<dyn RepositoryProvider>,
    notifier: Arc<dyn NotificationSender>,
    clock: Arc<dyn Clock>,
    window: SchedulingWindow,
}

impl PackAssignmentService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        notifier: Arc<dyn NotificationSender>,
        clock: Arc<dyn Clock>,
        window: SchedulingWindow,
    ) -> Self {
        Self {
            repos,
            notifier,
            clock,
            window,
        }
    }

    /// Assign a pack and generate its reservations and monthly dues.
    ///
    /// Fails with `DomainError::ScheduleConflict` carrying every conflict
    /// when any occurrence is taken; nothing is written in that case.
    pub async fn assign(&self, cmd: AssignPackCommand) -> DomainResult<AssignmentSummary> {
        let prepared = self.prepare(&cmd).await?;

        let conflicts = self
            .repos
            .reservations()
            .scan_conflicts(&prepared.plan.slots)
            .await?;
        if !conflicts.is_empty() {
            return Err(self.reject(&cmd, conflicts));
        }

        let materialized = match self.repos.assignments().materialize(&prepared.plan).await {
            Ok(m) => m,
            Err(DomainError::ScheduleConflict(conflicts)) => {
                return Err(self.reject(&cmd, conflicts));
            }
            Err(e) => return Err(e),
        };

        metrics::counter!("pack_reservations_generated_total")
            .increment(materialized.reservations_generated as u64);
        info!(
            assignment_id = materialized.assignment.id,
            pack_id = prepared.pack.id,
            user_id = prepared.user.id,
            reservations = materialized.reservations_generated,
            months = materialized.payments.len(),
            "Pack assigned"
        );

        let summary = AssignmentSummary {
            reservations_generated: materialized.reservations_generated,
            date_from: prepared.plan.range.from(),
            date_to: prepared.plan.last_date(),
            monthly_payments: materialized.payments,
            assignment: materialized.assignment,
        };

        notify_detached(
            &self.notifier,
            Event::PackAssigned(PackAssignedEvent {
                assignment_id: summary.assignment.id,
                user_id: prepared.user.id,
                user_name: prepared.user.name,
                user_email: prepared.user.email,
                pack_name: prepared.pack.name,
                date_from: summary.date_from,
                date_to: summary.date_to,
                reservations_generated: summary.reservations_generated,
                monthly_payments: summary.monthly_payments.len(),
            }),
        );

        Ok(summary)
    }

    /// Validate and scan an assignment request without writing anything.
    pub async fn check(&self, cmd: AssignPackCommand) -> DomainResult<ConflictCheck> {
        let prepared = self.prepare(&cmd).await?;
        let conflicts = self
            .repos
            .reservations()
            .scan_conflicts(&prepared.plan.slots)
            .await?;
        Ok(ConflictCheck {
            date_from: prepared.plan.range.from(),
            date_to: prepared.plan.last_date(),
            reservations_planned: prepared.plan.slots.len(),
            conflicts,
        })
    }

    pub async fn cancel(&self, id: i32) -> DomainResult<CancellationOutcome> {
        let outcome = self
            .repos
            .assignments()
            .cancel(id, self.clock.now_local(), self.clock.now_utc())
            .await?;

        info!(
            assignment_id = id,
            reservations_cancelled = outcome.reservations_cancelled,
            payments_cancelled = outcome.payments_cancelled,
            "Pack assignment cancelled"
        );

        notify_detached(
            &self.notifier,
            Event::AssignmentCancelled(AssignmentCancelledEvent {
                assignment_id: id,
                user_id: outcome.assignment.user_id,
                reservations_cancelled: outcome.reservations_cancelled,
                payments_cancelled: outcome.payments_cancelled,
            }),
        );

        Ok(outcome)
    }

    pub async fn get(&self, id: i32) -> DomainResult<AssignmentDetails> {
        let assignment = self.find(id).await?;
        let slots = self.repos.assignments().find_slots(id).await?;
        Ok(AssignmentDetails { assignment, slots })
    }

    pub async fn list(
        &self,
        user_id: Option<i32>,
        status: Option<AssignmentStatus>,
    ) -> DomainResult<Vec<PackAssignment>> {
        self.repos.assignments().find_all(user_id, status).await
    }

    pub async fn reservations(&self, id: i32) -> DomainResult<Vec<Reservation>> {
        self.find(id).await?;
        let filter = ReservationFilter {
            pack_assignment_id: Some(id),
            ..Default::default()
        };
        self.repos.reservations().find(&filter).await
    }

    pub async fn payments(&self, id: i32) -> DomainResult<Vec<MonthlyPaymentDue>> {
        self.find(id).await?;
        let filter = PaymentFilter {
            assignment_id: Some(id),
            ..Default::default()
        };
        self.repos.payments().find(&filter).await
    }

    async fn find(&self, id: i32) -> DomainResult<PackAssignment> {
        self.repos
            .assignments()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("PackAssignment", "id", id))
    }

    async fn prepare(&self, cmd: &AssignPackCommand) -> DomainResult<PreparedAssignment> {
        let pack = self
            .repos
            .packs()
            .find_by_id(cmd.pack_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Pack", "id", cmd.pack_id))?;
        pack.ensure_assignable()?;

        let user = self
            .repos
            .users()
            .find_by_id(cmd.user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", cmd.user_id))?;
        user.ensure_active()?;

        if let Some(sede_id) = cmd.sede_id {
            self.repos
                .rooms()
                .find_sede(sede_id)
                .await?
                .ok_or_else(|| DomainError::not_found("Sede", "id", sede_id))?;
        }

        let mut rooms: HashMap<i32, Room> = HashMap::new();
        let mut patterns = Vec::with_capacity(cmd.weekly_slots.len());
        for slot in &cmd.weekly_slots {
            if !rooms.contains_key(&slot.room_id) {
                let room = self
                    .repos
                    .rooms()
                    .find_by_id(slot.room_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Room", "id", slot.room_id))?;
                room.ensure_bookable(cmd.sede_id)?;
                rooms.insert(room.id, room);
            }
            let range = TimeRange::parse(&slot.start_time, &slot.end_time)?;
            patterns.push(SlotPattern::new(slot.weekday, range, slot.room_id)?);
        }

        let range = self
            .window
            .resolve(self.clock.today(), cmd.start_date, cmd.deadline)?;
        let plan = AssignmentPlan::build(&pack, user.id, cmd.recurring, range, patterns)?;

        Ok(PreparedAssignment { pack, user, plan })
    }

    fn reject(&self, cmd: &AssignPackCommand, conflicts: Vec<ScheduleConflict>) -> DomainError {
        metrics::counter!("schedule_conflicts_detected_total").increment(conflicts.len() as u64);
        warn!(
            pack_id = cmd.pack_id,
            user_id = cmd.user_id,
            conflicts = conflicts.len(),
            "Pack assignment rejected by schedule conflicts"
        );
        DomainError::ScheduleConflict(conflicts)
    }
}
