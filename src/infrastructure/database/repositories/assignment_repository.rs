//! SeaORM implementation of AssignmentRepository
//!
//! Materialization and cancellation each run in a single transaction.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use log::{debug, info};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};

use super::conflict_scan::scan_conflicts;
use super::convert::{
    assignment_to_domain, db_err, payment_to_domain, reservation_to_domain, slot_to_domain,
};
use super::payment_repository::write_transition as write_payment;
use super::reservation_repository::{new_active_model, write_transition as write_reservation};
use crate::domain::assignment::{
    cancel_assignment, AssignmentPlan, AssignmentRepository, AssignmentStatus,
    CancellationOutcome, MaterializedAssignment, PackAssignment, WeeklySlot,
};
use crate::domain::payment::PaymentStatus;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::begin_serializable;
use crate::infrastructure::database::entities::{
    assignment_slot, monthly_payment, pack_assignment, reservation,
};

/// Rows per multi-row INSERT; keeps well below SQLite's bind parameter limit.
const INSERT_CHUNK: usize = 50;

pub struct SeaOrmAssignmentRepository {
    db: DatabaseConnection,
}

impl SeaOrmAssignmentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AssignmentRepository for SeaOrmAssignmentRepository {
    async fn materialize(&self, plan: &AssignmentPlan) -> DomainResult<MaterializedAssignment> {
        debug!(
            "Materializing pack {} for user {}: {} slots over {} months",
            plan.pack_id,
            plan.user_id,
            plan.slots.len(),
            plan.dues.len()
        );

        let txn = begin_serializable(&self.db).await.map_err(db_err)?;

        let conflicts = scan_conflicts(&txn, &plan.slots).await?;
        if !conflicts.is_empty() {
            txn.rollback().await.map_err(db_err)?;
            return Err(DomainError::ScheduleConflict(conflicts));
        }

        let now = Utc::now();
        let assignment = pack_assignment::ActiveModel {
            id: NotSet,
            pack_id: Set(plan.pack_id),
            user_id: Set(plan.user_id),
            status: Set(pack_assignment::AssignmentStatus::Active),
            recurring: Set(plan.recurring),
            date_from: Set(plan.range.from()),
            deadline: Set(plan.range.to()),
            created_at: Set(now),
            cancelled_at: Set(None),
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;
        let assignment_id = assignment.id;

        let mut slots = Vec::with_capacity(plan.patterns.len());
        for slot in plan.weekly_slots(assignment_id) {
            let model = assignment_slot::ActiveModel {
                id: NotSet,
                assignment_id: Set(assignment_id),
                weekday: Set(i32::from(slot.weekday)),
                start_time: Set(slot.range.start()),
                end_time: Set(slot.range.end()),
                room_id: Set(slot.room_id),
            }
            .insert(&txn)
            .await
            .map_err(db_err)?;
            slots.push(slot_to_domain(model)?);
        }

        let rows: Vec<reservation::ActiveModel> = plan
            .reservations(assignment_id)
            .into_iter()
            .map(new_active_model)
            .collect();
        let reservations_generated = rows.len();
        for chunk in rows.chunks(INSERT_CHUNK) {
            reservation::Entity::insert_many(chunk.to_vec())
                .exec(&txn)
                .await
                .map_err(db_err)?;
        }

        let mut payments = Vec::with_capacity(plan.dues.len());
        for due in &plan.dues {
            let model = monthly_payment::ActiveModel {
                id: NotSet,
                assignment_id: Set(assignment_id),
                user_id: Set(plan.user_id),
                year: Set(due.month.year),
                month: Set(due.month.month as i32),
                amount_due: Set(due.amount_due),
                amount_paid: Set(0),
                amount_refunded: Set(0),
                status: Set(PaymentStatus::PendingPayment.into()),
                due_date: Set(due.due_date),
                paid_at: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&txn)
            .await
            .map_err(db_err)?;
            payments.push(payment_to_domain(model)?);
        }

        txn.commit().await.map_err(db_err)?;

        info!(
            "Pack assignment {} created with {} reservations and {} monthly payments",
            assignment_id,
            reservations_generated,
            payments.len()
        );

        Ok(MaterializedAssignment {
            assignment: assignment_to_domain(assignment),
            slots,
            reservations_generated,
            payments,
        })
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<PackAssignment>> {
        let model = pack_assignment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(assignment_to_domain))
    }

    async fn find_slots(&self, assignment_id: i32) -> DomainResult<Vec<WeeklySlot>> {
        let models = assignment_slot::Entity::find()
            .filter(assignment_slot::Column::AssignmentId.eq(assignment_id))
            .order_by_asc(assignment_slot::Column::Weekday)
            .order_by_asc(assignment_slot::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(slot_to_domain).collect()
    }

    async fn find_all(
        &self,
        user_id: Option<i32>,
        status: Option<AssignmentStatus>,
    ) -> DomainResult<Vec<PackAssignment>> {
        let mut query = pack_assignment::Entity::find();
        if let Some(user_id) = user_id {
            query = query.filter(pack_assignment::Column::UserId.eq(user_id));
        }
        if let Some(status) = status {
            query = query.filter(
                pack_assignment::Column::Status.eq(pack_assignment::AssignmentStatus::from(status)),
            );
        }
        let models = query
            .order_by_desc(pack_assignment::Column::CreatedAt)
            .order_by_desc(pack_assignment::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(assignment_to_domain).collect())
    }

    async fn cancel(
        &self,
        id: i32,
        now: NaiveDateTime,
        at: DateTime<Utc>,
    ) -> DomainResult<CancellationOutcome> {
        debug!("Cancelling pack assignment {}", id);

        let txn = begin_serializable(&self.db).await.map_err(db_err)?;

        let mut assignment = pack_assignment::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .map(assignment_to_domain)
            .ok_or_else(|| DomainError::not_found("PackAssignment", "id", id))?;

        let mut reservations = reservation::Entity::find()
            .filter(reservation::Column::PackAssignmentId.eq(id))
            .order_by_asc(reservation::Column::Date)
            .order_by_asc(reservation::Column::StartTime)
            .all(&txn)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(reservation_to_domain)
            .collect::<DomainResult<Vec<_>>>()?;

        let mut dues = monthly_payment::Entity::find()
            .filter(monthly_payment::Column::AssignmentId.eq(id))
            .all(&txn)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(payment_to_domain)
            .collect::<DomainResult<Vec<_>>>()?;

        let stored_reservations = reservations.clone();
        let stored_dues = dues.clone();
        let effects = cancel_assignment(&mut assignment, &mut reservations, &mut dues, now, at)?;

        pack_assignment::ActiveModel {
            id: Set(assignment.id),
            status: Set(assignment.status.into()),
            cancelled_at: Set(assignment.cancelled_at),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(db_err)?;

        for (before, after) in stored_reservations.iter().zip(&reservations) {
            if effects.reservations.contains(&after.id) {
                write_reservation(&txn, before, after).await?;
            }
        }
        for (before, after) in stored_dues.iter().zip(&dues) {
            if effects.payments.contains(&after.id) {
                write_payment(&txn, before, after).await?;
            }
        }

        txn.commit().await.map_err(db_err)?;

        info!(
            "Pack assignment {} cancelled: {} reservations and {} monthly payments released",
            id,
            effects.reservations.len(),
            effects.payments.len()
        );

        Ok(CancellationOutcome {
            assignment,
            reservations_cancelled: effects.reservations.len(),
            payments_cancelled: effects.payments.len(),
        })
    }
}
