//! SeaORM implementation of ReservationRepository

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, NotSet,
    QueryFilter, QueryOrder, Set,
};

use super::conflict_scan::scan_conflicts;
use super::convert::{db_err, reservation_to_domain};
use crate::domain::reservation::{
    NewReservation, Reservation, ReservationFilter, ReservationRepository,
};
use crate::domain::schedule::{ExpandedSlot, ScheduleConflict};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::begin_serializable;
use crate::infrastructure::database::entities::{monthly_payment, reservation};

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(crate) fn new_active_model(r: NewReservation) -> reservation::ActiveModel {
    let now = Utc::now();
    reservation::ActiveModel {
        id: NotSet,
        room_id: Set(r.room_id),
        professional_id: Set(r.professional_id),
        date: Set(r.date),
        start_time: Set(r.range.start()),
        end_time: Set(r.range.end()),
        status: Set(r.status.into()),
        payment_status: Set(r.payment_status.into()),
        pack_assignment_id: Set(r.pack_assignment_id),
        notes: Set(r.notes),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

/// Write the state of `updated` while the stored row still matches
/// `current`. Payment status is touched only when the transition changed it.
pub(crate) async fn write_transition<C: ConnectionTrait>(
    conn: &C,
    current: &Reservation,
    updated: &Reservation,
) -> DomainResult<()> {
    let mut query = reservation::Entity::update_many()
        .col_expr(
            reservation::Column::Status,
            Expr::value(reservation::ReservationStatus::from(updated.status)),
        )
        .col_expr(reservation::Column::UpdatedAt, Expr::value(updated.updated_at))
        .filter(reservation::Column::Id.eq(updated.id))
        .filter(
            reservation::Column::Status.eq(reservation::ReservationStatus::from(current.status)),
        );
    if updated.payment_status != current.payment_status {
        query = query
            .col_expr(
                reservation::Column::PaymentStatus,
                Expr::value(monthly_payment::PaymentStatus::from(updated.payment_status)),
            )
            .filter(
                reservation::Column::PaymentStatus
                    .eq(monthly_payment::PaymentStatus::from(current.payment_status)),
            );
    }
    let result = query.exec(conn).await.map_err(db_err)?;
    if result.rows_affected > 0 {
        return Ok(());
    }

    let stored = reservation::Entity::find_by_id(updated.id)
        .one(conn)
        .await
        .map_err(db_err)?
        .ok_or_else(|| DomainError::not_found("Reservation", "id", updated.id))?;
    let stored = reservation_to_domain(stored)?;
    debug!(
        "Reservation {} changed concurrently to {}/{}",
        updated.id, stored.status, stored.payment_status
    );
    Err(DomainError::InvalidTransition {
        entity: "reservation",
        from: format!("{} ({})", stored.status, stored.payment_status),
        to: updated.status.to_string(),
    })
}

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        let model = reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(reservation_to_domain).transpose()
    }

    async fn find(&self, filter: &ReservationFilter) -> DomainResult<Vec<Reservation>> {
        let mut query = reservation::Entity::find();
        if let Some(room_id) = filter.room_id {
            query = query.filter(reservation::Column::RoomId.eq(room_id));
        }
        if let Some(professional_id) = filter.professional_id {
            query = query.filter(reservation::Column::ProfessionalId.eq(professional_id));
        }
        if let Some(assignment_id) = filter.pack_assignment_id {
            query = query.filter(reservation::Column::PackAssignmentId.eq(assignment_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(
                reservation::Column::Status.eq(reservation::ReservationStatus::from(status)),
            );
        }
        if let Some(from) = filter.date_from {
            query = query.filter(reservation::Column::Date.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(reservation::Column::Date.lte(to));
        }

        let models = query
            .order_by_asc(reservation::Column::Date)
            .order_by_asc(reservation::Column::StartTime)
            .order_by_asc(reservation::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(reservation_to_domain).collect()
    }

    async fn scan_conflicts(&self, slots: &[ExpandedSlot]) -> DomainResult<Vec<ScheduleConflict>> {
        scan_conflicts(&self.db, slots).await
    }

    async fn create_checked(&self, new: NewReservation) -> DomainResult<Reservation> {
        debug!(
            "Creating reservation: room={} date={} range={}",
            new.room_id, new.date, new.range
        );

        let txn = begin_serializable(&self.db).await.map_err(db_err)?;
        let slot = ExpandedSlot {
            date: new.date,
            range: new.range,
            room_id: new.room_id,
        };
        let conflicts = scan_conflicts(&txn, &[slot]).await?;
        if !conflicts.is_empty() {
            txn.rollback().await.map_err(db_err)?;
            return Err(DomainError::ScheduleConflict(conflicts));
        }

        let model = new_active_model(new).insert(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;

        info!("Reservation {} created", model.id);
        reservation_to_domain(model)
    }

    async fn update(&self, current: &Reservation, updated: &Reservation) -> DomainResult<()> {
        debug!(
            "Updating reservation {}: {} -> {}",
            updated.id, current.status, updated.status
        );
        write_transition(&self.db, current, updated).await
    }
}
