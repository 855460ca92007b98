//! SeaORM implementation of PaymentRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

use super::convert::{db_err, payment_to_domain};
use crate::domain::payment::{MonthlyPaymentDue, PaymentFilter, PaymentRepository, SettledPayment};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::begin_serializable;
use crate::infrastructure::database::entities::{monthly_payment, reservation};

pub struct SeaOrmPaymentRepository {
    db: DatabaseConnection,
}

impl SeaOrmPaymentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Write the ledger columns of `updated` while the stored row still holds
/// `current.status`.
pub(crate) async fn write_transition<C: ConnectionTrait>(
    conn: &C,
    current: &MonthlyPaymentDue,
    updated: &MonthlyPaymentDue,
) -> DomainResult<()> {
    let result = monthly_payment::Entity::update_many()
        .col_expr(
            monthly_payment::Column::Status,
            Expr::value(monthly_payment::PaymentStatus::from(updated.status)),
        )
        .col_expr(monthly_payment::Column::AmountPaid, Expr::value(updated.amount_paid))
        .col_expr(
            monthly_payment::Column::AmountRefunded,
            Expr::value(updated.amount_refunded),
        )
        .col_expr(monthly_payment::Column::PaidAt, Expr::value(updated.paid_at))
        .col_expr(monthly_payment::Column::UpdatedAt, Expr::value(updated.updated_at))
        .filter(monthly_payment::Column::Id.eq(updated.id))
        .filter(
            monthly_payment::Column::Status
                .eq(monthly_payment::PaymentStatus::from(current.status)),
        )
        .exec(conn)
        .await
        .map_err(db_err)?;
    if result.rows_affected > 0 {
        return Ok(());
    }

    let stored = monthly_payment::Entity::find_by_id(updated.id)
        .one(conn)
        .await
        .map_err(db_err)?
        .ok_or_else(|| DomainError::not_found("MonthlyPayment", "id", updated.id))?;
    let stored = payment_to_domain(stored)?;
    debug!(
        "Monthly payment {} moved to {} concurrently, {} not applied",
        updated.id, stored.status, updated.status
    );
    Err(DomainError::InvalidTransition {
        entity: "payment",
        from: stored.status.to_string(),
        to: updated.status.to_string(),
    })
}

#[async_trait]
impl PaymentRepository for SeaOrmPaymentRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<MonthlyPaymentDue>> {
        let model = monthly_payment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(payment_to_domain).transpose()
    }

    async fn find(&self, filter: &PaymentFilter) -> DomainResult<Vec<MonthlyPaymentDue>> {
        let mut query = monthly_payment::Entity::find();
        if let Some(assignment_id) = filter.assignment_id {
            query = query.filter(monthly_payment::Column::AssignmentId.eq(assignment_id));
        }
        if let Some(user_id) = filter.user_id {
            query = query.filter(monthly_payment::Column::UserId.eq(user_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(
                monthly_payment::Column::Status.eq(monthly_payment::PaymentStatus::from(status)),
            );
        }

        let models = query
            .order_by_asc(monthly_payment::Column::Year)
            .order_by_asc(monthly_payment::Column::Month)
            .order_by_asc(monthly_payment::Column::AssignmentId)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(payment_to_domain).collect()
    }

    async fn mark_paid(&self, id: i32, paid_at: DateTime<Utc>) -> DomainResult<SettledPayment> {
        debug!("Marking monthly payment {} as paid", id);

        let txn = begin_serializable(&self.db).await.map_err(db_err)?;
        let model = monthly_payment::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("MonthlyPayment", "id", id))?;

        let current = payment_to_domain(model)?;
        let mut payment = current.clone();
        payment.mark_paid(paid_at)?;
        write_transition(&txn, &current, &payment).await?;

        let cascade = reservation::Entity::update_many()
            .col_expr(
                reservation::Column::PaymentStatus,
                Expr::value(monthly_payment::PaymentStatus::Paid),
            )
            .col_expr(reservation::Column::UpdatedAt, Expr::value(paid_at))
            .filter(reservation::Column::PackAssignmentId.eq(payment.assignment_id))
            .filter(
                reservation::Column::Date
                    .between(payment.month.first_day(), payment.month.last_day()),
            )
            .filter(reservation::Column::Status.ne(reservation::ReservationStatus::Cancelled))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        info!(
            "Monthly payment {} ({}) paid, {} reservations updated",
            id, payment.month, cascade.rows_affected
        );
        Ok(SettledPayment {
            payment,
            reservations_updated: cascade.rows_affected,
        })
    }

    async fn update(
        &self,
        current: &MonthlyPaymentDue,
        updated: &MonthlyPaymentDue,
    ) -> DomainResult<()> {
        debug!(
            "Updating monthly payment {}: {} -> {}",
            updated.id, current.status, updated.status
        );
        write_transition(&self.db, current, updated).await
    }
}
