//! Monthly payment ledger use cases

use std::sync::Arc;

use tracing::info;

use super::notify_detached;
use crate::application::ports::NotificationSender;
use crate::domain::payment::{MonthlyPaymentDue, PaymentFilter, SettledPayment};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::notifications::{Event, PaymentSettledEvent};
use crate::shared::Clock;

pub struct PaymentLedgerService {
    repos: Arc<dyn RepositoryProvider>,
    notifier: Arc<dyn NotificationSender>,
    clock: Arc<dyn Clock>,
}

impl PaymentLedgerService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        notifier: Arc<dyn NotificationSender>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repos,
            notifier,
            clock,
        }
    }

    pub async fn list(&self, filter: PaymentFilter) -> DomainResult<Vec<MonthlyPaymentDue>> {
        self.repos.payments().find(&filter).await
    }

    pub async fn get(&self, id: i32) -> DomainResult<MonthlyPaymentDue> {
        self.repos
            .payments()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("MonthlyPayment", "id", id))
    }

    /// Settle a month and flag its reservations paid.
    pub async fn mark_paid(&self, id: i32) -> DomainResult<SettledPayment> {
        let settled = self
            .repos
            .payments()
            .mark_paid(id, self.clock.now_utc())
            .await?;

        metrics::counter!("monthly_payments_settled_total").increment(1);
        info!(
            payment_id = id,
            assignment_id = settled.payment.assignment_id,
            month = %settled.payment.month,
            reservations_updated = settled.reservations_updated,
            "Monthly payment settled"
        );

        notify_detached(
            &self.notifier,
            Event::PaymentSettled(PaymentSettledEvent {
                payment_id: id,
                assignment_id: settled.payment.assignment_id,
                user_id: settled.payment.user_id,
                month: settled.payment.month.to_string(),
                amount: settled.payment.amount_paid,
                reservations_updated: settled.reservations_updated,
            }),
        );

        Ok(settled)
    }

    /// Refund part or all of a paid month. Reservations are not touched.
    pub async fn refund(&self, id: i32, amount: Option<i64>) -> DomainResult<MonthlyPaymentDue> {
        let current = self.get(id).await?;
        let mut payment = current.clone();
        let refunded = payment.refund(amount, self.clock.now_utc())?;
        self.repos.payments().update(&current, &payment).await?;

        info!(payment_id = id, refunded, "Monthly payment refunded");
        Ok(payment)
    }

    pub async fn cancel(&self, id: i32) -> DomainResult<MonthlyPaymentDue> {
        let current = self.get(id).await?;
        let mut payment = current.clone();
        payment.cancel(self.clock.now_utc())?;
        self.repos.payments().update(&current, &payment).await?;

        info!(payment_id = id, "Monthly payment cancelled");
        Ok(payment)
    }
}
