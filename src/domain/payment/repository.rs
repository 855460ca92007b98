//! Monthly payment ledger repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{MonthlyPaymentDue, PaymentStatus};
use crate::domain::DomainResult;

/// Optional filters for listing ledger rows.
#[derive(Debug, Clone, Default)]
pub struct PaymentFilter {
    pub assignment_id: Option<i32>,
    pub user_id: Option<i32>,
    pub status: Option<PaymentStatus>,
}

/// Outcome of settling a month.
#[derive(Debug, Clone)]
pub struct SettledPayment {
    pub payment: MonthlyPaymentDue,
    /// Reservations whose payment state was set to paid.
    pub reservations_updated: u64,
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<MonthlyPaymentDue>>;

    /// Rows ordered by (year, month).
    async fn find(&self, filter: &PaymentFilter) -> DomainResult<Vec<MonthlyPaymentDue>>;

    /// Mark a row paid and, in the same transaction, flag every
    /// non-cancelled reservation of that assignment and month as paid.
    async fn mark_paid(&self, id: i32, paid_at: DateTime<Utc>) -> DomainResult<SettledPayment>;

    /// Persist the transition `current` -> `updated`.
    ///
    /// Written only while the stored row is still in `current.status`;
    /// otherwise `DomainError::InvalidTransition` and nothing changes.
    async fn update(
        &self,
        current: &MonthlyPaymentDue,
        updated: &MonthlyPaymentDue,
    ) -> DomainResult<()>;
}
