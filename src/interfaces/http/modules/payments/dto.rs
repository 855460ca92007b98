//! Monthly payment DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::payment::SettledPayment;
use crate::domain::MonthlyPaymentDue;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDto {
    pub id: i32,
    pub assignment_id: i32,
    pub user_id: i32,
    /// "YYYY-MM"
    pub month: String,
    pub amount_due: i64,
    pub amount_paid: i64,
    pub amount_refunded: i64,
    /// pending_payment | paid | refunded | cancelled
    pub status: String,
    pub due_date: NaiveDate,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MonthlyPaymentDue> for PaymentDto {
    fn from(p: MonthlyPaymentDue) -> Self {
        Self {
            id: p.id,
            assignment_id: p.assignment_id,
            user_id: p.user_id,
            month: p.month.to_string(),
            amount_due: p.amount_due,
            amount_paid: p.amount_paid,
            amount_refunded: p.amount_refunded,
            status: p.status.to_string(),
            due_date: p.due_date,
            paid_at: p.paid_at,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListPaymentsParams {
    pub assignment_id: Option<i32>,
    pub user_id: Option<i32>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkPaidResponse {
    pub payment: PaymentDto,
    /// Reservations of the month flagged paid
    pub reservations_updated: u64,
}

impl From<SettledPayment> for MarkPaidResponse {
    fn from(s: SettledPayment) -> Self {
        Self {
            payment: s.payment.into(),
            reservations_updated: s.reservations_updated,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefundRequest {
    /// Partial refund in minor units; the whole paid amount when omitted
    #[validate(range(min = 1))]
    pub amount: Option<i64>,
}
