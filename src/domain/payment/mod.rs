//! Monthly payment ledger aggregate

pub mod model;
pub mod repository;

pub use model::{
    plan_monthly_dues, split_price, BillingMonth, DuePlan, MonthlyPaymentDue, PaymentStatus,
};
pub use repository::{PaymentFilter, PaymentRepository, SettledPayment};
