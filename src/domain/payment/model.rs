//! Monthly payment ledger entities

use std::str::FromStr;

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};

use crate::domain::{DomainError, DomainResult};

/// Payment state shared by ledger rows and reservations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    PendingPayment,
    Paid,
    Refunded,
    Cancelled,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingPayment => "pending_payment",
            Self::Paid => "paid",
            Self::Refunded => "refunded",
            Self::Cancelled => "cancelled",
        }
    }

    /// `pending_payment → paid | cancelled`, `paid → refunded`.
    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        matches!(
            (self, next),
            (Self::PendingPayment, Self::Paid)
                | (Self::PendingPayment, Self::Cancelled)
                | (Self::Paid, Self::Refunded)
        )
    }

    pub fn transition(self, next: PaymentStatus) -> DomainResult<PaymentStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(DomainError::InvalidTransition {
                entity: "payment",
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending_payment" => Ok(Self::PendingPayment),
            "paid" => Ok(Self::Paid),
            "refunded" => Ok(Self::Refunded),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(DomainError::Validation(format!(
                "unknown payment status '{}'",
                other
            ))),
        }
    }
}

/// A calendar month used as the billing period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BillingMonth {
    pub year: i32,
    pub month: u32,
}

impl BillingMonth {
    pub fn new(year: i32, month: u32) -> DomainResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(DomainError::Validation(format!(
                "month must be between 1 and 12, got {}",
                month
            )));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first_day()
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        Self::of(date) == *self
    }
}

impl std::fmt::Display for BillingMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Split `total` minor units across `parts` months.
///
/// Integer division; the remainder goes to the first month so the parts
/// always add up to `total`.
pub fn split_price(total: i64, parts: usize) -> Vec<i64> {
    if parts == 0 {
        return Vec::new();
    }
    let n = parts as i64;
    let base = total / n;
    let remainder = total - base * n;
    let mut amounts = vec![base; parts];
    amounts[0] += remainder;
    amounts
}

/// Ledger row to create alongside a pack assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuePlan {
    pub month: BillingMonth,
    pub amount_due: i64,
    pub due_date: NaiveDate,
}

/// One due record per distinct month in `dates` (expected sorted ascending).
///
/// The due date of a month is its first date in `dates`.
pub fn plan_monthly_dues(dates: &[NaiveDate], price: i64) -> Vec<DuePlan> {
    let mut months: Vec<(BillingMonth, NaiveDate)> = Vec::new();
    for date in dates {
        let month = BillingMonth::of(*date);
        match months.iter_mut().find(|(m, _)| *m == month) {
            Some((_, first)) => {
                if *date < *first {
                    *first = *date;
                }
            }
            None => months.push((month, *date)),
        }
    }
    months.sort_by_key(|(m, _)| *m);

    let amounts = split_price(price, months.len());
    months
        .into_iter()
        .zip(amounts)
        .map(|((month, due_date), amount_due)| DuePlan {
            month,
            amount_due,
            due_date,
        })
        .collect()
}

/// Billing record for one month of a pack assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyPaymentDue {
    pub id: i32,
    pub assignment_id: i32,
    pub user_id: i32,
    pub month: BillingMonth,
    pub amount_due: i64,
    pub amount_paid: i64,
    pub amount_refunded: i64,
    pub status: PaymentStatus,
    pub due_date: NaiveDate,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MonthlyPaymentDue {
    /// Settle the full amount.
    pub fn mark_paid(&mut self, at: DateTime<Utc>) -> DomainResult<()> {
        self.status = self.status.transition(PaymentStatus::Paid)?;
        self.amount_paid = self.amount_due;
        self.paid_at = Some(at);
        self.updated_at = at;
        Ok(())
    }

    pub fn cancel(&mut self, at: DateTime<Utc>) -> DomainResult<()> {
        self.status = self.status.transition(PaymentStatus::Cancelled)?;
        self.updated_at = at;
        Ok(())
    }

    /// Refund `amount` (default: everything paid). Returns the refunded amount.
    ///
    /// Refunded money leaves `amount_paid`, keeping
    /// `amount_paid + amount_refunded <= amount_due`.
    pub fn refund(&mut self, amount: Option<i64>, at: DateTime<Utc>) -> DomainResult<i64> {
        let next = self.status.transition(PaymentStatus::Refunded)?;
        let amount = amount.unwrap_or(self.amount_paid);
        if amount <= 0 || amount > self.amount_paid {
            return Err(DomainError::Validation(format!(
                "refund amount must be between 1 and {}, got {}",
                self.amount_paid, amount
            )));
        }
        self.status = next;
        self.amount_paid -= amount;
        self.amount_refunded += amount;
        self.updated_at = at;
        Ok(amount)
    }

    pub fn outstanding(&self) -> i64 {
        match self.status {
            PaymentStatus::PendingPayment => self.amount_due - self.amount_paid,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn due(amount: i64) -> MonthlyPaymentDue {
        let now = Utc::now();
        MonthlyPaymentDue {
            id: 1,
            assignment_id: 1,
            user_id: 1,
            month: BillingMonth::new(2025, 9).unwrap(),
            amount_due: amount,
            amount_paid: 0,
            amount_refunded: 0,
            status: PaymentStatus::PendingPayment,
            due_date: date("2025-09-01"),
            paid_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn transitions_follow_the_ledger_state_machine() {
        use PaymentStatus::*;
        let all = [PendingPayment, Paid, Refunded, Cancelled];
        let allowed = [(PendingPayment, Paid), (PendingPayment, Cancelled), (Paid, Refunded)];
        for from in all {
            for to in all {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&(from, to)),
                    "{} -> {}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn status_parses_its_own_names() {
        for s in ["pending_payment", "paid", "refunded", "cancelled"] {
            assert_eq!(s.parse::<PaymentStatus>().unwrap().as_str(), s);
        }
        assert!("settled".parse::<PaymentStatus>().is_err());
    }

    #[test]
    fn split_sums_to_total_and_gives_remainder_to_first_month() {
        assert_eq!(split_price(100_000, 3), vec![33_334, 33_333, 33_333]);
        assert_eq!(split_price(90, 3), vec![30, 30, 30]);
        assert_eq!(split_price(5, 1), vec![5]);
        assert!(split_price(5, 0).is_empty());
        for total in [0_i64, 1, 99, 1001, 123_457] {
            for parts in 1..=13 {
                let split = split_price(total, parts);
                assert_eq!(split.iter().sum::<i64>(), total);
                let max = *split.iter().max().unwrap();
                let min = *split.iter().min().unwrap();
                assert!(max - min < parts as i64);
            }
        }
    }

    #[test]
    fn plans_one_due_per_month_spanned() {
        let dates = [
            date("2025-09-29"),
            date("2025-10-06"),
            date("2025-10-13"),
            date("2025-11-03"),
        ];
        let plan = plan_monthly_dues(&dates, 100);
        assert_eq!(plan.len(), 3);
        assert_eq!(plan[0].month.to_string(), "2025-09");
        assert_eq!(plan[0].amount_due, 34);
        assert_eq!(plan[1].due_date, date("2025-10-06"));
        assert_eq!(plan[2].amount_due, 33);
        assert_eq!(plan.iter().map(|p| p.amount_due).sum::<i64>(), 100);
    }

    #[test]
    fn month_bounds() {
        let feb = BillingMonth::new(2024, 2).unwrap();
        assert_eq!(feb.first_day(), date("2024-02-01"));
        assert_eq!(feb.last_day(), date("2024-02-29"));
        let dec = BillingMonth::new(2025, 12).unwrap();
        assert_eq!(dec.last_day(), date("2025-12-31"));
        assert!(dec.contains(date("2025-12-15")));
        assert!(!dec.contains(date("2026-01-01")));
        assert!(BillingMonth::new(2025, 13).is_err());
    }

    #[test]
    fn mark_paid_settles_full_amount() {
        let mut d = due(5000);
        d.mark_paid(Utc::now()).unwrap();
        assert_eq!(d.status, PaymentStatus::Paid);
        assert_eq!(d.amount_paid, 5000);
        assert!(d.paid_at.is_some());
        assert_eq!(d.outstanding(), 0);

        let err = d.mark_paid(Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
    }

    #[test]
    fn refund_keeps_paid_plus_refunded_within_due() {
        let mut d = due(5000);
        d.mark_paid(Utc::now()).unwrap();
        assert_eq!(d.refund(Some(2000), Utc::now()).unwrap(), 2000);
        assert_eq!(d.status, PaymentStatus::Refunded);
        assert_eq!(d.amount_paid + d.amount_refunded, 5000);
        assert_eq!(d.amount_refunded, 2000);
    }

    #[test]
    fn refund_requires_paid_state_and_valid_amount() {
        let mut pending = due(5000);
        assert!(matches!(
            pending.refund(None, Utc::now()),
            Err(DomainError::InvalidTransition { .. })
        ));
        assert_eq!(pending.status, PaymentStatus::PendingPayment);

        let mut cancelled = due(5000);
        cancelled.cancel(Utc::now()).unwrap();
        assert!(matches!(
            cancelled.refund(Some(10), Utc::now()),
            Err(DomainError::InvalidTransition { .. })
        ));

        let mut paid = due(5000);
        paid.mark_paid(Utc::now()).unwrap();
        assert!(paid.refund(Some(6000), Utc::now()).is_err());
        assert_eq!(paid.status, PaymentStatus::Paid);
        assert_eq!(paid.refund(None, Utc::now()).unwrap(), 5000);
    }

    #[test]
    fn refunded_row_cannot_be_paid_again() {
        let mut d = due(100);
        d.mark_paid(Utc::now()).unwrap();
        d.refund(None, Utc::now()).unwrap();
        assert!(d.mark_paid(Utc::now()).is_err());
        assert!(d.cancel(Utc::now()).is_err());
    }
}
