//! Monthly payment ledger and its cascade onto reservations

mod common;

use chrono::{Datelike, Utc};
use common::*;
use psicoespacios::domain::payment::PaymentFilter;
use psicoespacios::domain::{DomainError, PaymentStatus, ReservationStatus};
use psicoespacios::notifications::Event;

async fn two_month_assignment(fx: &Fixture) -> i32 {
    let mut cmd = fx.monday_command();
    cmd.deadline = Some(date(2025, 10, 31));
    fx.assignments().assign(cmd).await.unwrap().assignment.id
}

#[tokio::test]
async fn marking_a_month_paid_flags_only_that_month() {
    let fx = Fixture::new().await;
    let assignment_id = two_month_assignment(&fx).await;
    // A standalone booking in September must not be touched.
    let standalone = fx
        .book(&fx.room2, &fx.ana, date(2025, 9, 3), "09:00", "10:00")
        .await;

    let ledger = fx.ledger();
    let dues = ledger
        .list(PaymentFilter {
            assignment_id: Some(assignment_id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(dues.len(), 2);
    let september = dues.iter().find(|d| d.month.month == 9).unwrap();

    let settled = ledger.mark_paid(september.id).await.unwrap();
    assert_eq!(settled.reservations_updated, 5);
    assert_eq!(settled.payment.status, PaymentStatus::Paid);
    assert_eq!(settled.payment.amount_paid, settled.payment.amount_due);
    assert!(settled.payment.paid_at.is_some());

    for r in fx.assignments().reservations(assignment_id).await.unwrap() {
        let expected = if r.date.month() == 9 {
            PaymentStatus::Paid
        } else {
            PaymentStatus::PendingPayment
        };
        assert_eq!(r.payment_status, expected, "reservation on {}", r.date);
    }
    let untouched = fx.booking().get(standalone.id).await.unwrap();
    assert_eq!(untouched.payment_status, PaymentStatus::PendingPayment);

    let october = dues.iter().find(|d| d.month.month == 10).unwrap();
    assert_eq!(
        ledger.get(october.id).await.unwrap().status,
        PaymentStatus::PendingPayment
    );

    settle().await;
    let events = fx.notifier.events.lock().unwrap();
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::PaymentSettled(p) if p.month == "2025-09")));
}

#[tokio::test]
async fn paying_twice_is_an_invalid_transition() {
    let fx = Fixture::new().await;
    let assignment_id = two_month_assignment(&fx).await;
    let ledger = fx.ledger();
    let due = &fx.assignments().payments(assignment_id).await.unwrap()[0];

    ledger.mark_paid(due.id).await.unwrap();
    let err = ledger.mark_paid(due.id).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidTransition { .. }));
}

#[tokio::test]
async fn partial_refund_moves_money_out_of_paid() {
    let fx = Fixture::new().await;
    let assignment_id = two_month_assignment(&fx).await;
    let ledger = fx.ledger();
    let due = fx.assignments().payments(assignment_id).await.unwrap()[0].clone();

    assert!(matches!(
        ledger.refund(due.id, None).await,
        Err(DomainError::InvalidTransition { .. })
    ));

    ledger.mark_paid(due.id).await.unwrap();
    assert!(matches!(
        ledger.refund(due.id, Some(due.amount_due + 1)).await,
        Err(DomainError::Validation(_))
    ));

    let refunded = ledger.refund(due.id, Some(20_000)).await.unwrap();
    assert_eq!(refunded.status, PaymentStatus::Refunded);
    assert_eq!(refunded.amount_refunded, 20_000);
    assert_eq!(refunded.amount_paid, due.amount_due - 20_000);
    assert!(refunded.amount_paid + refunded.amount_refunded <= refunded.amount_due);

    // Refunds leave reservation payment flags alone.
    let paid = fx
        .assignments()
        .reservations(assignment_id)
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.payment_status == PaymentStatus::Paid)
        .count();
    assert_eq!(paid, 5);
}

#[tokio::test]
async fn cancelling_a_due_only_from_pending() {
    let fx = Fixture::new().await;
    let assignment_id = two_month_assignment(&fx).await;
    let ledger = fx.ledger();
    let dues = fx.assignments().payments(assignment_id).await.unwrap();

    let cancelled = ledger.cancel(dues[1].id).await.unwrap();
    assert_eq!(cancelled.status, PaymentStatus::Cancelled);
    assert!(matches!(
        ledger.mark_paid(dues[1].id).await,
        Err(DomainError::InvalidTransition { .. })
    ));

    ledger.mark_paid(dues[0].id).await.unwrap();
    assert!(ledger.cancel(dues[0].id).await.is_err());
}

#[tokio::test]
async fn filters_by_status_and_user() {
    let fx = Fixture::new().await;
    let assignment_id = two_month_assignment(&fx).await;
    let ledger = fx.ledger();
    let dues = fx.assignments().payments(assignment_id).await.unwrap();
    ledger.mark_paid(dues[0].id).await.unwrap();

    let paid = ledger
        .list(PaymentFilter {
            status: Some(PaymentStatus::Paid),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(paid.len(), 1);
    assert_eq!(paid[0].id, dues[0].id);

    let for_bruno = ledger
        .list(PaymentFilter {
            user_id: Some(fx.bruno.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(for_bruno.is_empty());

    assert!(matches!(
        ledger.mark_paid(9999).await,
        Err(DomainError::NotFound { .. })
    ));
}

// Writes computed from a row read before a settlement committed.

#[tokio::test]
async fn stale_due_cancellation_cannot_undo_a_settlement() {
    let fx = Fixture::new().await;
    let assignment_id = two_month_assignment(&fx).await;
    let ledger = fx.ledger();
    let september = fx.assignments().payments(assignment_id).await.unwrap()[0].clone();

    let read_before = ledger.get(september.id).await.unwrap();
    ledger.mark_paid(september.id).await.unwrap();

    let mut cancelled = read_before.clone();
    cancelled.cancel(Utc::now()).unwrap();
    let err = fx
        .repos
        .payments()
        .update(&read_before, &cancelled)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidTransition { .. }));

    let stored = ledger.get(september.id).await.unwrap();
    assert_eq!(stored.status, PaymentStatus::Paid);
    assert_eq!(stored.amount_paid, stored.amount_due);
    let paid = fx
        .assignments()
        .reservations(assignment_id)
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.payment_status == PaymentStatus::Paid)
        .count();
    assert_eq!(paid, 5);

    // Through the service the due now reads as paid and stays that way.
    assert!(matches!(
        ledger.cancel(september.id).await,
        Err(DomainError::InvalidTransition { .. })
    ));
}

#[tokio::test]
async fn stale_status_change_keeps_the_paid_flag() {
    let fx = Fixture::new().await;
    let assignment_id = two_month_assignment(&fx).await;
    let september = fx.assignments().payments(assignment_id).await.unwrap()[0].clone();
    let first = fx.assignments().reservations(assignment_id).await.unwrap()[0].clone();
    let booking = fx.booking();

    let read_before = booking.get(first.id).await.unwrap();
    assert_eq!(read_before.payment_status, PaymentStatus::PendingPayment);
    fx.ledger().mark_paid(september.id).await.unwrap();

    let mut completed = read_before.clone();
    completed
        .transition_to(ReservationStatus::Completed, Utc::now())
        .unwrap();
    fx.repos
        .reservations()
        .update(&read_before, &completed)
        .await
        .unwrap();

    let stored = booking.get(first.id).await.unwrap();
    assert_eq!(stored.status, ReservationStatus::Completed);
    assert_eq!(stored.payment_status, PaymentStatus::Paid);
}

#[tokio::test]
async fn stale_reservation_cancellation_is_rejected_after_settlement() {
    let fx = Fixture::new().await;
    let assignment_id = two_month_assignment(&fx).await;
    let september = fx.assignments().payments(assignment_id).await.unwrap()[0].clone();
    let first = fx.assignments().reservations(assignment_id).await.unwrap()[0].clone();
    let booking = fx.booking();

    let read_before = booking.get(first.id).await.unwrap();
    fx.ledger().mark_paid(september.id).await.unwrap();

    let mut cancelled = read_before.clone();
    cancelled
        .transition_to(ReservationStatus::Cancelled, Utc::now())
        .unwrap();
    assert_eq!(cancelled.payment_status, PaymentStatus::Cancelled);
    let err = fx
        .repos
        .reservations()
        .update(&read_before, &cancelled)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidTransition { .. }));

    let stored = booking.get(first.id).await.unwrap();
    assert_eq!(stored.status, ReservationStatus::Confirmed);
    assert_eq!(stored.payment_status, PaymentStatus::Paid);

    // A fresh read cancels the booking and leaves the payment flag alone.
    let cancelled = booking
        .change_status(first.id, ReservationStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(cancelled.payment_status, PaymentStatus::Paid);
}
