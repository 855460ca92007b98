//! Monthly payment ledger handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;

use super::dto::*;
use crate::application::PaymentLedgerService;
use crate::domain::payment::PaymentFilter;
use crate::interfaces::http::common::{ApiResponse, ApiResult, ValidatedJson};

#[derive(Clone)]
pub struct PaymentState {
    pub ledger: Arc<PaymentLedgerService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/payments",
    tag = "Payments",
    params(ListPaymentsParams),
    responses(
        (status = 200, description = "Monthly dues", body = ApiResponse<Vec<PaymentDto>>),
        (status = 400, description = "Unknown status")
    )
)]
pub async fn list_payments(
    State(state): State<PaymentState>,
    Query(params): Query<ListPaymentsParams>,
) -> ApiResult<Vec<PaymentDto>> {
    let filter = PaymentFilter {
        assignment_id: params.assignment_id,
        user_id: params.user_id,
        status: params.status.as_deref().map(str::parse).transpose()?,
    };
    let payments = state.ledger.list(filter).await?;
    Ok(Json(ApiResponse::success(
        payments.into_iter().map(PaymentDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/payments/{id}",
    tag = "Payments",
    params(("id" = i32, Path, description = "Monthly payment ID")),
    responses(
        (status = 200, description = "Monthly due", body = ApiResponse<PaymentDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_payment(
    State(state): State<PaymentState>,
    Path(id): Path<i32>,
) -> ApiResult<PaymentDto> {
    let payment = state.ledger.get(id).await?;
    Ok(Json(ApiResponse::success(payment.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/payments/{id}/mark-paid",
    tag = "Payments",
    params(("id" = i32, Path, description = "Monthly payment ID")),
    responses(
        (status = 200, description = "Month settled and its reservations flagged paid", body = ApiResponse<MarkPaidResponse>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Payment is not pending")
    )
)]
pub async fn mark_paid(
    State(state): State<PaymentState>,
    Path(id): Path<i32>,
) -> ApiResult<MarkPaidResponse> {
    let settled = state.ledger.mark_paid(id).await?;
    Ok(Json(ApiResponse::success(settled.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/payments/{id}/refund",
    tag = "Payments",
    params(("id" = i32, Path, description = "Monthly payment ID")),
    request_body = RefundRequest,
    responses(
        (status = 200, description = "Payment refunded", body = ApiResponse<PaymentDto>),
        (status = 400, description = "Amount exceeds the paid amount"),
        (status = 409, description = "Payment is not paid")
    )
)]
pub async fn refund_payment(
    State(state): State<PaymentState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<RefundRequest>,
) -> ApiResult<PaymentDto> {
    let payment = state.ledger.refund(id, request.amount).await?;
    Ok(Json(ApiResponse::success(payment.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/payments/{id}/cancel",
    tag = "Payments",
    params(("id" = i32, Path, description = "Monthly payment ID")),
    responses(
        (status = 200, description = "Payment cancelled", body = ApiResponse<PaymentDto>),
        (status = 409, description = "Payment is not pending")
    )
)]
pub async fn cancel_payment(
    State(state): State<PaymentState>,
    Path(id): Path<i32>,
) -> ApiResult<PaymentDto> {
    let payment = state.ledger.cancel(id).await?;
    Ok(Json(ApiResponse::success(payment.into())))
}
