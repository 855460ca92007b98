//! Pack assignment handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;

use super::dto::*;
use crate::application::PackAssignmentService;
use crate::domain::AssignmentStatus;
use crate::interfaces::http::common::{ApiResponse, ApiResult};
use crate::interfaces::http::modules::payments::PaymentDto;
use crate::interfaces::http::modules::reservations::ReservationDto;

#[derive(Clone)]
pub struct AssignmentState {
    pub assignments: Arc<PackAssignmentService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/assignments",
    tag = "Assignments",
    params(ListAssignmentsParams),
    responses((status = 200, description = "Assignments, newest first", body = ApiResponse<Vec<AssignmentDto>>))
)]
pub async fn list_assignments(
    State(state): State<AssignmentState>,
    Query(params): Query<ListAssignmentsParams>,
) -> ApiResult<Vec<AssignmentDto>> {
    let status: Option<AssignmentStatus> = params.status.as_deref().map(str::parse).transpose()?;
    let assignments = state.assignments.list(params.user_id, status).await?;
    Ok(Json(ApiResponse::success(
        assignments.into_iter().map(AssignmentDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/assignments/{id}",
    tag = "Assignments",
    params(("id" = i32, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment with its weekly slots", body = ApiResponse<AssignmentDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_assignment(
    State(state): State<AssignmentState>,
    Path(id): Path<i32>,
) -> ApiResult<AssignmentDto> {
    let details = state.assignments.get(id).await?;
    Ok(Json(ApiResponse::success(details.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/assignments/{id}/cancel",
    tag = "Assignments",
    params(("id" = i32, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment cancelled with its future reservations", body = ApiResponse<CancelAssignmentResponse>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Already cancelled")
    )
)]
pub async fn cancel_assignment(
    State(state): State<AssignmentState>,
    Path(id): Path<i32>,
) -> ApiResult<CancelAssignmentResponse> {
    let outcome = state.assignments.cancel(id).await?;
    Ok(Json(ApiResponse::success(outcome.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/assignments/{id}/reservations",
    tag = "Assignments",
    params(("id" = i32, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Generated reservations", body = ApiResponse<Vec<ReservationDto>>),
        (status = 404, description = "Not found")
    )
)]
pub async fn assignment_reservations(
    State(state): State<AssignmentState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<ReservationDto>> {
    let reservations = state.assignments.reservations(id).await?;
    Ok(Json(ApiResponse::success(
        reservations.into_iter().map(ReservationDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/assignments/{id}/payments",
    tag = "Assignments",
    params(("id" = i32, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Monthly dues of the assignment", body = ApiResponse<Vec<PaymentDto>>),
        (status = 404, description = "Not found")
    )
)]
pub async fn assignment_payments(
    State(state): State<AssignmentState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<PaymentDto>> {
    let payments = state.assignments.payments(id).await?;
    Ok(Json(ApiResponse::success(
        payments.into_iter().map(PaymentDto::from).collect(),
    )))
}
