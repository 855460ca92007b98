//! Reservation HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use super::dto::*;
use crate::application::BookingService;
use crate::domain::reservation::ReservationFilter;
use crate::domain::ReservationStatus;
use crate::interfaces::http::common::{
    ApiError, ApiResponse, ApiResult, ConflictReport, ValidatedJson,
};

#[derive(Clone)]
pub struct ReservationState {
    pub booking: Arc<BookingService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation created", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Invalid request or the room is taken", body = ApiResponse<ConflictReport>),
        (status = 404, description = "Room or professional not found")
    )
)]
pub async fn create_reservation(
    State(state): State<ReservationState>,
    ValidatedJson(request): ValidatedJson<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReservationDto>>), ApiError> {
    let reservation = state.booking.create(request.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(reservation.into())),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    tag = "Reservations",
    params(ListReservationsParams),
    responses(
        (status = 200, description = "Reservations ordered by date and start time", body = ApiResponse<Vec<ReservationDto>>),
        (status = 400, description = "Invalid filter")
    )
)]
pub async fn list_reservations(
    State(state): State<ReservationState>,
    Query(params): Query<ListReservationsParams>,
) -> ApiResult<Vec<ReservationDto>> {
    let filter = ReservationFilter {
        room_id: params.room_id,
        professional_id: params.professional_id,
        pack_assignment_id: params.pack_assignment_id,
        status: params.status.as_deref().map(str::parse).transpose()?,
        date_from: params.date_from,
        date_to: params.date_to,
    };
    let reservations = state.booking.list(filter).await?;
    Ok(Json(ApiResponse::success(
        reservations.into_iter().map(ReservationDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_reservation(
    State(state): State<ReservationState>,
    Path(id): Path<i32>,
) -> ApiResult<ReservationDto> {
    let reservation = state.booking.get(id).await?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/reservations/{id}/status",
    tag = "Reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    request_body = UpdateReservationStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Transition not allowed")
    )
)]
pub async fn update_reservation_status(
    State(state): State<ReservationState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateReservationStatusRequest>,
) -> ApiResult<ReservationDto> {
    let status: ReservationStatus = request.status.parse()?;
    let reservation = state.booking.change_status(id, status).await?;
    Ok(Json(ApiResponse::success(reservation.into())))
}
