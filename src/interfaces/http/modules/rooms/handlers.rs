//! Room directory handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;

use super::dto::*;
use crate::application::BookingService;
use crate::interfaces::http::common::{ApiResponse, ApiResult};

#[derive(Clone)]
pub struct RoomState {
    pub booking: Arc<BookingService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/rooms",
    tag = "Rooms",
    params(ListRoomsParams),
    responses((status = 200, description = "Rooms", body = ApiResponse<Vec<RoomDto>>))
)]
pub async fn list_rooms(
    State(state): State<RoomState>,
    Query(params): Query<ListRoomsParams>,
) -> ApiResult<Vec<RoomDto>> {
    let rooms = state.booking.list_rooms(params.sede_id).await?;
    Ok(Json(ApiResponse::success(
        rooms.into_iter().map(RoomDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/rooms/{id}/availability",
    tag = "Rooms",
    params(("id" = i32, Path, description = "Room ID"), AvailabilityParams),
    responses(
        (status = 200, description = "Busy ranges of the day", body = ApiResponse<AvailabilityResponse>),
        (status = 404, description = "Room not found")
    )
)]
pub async fn room_availability(
    State(state): State<RoomState>,
    Path(id): Path<i32>,
    Query(params): Query<AvailabilityParams>,
) -> ApiResult<AvailabilityResponse> {
    let busy = state.booking.availability(id, params.date).await?;
    Ok(Json(ApiResponse::success(AvailabilityResponse {
        room_id: id,
        date: params.date,
        busy: busy.into_iter().map(BusySlotDto::from).collect(),
    })))
}
