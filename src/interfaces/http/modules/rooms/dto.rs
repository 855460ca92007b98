//! Room DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::services::BusySlot;
use crate::domain::Room;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomDto {
    pub id: i32,
    pub sede_id: i32,
    pub name: String,
    pub is_active: bool,
}

impl From<Room> for RoomDto {
    fn from(r: Room) -> Self {
        Self {
            id: r.id,
            sede_id: r.sede_id,
            name: r.name,
            is_active: r.is_active,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListRoomsParams {
    pub sede_id: Option<i32>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AvailabilityParams {
    /// Day to inspect (YYYY-MM-DD)
    pub date: NaiveDate,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BusySlotDto {
    pub start_time: String,
    pub end_time: String,
    pub reservation_id: i32,
    pub status: String,
}

impl From<BusySlot> for BusySlotDto {
    fn from(b: BusySlot) -> Self {
        Self {
            start_time: b.range.start().format("%H:%M").to_string(),
            end_time: b.range.end().format("%H:%M").to_string(),
            reservation_id: b.reservation_id,
            status: b.status.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub room_id: i32,
    pub date: NaiveDate,
    /// Ranges already held, ordered by start time
    pub busy: Vec<BusySlotDto>,
}
