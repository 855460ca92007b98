//! Reservation DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::services::CreateReservationCommand;
use crate::domain::Reservation;

/// Reservation in API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDto {
    pub id: i32,
    pub room_id: i32,
    pub professional_id: i32,
    pub date: NaiveDate,
    /// "HH:MM"
    pub start_time: String,
    pub end_time: String,
    /// pending | confirmed | cancelled | completed | no_show
    pub status: String,
    /// pending_payment | paid | refunded | cancelled
    pub payment_status: String,
    /// Null for standalone bookings
    pub pack_assignment_id: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationDto {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            room_id: r.room_id,
            professional_id: r.professional_id,
            date: r.date,
            start_time: r.range.start().format("%H:%M").to_string(),
            end_time: r.range.end().format("%H:%M").to_string(),
            status: r.status.to_string(),
            payment_status: r.payment_status.to_string(),
            pack_assignment_id: r.pack_assignment_id,
            notes: r.notes,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Single standalone booking
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    #[validate(range(min = 1))]
    pub room_id: i32,
    #[validate(range(min = 1))]
    pub professional_id: i32,
    pub date: NaiveDate,
    #[validate(length(min = 4, max = 8))]
    pub start_time: String,
    #[validate(length(min = 4, max = 8))]
    pub end_time: String,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl From<CreateReservationRequest> for CreateReservationCommand {
    fn from(r: CreateReservationRequest) -> Self {
        Self {
            room_id: r.room_id,
            professional_id: r.professional_id,
            date: r.date,
            start_time: r.start_time,
            end_time: r.end_time,
            notes: r.notes,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateReservationStatusRequest {
    /// Target state
    #[validate(length(min = 1))]
    pub status: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListReservationsParams {
    pub room_id: Option<i32>,
    pub professional_id: Option<i32>,
    pub pack_assignment_id: Option<i32>,
    pub status: Option<String>,
    /// Inclusive
    pub date_from: Option<NaiveDate>,
    /// Inclusive
    pub date_to: Option<NaiveDate>,
}
