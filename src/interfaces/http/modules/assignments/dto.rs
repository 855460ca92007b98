//! Pack assignment DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::services::AssignmentDetails;
use crate::domain::assignment::CancellationOutcome;
use crate::domain::{PackAssignment, WeeklySlot};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySlotDto {
    pub id: i32,
    /// 0 = Sunday
    pub weekday: u8,
    pub start_time: String,
    pub end_time: String,
    pub room_id: i32,
}

impl From<WeeklySlot> for WeeklySlotDto {
    fn from(s: WeeklySlot) -> Self {
        Self {
            id: s.id,
            weekday: s.weekday,
            start_time: s.range.start().format("%H:%M").to_string(),
            end_time: s.range.end().format("%H:%M").to_string(),
            room_id: s.room_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDto {
    pub id: i32,
    pub pack_id: i32,
    pub user_id: i32,
    /// ACTIVE | CANCELLED
    pub status: String,
    pub recurring: bool,
    pub date_from: NaiveDate,
    pub deadline: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Present on single-assignment lookups
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_slots: Option<Vec<WeeklySlotDto>>,
}

impl From<PackAssignment> for AssignmentDto {
    fn from(a: PackAssignment) -> Self {
        Self {
            id: a.id,
            pack_id: a.pack_id,
            user_id: a.user_id,
            status: a.status.as_str().to_string(),
            recurring: a.recurring,
            date_from: a.date_from,
            deadline: a.deadline,
            created_at: a.created_at,
            cancelled_at: a.cancelled_at,
            weekly_slots: None,
        }
    }
}

impl From<AssignmentDetails> for AssignmentDto {
    fn from(d: AssignmentDetails) -> Self {
        Self {
            weekly_slots: Some(d.slots.into_iter().map(WeeklySlotDto::from).collect()),
            ..Self::from(d.assignment)
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListAssignmentsParams {
    pub user_id: Option<i32>,
    /// ACTIVE | CANCELLED
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancelAssignmentResponse {
    pub assignment: AssignmentDto,
    pub reservations_cancelled: usize,
    pub payments_cancelled: usize,
}

impl From<CancellationOutcome> for CancelAssignmentResponse {
    fn from(o: CancellationOutcome) -> Self {
        Self {
            assignment: o.assignment.into(),
            reservations_cancelled: o.reservations_cancelled,
            payments_cancelled: o.payments_cancelled,
        }
    }
}
