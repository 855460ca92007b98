//! Mapping of domain errors onto HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use tracing::error;
use utoipa::ToSchema;

use super::ApiResponse;
use crate::domain::{DomainError, ScheduleConflict};

/// One clash between a requested slot and an existing reservation
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConflictDto {
    pub date: NaiveDate,
    /// 0 = Sunday
    pub weekday: u8,
    pub room_id: i32,
    pub room_name: String,
    /// "HH:MM-HH:MM"
    pub requested_range: String,
    pub existing_range: String,
    pub existing_professional: String,
    pub existing_professional_id: i32,
    pub existing_reservation_id: i32,
    pub description: String,
}

impl From<ScheduleConflict> for ConflictDto {
    fn from(c: ScheduleConflict) -> Self {
        Self {
            description: c.description(),
            date: c.date,
            weekday: c.weekday,
            room_id: c.room_id,
            room_name: c.room_name,
            requested_range: c.requested.to_string(),
            existing_range: c.existing.to_string(),
            existing_professional: c.existing_professional,
            existing_professional_id: c.existing_professional_id,
            existing_reservation_id: c.existing_reservation_id,
        }
    }
}

/// Payload of a request rejected by schedule conflicts
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    pub total_conflicts: usize,
    pub conflicts: Vec<ConflictDto>,
}

impl ConflictReport {
    pub fn new(conflicts: Vec<ScheduleConflict>) -> Self {
        Self {
            total_conflicts: conflicts.len(),
            conflicts: conflicts.into_iter().map(ConflictDto::from).collect(),
        }
    }
}

/// Error returned by handlers; renders the `ApiResponse` envelope.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ApiResponse<Value>,
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ApiResponse::error(message),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(_) => Self::new(StatusCode::BAD_REQUEST, e.to_string()),
            DomainError::NotFound { .. } => Self::new(StatusCode::NOT_FOUND, e.to_string()),
            DomainError::InvalidTransition { .. } => Self::new(StatusCode::CONFLICT, e.to_string()),
            DomainError::ScheduleConflict(conflicts) => {
                let message = format!("{} schedule conflict(s) detected", conflicts.len());
                let report = ConflictReport::new(conflicts);
                let data = serde_json::to_value(report).unwrap_or(Value::Null);
                Self {
                    status: StatusCode::BAD_REQUEST,
                    body: ApiResponse::failure(message, data),
                }
            }
            DomainError::Storage(msg) => {
                error!(error = %msg, "Storage failure while handling request");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal storage error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
