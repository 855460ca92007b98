//! Pack catalog and assignment DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::services::{
    AssignPackCommand, AssignmentSummary, ConflictCheck, CreatePackCommand, UpdatePackCommand,
    WeeklySlotInput,
};
use crate::domain::PackDefinition;
use crate::interfaces::http::common::ConflictDto;
use crate::interfaces::http::modules::payments::PaymentDto;

/// Pack definition in API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PackDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub included_hours: i32,
    /// Minor currency units
    pub price: i64,
    pub currency: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PackDefinition> for PackDto {
    fn from(p: PackDefinition) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            included_hours: p.included_hours,
            price: p.price,
            currency: p.currency,
            is_active: p.is_active,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePackRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub included_hours: i32,
    #[validate(range(min = 0))]
    pub price: i64,
    /// ISO 4217 code; the configured billing currency when omitted
    #[validate(length(equal = 3))]
    pub currency: Option<String>,
}

impl From<CreatePackRequest> for CreatePackCommand {
    fn from(r: CreatePackRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            included_hours: r.included_hours,
            price: r.price,
            currency: r.currency,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePackRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub included_hours: Option<i32>,
    #[validate(range(min = 0))]
    pub price: Option<i64>,
    #[validate(length(equal = 3))]
    pub currency: Option<String>,
    pub is_active: Option<bool>,
}

impl From<UpdatePackRequest> for UpdatePackCommand {
    fn from(r: UpdatePackRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            included_hours: r.included_hours,
            price: r.price,
            currency: r.currency,
            is_active: r.is_active,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListPacksParams {
    /// Only packs that can still be assigned
    #[serde(default)]
    pub active_only: bool,
}

/// One weekly occurrence of the assignment
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySlotRequest {
    /// 0 = Sunday … 6 = Saturday
    #[validate(range(max = 6))]
    pub weekday: u8,
    /// "HH:MM"
    #[validate(length(min = 4, max = 8))]
    pub start_time: String,
    #[validate(length(min = 4, max = 8))]
    pub end_time: String,
    #[validate(range(min = 1))]
    pub room_id: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignPackRequest {
    #[validate(range(min = 1))]
    pub pack_id: i32,
    #[validate(range(min = 1))]
    pub user_id: i32,
    #[serde(default = "default_recurring")]
    pub recurring: bool,
    /// Defaults to today
    pub start_date: Option<NaiveDate>,
    /// Defaults to three months after the start date
    pub deadline: Option<NaiveDate>,
    /// Every room must belong to this sede when set
    pub sede_id: Option<i32>,
    #[validate(length(min = 1, max = 14), nested)]
    pub weekly_slots: Vec<WeeklySlotRequest>,
}

fn default_recurring() -> bool {
    true
}

impl From<AssignPackRequest> for AssignPackCommand {
    fn from(r: AssignPackRequest) -> Self {
        Self {
            pack_id: r.pack_id,
            user_id: r.user_id,
            recurring: r.recurring,
            start_date: r.start_date,
            deadline: r.deadline,
            sede_id: r.sede_id,
            weekly_slots: r
                .weekly_slots
                .into_iter()
                .map(|s| WeeklySlotInput {
                    weekday: s.weekday,
                    start_time: s.start_time,
                    end_time: s.end_time,
                    room_id: s.room_id,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignPackResponse {
    pub assignment_id: i32,
    pub reservations_generated: usize,
    pub date_from: NaiveDate,
    /// Date of the last generated reservation
    pub date_to: NaiveDate,
    pub monthly_payments: Vec<PaymentDto>,
}

impl From<AssignmentSummary> for AssignPackResponse {
    fn from(s: AssignmentSummary) -> Self {
        Self {
            assignment_id: s.assignment.id,
            reservations_generated: s.reservations_generated,
            date_from: s.date_from,
            date_to: s.date_to,
            monthly_payments: s.monthly_payments.into_iter().map(PaymentDto::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConflictCheckResponse {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub reservations_planned: usize,
    pub total_conflicts: usize,
    pub conflicts: Vec<ConflictDto>,
}

impl From<ConflictCheck> for ConflictCheckResponse {
    fn from(c: ConflictCheck) -> Self {
        Self {
            date_from: c.date_from,
            date_to: c.date_to,
            reservations_planned: c.reservations_planned,
            total_conflicts: c.conflicts.len(),
            conflicts: c.conflicts.into_iter().map(ConflictDto::from).collect(),
        }
    }
}
