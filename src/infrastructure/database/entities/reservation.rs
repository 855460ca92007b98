//! Reservation entity

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::monthly_payment::PaymentStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum ReservationStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "no_show")]
    NoShow,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub room_id: i32,

    /// Psychologist holding the room
    pub professional_id: i32,

    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,

    pub status: ReservationStatus,
    pub payment_status: PaymentStatus,

    /// Null for standalone bookings
    #[sea_orm(nullable)]
    pub pack_assignment_id: Option<i32>,

    #[sea_orm(nullable)]
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::room::Entity",
        from = "Column::RoomId",
        to = "super::room::Column::Id"
    )]
    Room,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ProfessionalId",
        to = "super::user::Column::Id"
    )]
    Professional,
    #[sea_orm(
        belongs_to = "super::pack_assignment::Entity",
        from = "Column::PackAssignmentId",
        to = "super::pack_assignment::Column::Id"
    )]
    PackAssignment,
}

impl Related<super::room::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Room.def()
    }
}

impl Related<super::pack_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PackAssignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
