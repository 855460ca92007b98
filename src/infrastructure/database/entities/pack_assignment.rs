//! Pack assignment entity

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum AssignmentStatus {
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pack_assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub pack_id: i32,
    pub user_id: i32,
    pub status: AssignmentStatus,
    pub recurring: bool,
    pub date_from: NaiveDate,
    pub deadline: NaiveDate,
    pub created_at: DateTime<Utc>,
    #[sea_orm(nullable)]
    pub cancelled_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pack::Entity",
        from = "Column::PackId",
        to = "super::pack::Column::Id"
    )]
    Pack,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::assignment_slot::Entity")]
    Slots,
    #[sea_orm(has_many = "super::reservation::Entity")]
    Reservations,
    #[sea_orm(has_many = "super::monthly_payment::Entity")]
    MonthlyPayments,
}

impl Related<super::pack::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pack.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::assignment_slot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Slots.def()
    }
}

impl Related<super::reservation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservations.def()
    }
}

impl Related<super::monthly_payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonthlyPayments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
