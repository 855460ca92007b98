//! Pack definition entity

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "packs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    #[sea_orm(nullable)]
    pub description: Option<String>,

    pub included_hours: i32,

    /// Total price in minor currency units
    pub price: i64,

    /// ISO 4217 code
    pub currency: String,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::pack_assignment::Entity")]
    PackAssignments,
}

impl Related<super::pack_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PackAssignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
