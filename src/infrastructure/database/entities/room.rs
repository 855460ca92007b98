//! Room entity, stored in the `boxes` table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "boxes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub sede_id: i32,
    pub name: String,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sede::Entity",
        from = "Column::SedeId",
        to = "super::sede::Column::Id"
    )]
    Sede,
    #[sea_orm(has_many = "super::reservation::Entity")]
    Reservations,
}

impl Related<super::sede::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sede.def()
    }
}

impl Related<super::reservation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
