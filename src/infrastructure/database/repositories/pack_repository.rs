//! SeaORM implementation of PackRepository

use async_trait::async_trait;
use log::{debug, info};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};

use super::convert::{db_err, pack_to_domain};
use crate::domain::pack::{PackDefinition, PackRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::pack;

pub struct SeaOrmPackRepository {
    db: DatabaseConnection,
}

impl SeaOrmPackRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PackRepository for SeaOrmPackRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<PackDefinition>> {
        let model = pack::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(pack_to_domain))
    }

    async fn find_all(&self, active_only: bool) -> DomainResult<Vec<PackDefinition>> {
        let mut query = pack::Entity::find();
        if active_only {
            query = query.filter(pack::Column::IsActive.eq(true));
        }
        let models = query
            .order_by_asc(pack::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(pack_to_domain).collect())
    }

    async fn save(&self, p: PackDefinition) -> DomainResult<PackDefinition> {
        debug!("Saving pack: {}", p.name);

        let model = pack::ActiveModel {
            id: NotSet,
            name: Set(p.name),
            description: Set(p.description),
            included_hours: Set(p.included_hours),
            price: Set(p.price),
            currency: Set(p.currency),
            is_active: Set(p.is_active),
            created_at: Set(p.created_at),
            updated_at: Set(p.updated_at),
        };
        let model = model.insert(&self.db).await.map_err(db_err)?;
        info!("Pack {} saved", model.id);
        Ok(pack_to_domain(model))
    }

    async fn update(&self, p: PackDefinition) -> DomainResult<()> {
        debug!("Updating pack: {}", p.id);

        let existing = pack::Entity::find_by_id(p.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(DomainError::not_found("Pack", "id", p.id));
        }

        let model = pack::ActiveModel {
            id: Set(p.id),
            name: Set(p.name),
            description: Set(p.description),
            included_hours: Set(p.included_hours),
            price: Set(p.price),
            currency: Set(p.currency),
            is_active: Set(p.is_active),
            created_at: Set(p.created_at),
            updated_at: Set(p.updated_at),
        };
        model.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }
}
