//! SeaORM implementations of RoomRepository and UserRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};

use super::convert::{db_err, room_to_domain, sede_to_domain, user_to_domain};
use crate::domain::directory::{Room, RoomRepository, Sede, User, UserRepository};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::{room, sede, user};

/// Auto-increment unless the caller picked an ID.
fn id_value(id: i32) -> sea_orm::ActiveValue<i32> {
    if id > 0 {
        Set(id)
    } else {
        NotSet
    }
}

// ── SeaOrmRoomRepository ────────────────────────────────────────

pub struct SeaOrmRoomRepository {
    db: DatabaseConnection,
}

impl SeaOrmRoomRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RoomRepository for SeaOrmRoomRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Room>> {
        let model = room::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(room_to_domain))
    }

    async fn find_all(&self, sede_id: Option<i32>) -> DomainResult<Vec<Room>> {
        let mut query = room::Entity::find();
        if let Some(sede_id) = sede_id {
            query = query.filter(room::Column::SedeId.eq(sede_id));
        }
        let models = query
            .order_by_asc(room::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(room_to_domain).collect())
    }

    async fn find_sede(&self, id: i32) -> DomainResult<Option<Sede>> {
        let model = sede::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(sede_to_domain))
    }

    async fn save_sede(&self, s: Sede) -> DomainResult<Sede> {
        debug!("Saving sede: {}", s.name);
        let model = sede::ActiveModel {
            id: id_value(s.id),
            name: Set(s.name),
            address: Set(s.address),
            is_active: Set(s.is_active),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;
        Ok(sede_to_domain(model))
    }

    async fn save_room(&self, r: Room) -> DomainResult<Room> {
        debug!("Saving room: {}", r.name);
        let model = room::ActiveModel {
            id: id_value(r.id),
            sede_id: Set(r.sede_id),
            name: Set(r.name),
            is_active: Set(r.is_active),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;
        Ok(room_to_domain(model))
    }
}

// ── SeaOrmUserRepository ────────────────────────────────────────

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(user_to_domain))
    }

    async fn save(&self, u: User) -> DomainResult<User> {
        debug!("Saving user: {}", u.email);
        let model = user::ActiveModel {
            id: id_value(u.id),
            name: Set(u.name),
            email: Set(u.email),
            role: Set(u.role.into()),
            is_active: Set(u.is_active),
            created_at: Set(u.created_at),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;
        Ok(user_to_domain(model))
    }
}
