//! Directory repository interfaces

use async_trait::async_trait;

use super::model::{Room, Sede, User};
use crate::domain::DomainResult;

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Room>>;

    /// Rooms ordered by name, optionally restricted to one sede
    async fn find_all(&self, sede_id: Option<i32>) -> DomainResult<Vec<Room>>;

    async fn find_sede(&self, id: i32) -> DomainResult<Option<Sede>>;

    async fn save_sede(&self, sede: Sede) -> DomainResult<Sede>;

    async fn save_room(&self, room: Room) -> DomainResult<Room>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>>;

    async fn save(&self, user: User) -> DomainResult<User>;
}
