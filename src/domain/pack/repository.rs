//! Pack catalog repository interface

use async_trait::async_trait;

use super::model::PackDefinition;
use crate::domain::DomainResult;

#[async_trait]
pub trait PackRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<PackDefinition>>;

    /// All packs ordered by name, optionally only active ones
    async fn find_all(&self, active_only: bool) -> DomainResult<Vec<PackDefinition>>;

    /// Insert a new pack, returning it with its assigned ID
    async fn save(&self, pack: PackDefinition) -> DomainResult<PackDefinition>;

    async fn update(&self, pack: PackDefinition) -> DomainResult<()>;
}
