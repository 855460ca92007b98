//! Pack catalog management

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::{DomainError, DomainResult, PackDefinition, RepositoryProvider};

#[derive(Debug, Clone)]
pub struct CreatePackCommand {
    pub name: String,
    pub description: Option<String>,
    pub included_hours: i32,
    pub price: i64,
    /// Falls back to the configured billing currency
    pub currency: Option<String>,
}

/// Fields left as `None` are kept.
#[derive(Debug, Clone, Default)]
pub struct UpdatePackCommand {
    pub name: Option<String>,
    pub description: Option<String>,
    pub included_hours: Option<i32>,
    pub price: Option<i64>,
    pub currency: Option<String>,
    pub is_active: Option<bool>,
}

pub struct PackCatalogService {
    repos: Arc<dyn RepositoryProvider>,
    default_currency: String,
}

impl PackCatalogService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, default_currency: impl Into<String>) -> Self {
        Self {
            repos,
            default_currency: default_currency.into(),
        }
    }

    pub async fn create(&self, cmd: CreatePackCommand) -> DomainResult<PackDefinition> {
        let pack = PackDefinition::new(
            cmd.name,
            cmd.description,
            cmd.included_hours,
            cmd.price,
            cmd.currency.unwrap_or_else(|| self.default_currency.clone()),
        );
        pack.validate()?;
        let pack = self.repos.packs().save(pack).await?;
        info!(pack_id = pack.id, name = %pack.name, "Pack created");
        Ok(pack)
    }

    pub async fn list(&self, active_only: bool) -> DomainResult<Vec<PackDefinition>> {
        self.repos.packs().find_all(active_only).await
    }

    pub async fn get(&self, id: i32) -> DomainResult<PackDefinition> {
        self.repos
            .packs()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Pack", "id", id))
    }

    pub async fn update(&self, id: i32, cmd: UpdatePackCommand) -> DomainResult<PackDefinition> {
        let mut pack = self.get(id).await?;
        if let Some(name) = cmd.name {
            pack.name = name;
        }
        if let Some(description) = cmd.description {
            pack.description = Some(description);
        }
        if let Some(hours) = cmd.included_hours {
            pack.included_hours = hours;
        }
        if let Some(price) = cmd.price {
            pack.price = price;
        }
        if let Some(currency) = cmd.currency {
            pack.currency = currency.to_uppercase();
        }
        if let Some(active) = cmd.is_active {
            pack.is_active = active;
        }
        pack.validate()?;
        pack.updated_at = Utc::now();

        self.repos.packs().update(pack.clone()).await?;
        info!(pack_id = id, "Pack updated");
        Ok(pack)
    }

    /// Soft delete; existing assignments keep referencing the pack.
    pub async fn deactivate(&self, id: i32) -> DomainResult<PackDefinition> {
        let mut pack = self.get(id).await?;
        pack.deactivate();
        self.repos.packs().update(pack.clone()).await?;
        info!(pack_id = id, "Pack deactivated");
        Ok(pack)
    }
}
