//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_directory;
mod m20250901_000002_create_packs;
mod m20250901_000003_create_pack_assignments;
mod m20250901_000004_create_reservations;
mod m20250901_000005_create_monthly_payments;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_directory::Migration),
            Box::new(m20250901_000002_create_packs::Migration),
            Box::new(m20250901_000003_create_pack_assignments::Migration),
            Box::new(m20250901_000004_create_reservations::Migration),
            Box::new(m20250901_000005_create_monthly_payments::Migration),
        ]
    }
}
