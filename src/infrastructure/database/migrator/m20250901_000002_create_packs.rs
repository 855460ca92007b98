//! Create packs table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Packs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Packs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Packs::Name).string().not_null())
                    .col(ColumnDef::new(Packs::Description).text())
                    .col(
                        ColumnDef::new(Packs::IncludedHours)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Packs::Price)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Packs::Currency)
                            .string_len(3)
                            .not_null()
                            .default("CLP"),
                    )
                    .col(
                        ColumnDef::new(Packs::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Packs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Packs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_packs_is_active")
                    .table(Packs::Table)
                    .col(Packs::IsActive)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Packs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Packs {
    Table,
    Id,
    Name,
    Description,
    IncludedHours,
    Price,
    Currency,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
