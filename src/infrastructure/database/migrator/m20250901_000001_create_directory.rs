//! Create sedes, boxes and users tables
//!
//! Directory data owned by the wider platform; this service only reads it.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sedes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sedes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sedes::Name).string().not_null())
                    .col(ColumnDef::new(Sedes::Address).string())
                    .col(
                        ColumnDef::new(Sedes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Boxes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Boxes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Boxes::SedeId).integer().not_null())
                    .col(ColumnDef::new(Boxes::Name).string().not_null())
                    .col(
                        ColumnDef::new(Boxes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_boxes_sede")
                            .from(Boxes::Table, Boxes::SedeId)
                            .to(Sedes::Table, Sedes::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_boxes_sede")
                    .table(Boxes::Table)
                    .col(Boxes::SedeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string_len(20)
                            .not_null()
                            .default("psychologist"),
                    )
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Boxes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sedes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Sedes {
    Table,
    Id,
    Name,
    Address,
    IsActive,
}

#[derive(Iden)]
pub enum Boxes {
    Table,
    Id,
    SedeId,
    Name,
    IsActive,
}

#[derive(Iden)]
pub enum Users {
    Table,
    Id,
    Name,
    Email,
    Role,
    IsActive,
    CreatedAt,
}
