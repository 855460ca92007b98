//! Create pack_assignments and assignment_slots tables

use sea_orm_migration::prelude::*;

use super::m20250901_000001_create_directory::{Boxes, Users};
use super::m20250901_000002_create_packs::Packs;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PackAssignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PackAssignments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PackAssignments::PackId).integer().not_null())
                    .col(ColumnDef::new(PackAssignments::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(PackAssignments::Status)
                            .string_len(20)
                            .not_null()
                            .default("ACTIVE"),
                    )
                    .col(
                        ColumnDef::new(PackAssignments::Recurring)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(PackAssignments::DateFrom).date().not_null())
                    .col(ColumnDef::new(PackAssignments::Deadline).date().not_null())
                    .col(
                        ColumnDef::new(PackAssignments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PackAssignments::CancelledAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pack_assignments_pack")
                            .from(PackAssignments::Table, PackAssignments::PackId)
                            .to(Packs::Table, Packs::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pack_assignments_user")
                            .from(PackAssignments::Table, PackAssignments::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pack_assignments_user")
                    .table(PackAssignments::Table)
                    .col(PackAssignments::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AssignmentSlots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AssignmentSlots::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AssignmentSlots::AssignmentId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AssignmentSlots::Weekday).integer().not_null())
                    .col(ColumnDef::new(AssignmentSlots::StartTime).time().not_null())
                    .col(ColumnDef::new(AssignmentSlots::EndTime).time().not_null())
                    .col(ColumnDef::new(AssignmentSlots::RoomId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assignment_slots_assignment")
                            .from(AssignmentSlots::Table, AssignmentSlots::AssignmentId)
                            .to(PackAssignments::Table, PackAssignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assignment_slots_box")
                            .from(AssignmentSlots::Table, AssignmentSlots::RoomId)
                            .to(Boxes::Table, Boxes::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_assignment_slots_assignment")
                    .table(AssignmentSlots::Table)
                    .col(AssignmentSlots::AssignmentId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AssignmentSlots::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PackAssignments::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum PackAssignments {
    Table,
    Id,
    PackId,
    UserId,
    Status,
    Recurring,
    DateFrom,
    Deadline,
    CreatedAt,
    CancelledAt,
}

#[derive(Iden)]
pub enum AssignmentSlots {
    Table,
    Id,
    AssignmentId,
    Weekday,
    StartTime,
    EndTime,
    RoomId,
}
