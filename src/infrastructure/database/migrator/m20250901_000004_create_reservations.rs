//! Create reservations table
//!
//! Both standalone bookings and pack-generated ones. The (room, date) index
//! backs the conflict scan.

use sea_orm_migration::prelude::*;

use super::m20250901_000001_create_directory::{Boxes, Users};
use super::m20250901_000003_create_pack_assignments::PackAssignments;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reservations::RoomId).integer().not_null())
                    .col(
                        ColumnDef::new(Reservations::ProfessionalId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Reservations::Date).date().not_null())
                    .col(ColumnDef::new(Reservations::StartTime).time().not_null())
                    .col(ColumnDef::new(Reservations::EndTime).time().not_null())
                    .col(
                        ColumnDef::new(Reservations::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Reservations::PaymentStatus)
                            .string_len(20)
                            .not_null()
                            .default("pending_payment"),
                    )
                    .col(ColumnDef::new(Reservations::PackAssignmentId).integer())
                    .col(ColumnDef::new(Reservations::Notes).text())
                    .col(
                        ColumnDef::new(Reservations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_box")
                            .from(Reservations::Table, Reservations::RoomId)
                            .to(Boxes::Table, Boxes::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_professional")
                            .from(Reservations::Table, Reservations::ProfessionalId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_pack_assignment")
                            .from(Reservations::Table, Reservations::PackAssignmentId)
                            .to(PackAssignments::Table, PackAssignments::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_room_date")
                    .table(Reservations::Table)
                    .col(Reservations::RoomId)
                    .col(Reservations::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_pack_assignment")
                    .table(Reservations::Table)
                    .col(Reservations::PackAssignmentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_professional")
                    .table(Reservations::Table)
                    .col(Reservations::ProfessionalId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reservations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Reservations {
    Table,
    Id,
    RoomId,
    ProfessionalId,
    Date,
    StartTime,
    EndTime,
    Status,
    PaymentStatus,
    PackAssignmentId,
    Notes,
    CreatedAt,
    UpdatedAt,
}
