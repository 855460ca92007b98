//! Create monthly_payments table
//!
//! One row per (assignment, year, month).

use sea_orm_migration::prelude::*;

use super::m20250901_000001_create_directory::Users;
use super::m20250901_000003_create_pack_assignments::PackAssignments;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MonthlyPayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MonthlyPayments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MonthlyPayments::AssignmentId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MonthlyPayments::UserId).integer().not_null())
                    .col(ColumnDef::new(MonthlyPayments::Year).integer().not_null())
                    .col(ColumnDef::new(MonthlyPayments::Month).integer().not_null())
                    .col(
                        ColumnDef::new(MonthlyPayments::AmountDue)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MonthlyPayments::AmountPaid)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MonthlyPayments::AmountRefunded)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MonthlyPayments::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending_payment"),
                    )
                    .col(ColumnDef::new(MonthlyPayments::DueDate).date().not_null())
                    .col(ColumnDef::new(MonthlyPayments::PaidAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(MonthlyPayments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MonthlyPayments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_monthly_payments_assignment")
                            .from(MonthlyPayments::Table, MonthlyPayments::AssignmentId)
                            .to(PackAssignments::Table, PackAssignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_monthly_payments_user")
                            .from(MonthlyPayments::Table, MonthlyPayments::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_monthly_payments_assignment_month")
                    .table(MonthlyPayments::Table)
                    .col(MonthlyPayments::AssignmentId)
                    .col(MonthlyPayments::Year)
                    .col(MonthlyPayments::Month)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_monthly_payments_status")
                    .table(MonthlyPayments::Table)
                    .col(MonthlyPayments::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MonthlyPayments::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum MonthlyPayments {
    Table,
    Id,
    AssignmentId,
    UserId,
    Year,
    Month,
    AmountDue,
    AmountPaid,
    AmountRefunded,
    Status,
    DueDate,
    PaidAt,
    CreatedAt,
    UpdatedAt,
}
