use sea_orm_migration::prelude::*;

use crate::m20260605_120000_accounts::Accounts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum ScheduledObligations {
    Table,
    Id,
    UserId,
    Title,
    AmountMinor,
    DueAt,
    Category,
    Description,
    IsPaid,
    PaidAt,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScheduledObligations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScheduledObligations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ScheduledObligations::UserId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduledObligations::Title)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduledObligations::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ScheduledObligations::DueAt).date().not_null())
                    .col(
                        ColumnDef::new(ScheduledObligations::Category)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ScheduledObligations::Description).string())
                    .col(
                        ColumnDef::new(ScheduledObligations::IsPaid)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(ScheduledObligations::PaidAt).timestamp())
                    .col(
                        ColumnDef::new(ScheduledObligations::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-scheduled_obligations-user_id")
                            .from(ScheduledObligations::Table, ScheduledObligations::UserId)
                            .to(Accounts::Table, Accounts::UserId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-scheduled_obligations-user_id-is_paid-due_at")
                    .table(ScheduledObligations::Table)
                    .col(ScheduledObligations::UserId)
                    .col(ScheduledObligations::IsPaid)
                    .col(ScheduledObligations::DueAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScheduledObligations::Table).to_owned())
            .await
    }
}
