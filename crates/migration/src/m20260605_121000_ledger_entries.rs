use sea_orm_migration::prelude::*;

use crate::m20260605_120000_accounts::Accounts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum LedgerEntries {
    Table,
    Id,
    UserId,
    Title,
    AmountMinor,
    OccurredAt,
    Category,
    Description,
    ScheduledId,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LedgerEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LedgerEntries::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LedgerEntries::UserId).string().not_null())
                    .col(ColumnDef::new(LedgerEntries::Title).string().not_null())
                    .col(
                        ColumnDef::new(LedgerEntries::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LedgerEntries::OccurredAt).date().not_null())
                    .col(ColumnDef::new(LedgerEntries::Category).string().not_null())
                    .col(ColumnDef::new(LedgerEntries::Description).string())
                    .col(ColumnDef::new(LedgerEntries::ScheduledId).string())
                    .col(
                        ColumnDef::new(LedgerEntries::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-ledger_entries-user_id")
                            .from(LedgerEntries::Table, LedgerEntries::UserId)
                            .to(Accounts::Table, Accounts::UserId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ledger_entries-user_id-occurred_at")
                    .table(LedgerEntries::Table)
                    .col(LedgerEntries::UserId)
                    .col(LedgerEntries::OccurredAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LedgerEntries::Table).to_owned())
            .await
    }
}
