use sea_orm_migration::{
    prelude::*,
    schema::{string, text, timestamp, uuid},
};

use super::m20250901_120000_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(JournalEntries::Table)
                    .if_not_exists()
                    .col(uuid(JournalEntries::Id).primary_key())
                    .col(uuid(JournalEntries::UserId))
                    .col(string(JournalEntries::Title))
                    .col(text(JournalEntries::Content))
                    .col(timestamp(JournalEntries::Date))
                    .col(timestamp(JournalEntries::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-journal_entries-user_id")
                            .from(JournalEntries::Table, JournalEntries::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Entries are always listed per owner
        manager
            .create_index(
                Index::create()
                    .name("idx-journal_entries-user_id")
                    .table(JournalEntries::Table)
                    .col(JournalEntries::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JournalEntries::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum JournalEntries {
    Table,
    Id,
    UserId,
    Title,
    Content,
    Date,
    UpdatedAt,
}
