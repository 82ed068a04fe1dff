//! Create notification table migration.

use sea_orm_migration::prelude::*;

use super::audit::{User, add_audit_columns};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(Notification::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Notification::Id)
                    .big_integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Notification::UserId).big_integer().not_null())
            .col(ColumnDef::new(Notification::Text).text().not_null())
            .col(
                ColumnDef::new(Notification::IsRead)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_notification_user")
                    .from(Notification::Table, Notification::UserId)
                    .to(User::Table, User::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        add_audit_columns(&mut table, Notification::Table, "notification");

        manager.create_table(table.to_owned()).await?;

        // Index: (user_id, is_read) - unread listing
        manager
            .create_index(
                Index::create()
                    .name("idx_notification_user_is_read")
                    .table(Notification::Table)
                    .col(Notification::UserId)
                    .col(Notification::IsRead)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notification::Table).to_owned())
            .await
    }
}

#[derive(Iden, Clone, Copy)]
enum Notification {
    Table,
    Id,
    UserId,
    Text,
    IsRead,
}
