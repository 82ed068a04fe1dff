//! Create message table migration.

use sea_orm_migration::prelude::*;

use super::audit::{User, add_audit_columns};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(Message::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Message::Id)
                    .big_integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Message::SenderId).big_integer().not_null())
            .col(ColumnDef::new(Message::ReceiverId).big_integer().not_null())
            .col(ColumnDef::new(Message::Text).text().not_null())
            .col(ColumnDef::new(Message::Seen).boolean().not_null().default(false))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_message_sender")
                    .from(Message::Table, Message::SenderId)
                    .to(User::Table, User::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_message_receiver")
                    .from(Message::Table, Message::ReceiverId)
                    .to(User::Table, User::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        add_audit_columns(&mut table, Message::Table, "message");

        manager.create_table(table.to_owned()).await?;

        // Index: (sender_id, receiver_id) - conversation lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_message_sender_receiver")
                    .table(Message::Table)
                    .col(Message::SenderId)
                    .col(Message::ReceiverId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_message_receiver_id")
                    .table(Message::Table)
                    .col(Message::ReceiverId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Message::Table).to_owned())
            .await
    }
}

#[derive(Iden, Clone, Copy)]
enum Message {
    Table,
    Id,
    SenderId,
    ReceiverId,
    Text,
    Seen,
}
