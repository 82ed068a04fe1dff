//! Create profile table migration.

use sea_orm_migration::prelude::*;

use super::audit::{User, add_audit_columns};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(Profile::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Profile::Id)
                    .big_integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Profile::UserId).big_integer().not_null())
            .col(ColumnDef::new(Profile::Bio).text().not_null().default(""))
            .col(
                ColumnDef::new(Profile::ProfilePic)
                    .string_len(1024)
                    .not_null()
                    .default(""),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_profile_user")
                    .from(Profile::Table, Profile::UserId)
                    .to(User::Table, User::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        add_audit_columns(&mut table, Profile::Table, "profile");

        manager.create_table(table.to_owned()).await?;

        // One profile per user
        manager
            .create_index(
                Index::create()
                    .name("idx_profile_user_id")
                    .table(Profile::Table)
                    .col(Profile::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Profile::Table).to_owned())
            .await
    }
}

#[derive(Iden, Clone, Copy)]
enum Profile {
    Table,
    Id,
    UserId,
    Bio,
    ProfilePic,
}
