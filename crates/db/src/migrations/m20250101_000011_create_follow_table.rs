//! Create follow table migration.

use sea_orm_migration::prelude::*;

use super::audit::{User, add_audit_columns};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(Follow::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Follow::Id)
                    .big_integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Follow::FollowerId).big_integer().not_null())
            .col(ColumnDef::new(Follow::FollowingId).big_integer().not_null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_follow_follower")
                    .from(Follow::Table, Follow::FollowerId)
                    .to(User::Table, User::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_follow_following")
                    .from(Follow::Table, Follow::FollowingId)
                    .to(User::Table, User::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        add_audit_columns(&mut table, Follow::Table, "follow");

        manager.create_table(table.to_owned()).await?;

        // Unique index: (follower_id, following_id) - prevent duplicate follows
        manager
            .create_index(
                Index::create()
                    .name("idx_follow_follower_following")
                    .table(Follow::Table)
                    .col(Follow::FollowerId)
                    .col(Follow::FollowingId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: following_id (for listing followers)
        manager
            .create_index(
                Index::create()
                    .name("idx_follow_following_id")
                    .table(Follow::Table)
                    .col(Follow::FollowingId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Follow::Table).to_owned())
            .await
    }
}

#[derive(Iden, Clone, Copy)]
enum Follow {
    Table,
    Id,
    FollowerId,
    FollowingId,
}
