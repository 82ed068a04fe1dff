//! Create post like table migration.

use sea_orm_migration::prelude::*;

use super::audit::{User, add_audit_columns};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(PostLike::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(PostLike::Id)
                    .big_integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(PostLike::UserId).big_integer().not_null())
            .col(ColumnDef::new(PostLike::PostId).big_integer().not_null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_post_like_user")
                    .from(PostLike::Table, PostLike::UserId)
                    .to(User::Table, User::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_post_like_post")
                    .from(PostLike::Table, PostLike::PostId)
                    .to(Post::Table, Post::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        add_audit_columns(&mut table, PostLike::Table, "post_like");

        manager.create_table(table.to_owned()).await?;

        // Unique index: (user_id, post_id) - one like per user and post
        manager
            .create_index(
                Index::create()
                    .name("idx_post_like_user_post")
                    .table(PostLike::Table)
                    .col(PostLike::UserId)
                    .col(PostLike::PostId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: post_id (like counts)
        manager
            .create_index(
                Index::create()
                    .name("idx_post_like_post_id")
                    .table(PostLike::Table)
                    .col(PostLike::PostId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PostLike::Table).to_owned())
            .await
    }
}

#[derive(Iden, Clone, Copy)]
enum PostLike {
    Table,
    Id,
    UserId,
    PostId,
}

#[derive(Iden)]
enum Post {
    Table,
    Id,
}
