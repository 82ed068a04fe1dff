//! Create post save table migration.

use sea_orm_migration::prelude::*;

use super::audit::{User, add_audit_columns};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(PostSave::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(PostSave::Id)
                    .big_integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(PostSave::UserId).big_integer().not_null())
            .col(ColumnDef::new(PostSave::PostId).big_integer().not_null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_post_save_user")
                    .from(PostSave::Table, PostSave::UserId)
                    .to(User::Table, User::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_post_save_post")
                    .from(PostSave::Table, PostSave::PostId)
                    .to(Post::Table, Post::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        add_audit_columns(&mut table, PostSave::Table, "post_save");

        manager.create_table(table.to_owned()).await?;

        // Unique index: (user_id, post_id) - a post is saved at most once per user
        manager
            .create_index(
                Index::create()
                    .name("idx_post_save_user_post")
                    .table(PostSave::Table)
                    .col(PostSave::UserId)
                    .col(PostSave::PostId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PostSave::Table).to_owned())
            .await
    }
}

#[derive(Iden, Clone, Copy)]
enum PostSave {
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
