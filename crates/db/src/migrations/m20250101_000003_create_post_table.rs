//! Create post table migration.

use sea_orm_migration::prelude::*;

use super::audit::{Audit, add_audit_columns};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(Post::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Post::Id)
                    .big_integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Post::Caption).text().not_null().default(""))
            .col(ColumnDef::new(Post::Image).string_len(1024).not_null());
        add_audit_columns(&mut table, Post::Table, "post");

        manager.create_table(table.to_owned()).await?;

        // Index: created_by (for a user's posts)
        manager
            .create_index(
                Index::create()
                    .name("idx_post_created_by")
                    .table(Post::Table)
                    .col(Audit::CreatedBy)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Post::Table).to_owned())
            .await
    }
}

#[derive(Iden, Clone, Copy)]
enum Post {
    Table,
    Id,
    Caption,
    Image,
}
