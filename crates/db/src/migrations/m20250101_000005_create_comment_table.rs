//! Create comment table migration.

use sea_orm_migration::prelude::*;

use super::audit::add_audit_columns;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(Comment::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Comment::Id)
                    .big_integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Comment::TargetKind).string_len(32).not_null())
            .col(ColumnDef::new(Comment::TargetId).big_integer().not_null())
            .col(ColumnDef::new(Comment::Text).text().not_null())
            .col(ColumnDef::new(Comment::ParentId).big_integer())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_comment_parent")
                    .from(Comment::Table, Comment::ParentId)
                    .to(Comment::Table, Comment::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        add_audit_columns(&mut table, Comment::Table, "comment");

        manager.create_table(table.to_owned()).await?;

        // Index: (target_kind, target_id) - no foreign key exists on the pair
        manager
            .create_index(
                Index::create()
                    .name("idx_comment_target")
                    .table(Comment::Table)
                    .col(Comment::TargetKind)
                    .col(Comment::TargetId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comment_parent_id")
                    .table(Comment::Table)
                    .col(Comment::ParentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Comment::Table).to_owned())
            .await
    }
}

#[derive(Iden, Clone, Copy)]
enum Comment {
    Table,
    Id,
    TargetKind,
    TargetId,
    Text,
    ParentId,
}
