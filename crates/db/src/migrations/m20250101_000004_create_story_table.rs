//! Create story and story view tables migration.

use sea_orm_migration::prelude::*;

use super::audit::{Audit, User, add_audit_columns};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(Story::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Story::Id)
                    .big_integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Story::Image).string_len(1024).not_null());
        add_audit_columns(&mut table, Story::Table, "story");

        manager.create_table(table.to_owned()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_story_created_by")
                    .table(Story::Table)
                    .col(Audit::CreatedBy)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StoryView::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StoryView::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StoryView::StoryId).big_integer().not_null())
                    .col(ColumnDef::new(StoryView::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(StoryView::ViewedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_story_view_story")
                            .from(StoryView::Table, StoryView::StoryId)
                            .to(Story::Table, Story::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_story_view_user")
                            .from(StoryView::Table, StoryView::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (story_id, user_id) - one view record per viewer
        manager
            .create_index(
                Index::create()
                    .name("idx_story_view_story_user")
                    .table(StoryView::Table)
                    .col(StoryView::StoryId)
                    .col(StoryView::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StoryView::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Story::Table).to_owned())
            .await
    }
}

#[derive(Iden, Clone, Copy)]
enum Story {
    Table,
    Id,
    Image,
}

#[derive(Iden)]
enum StoryView {
    Table,
    Id,
    StoryId,
    UserId,
    ViewedAt,
}
