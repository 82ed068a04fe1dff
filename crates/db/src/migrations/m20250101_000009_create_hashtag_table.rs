//! Create hashtag and post-hashtag link tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Hashtag::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Hashtag::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Hashtag::Name).string_len(50).not_null())
                    .col(
                        ColumnDef::new(Hashtag::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_hashtag_name")
                    .table(Hashtag::Table)
                    .col(Hashtag::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PostHashtag::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PostHashtag::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PostHashtag::PostId).big_integer().not_null())
                    .col(ColumnDef::new(PostHashtag::HashtagId).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_hashtag_post")
                            .from(PostHashtag::Table, PostHashtag::PostId)
                            .to(Post::Table, Post::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_hashtag_hashtag")
                            .from(PostHashtag::Table, PostHashtag::HashtagId)
                            .to(Hashtag::Table, Hashtag::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (post_id, hashtag_id)
        manager
            .create_index(
                Index::create()
                    .name("idx_post_hashtag_post_hashtag")
                    .table(PostHashtag::Table)
                    .col(PostHashtag::PostId)
                    .col(PostHashtag::HashtagId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: hashtag_id (posts for a tag)
        manager
            .create_index(
                Index::create()
                    .name("idx_post_hashtag_hashtag_id")
                    .table(PostHashtag::Table)
                    .col(PostHashtag::HashtagId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PostHashtag::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Hashtag::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Hashtag {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(Iden)]
enum PostHashtag {
    Table,
    Id,
    PostId,
    HashtagId,
}

#[derive(Iden)]
enum Post {
    Table,
    Id,
}
