//! Post service.

use sea_orm::Set;
use serde::Deserialize;
use snapfeed_common::{AppError, AppResult, StorageCategory};
use snapfeed_db::{
    entities::{Audited, hashtag, post},
    repositories::PostRepository,
};
use validator::Validate;

use super::{
    hashtag::HashtagService,
    media::{ImageSource, MediaStore},
};

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    hashtag_service: HashtagService,
    media: MediaStore,
}

/// Input for creating a post.
#[derive(Debug, Validate)]
pub struct CreatePostInput {
    #[validate(length(max = 2200))]
    pub caption: String,

    pub image: ImageSource,
}

/// Input for editing a post's caption.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostInput {
    #[validate(length(max = 2200))]
    pub caption: String,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub const fn new(
        post_repo: PostRepository,
        hashtag_service: HashtagService,
        media: MediaStore,
    ) -> Self {
        Self {
            post_repo,
            hashtag_service,
            media,
        }
    }

    /// Create a post and link the hashtags found in its caption.
    pub async fn create(&self, actor_id: i64, input: CreatePostInput) -> AppResult<post::Model> {
        input.validate()?;

        let image = self
            .media
            .store(actor_id, StorageCategory::Posts, input.image)
            .await?;

        let model = post::ActiveModel {
            caption: Set(input.caption),
            image: Set(image),
            ..Default::default()
        }
        .stamp_created(actor_id);

        let post = self.post_repo.create(model).await?;
        self.link_hashtags(&post, None).await;

        tracing::info!(post_id = post.id, user_id = actor_id, "Created post");

        Ok(post)
    }

    pub async fn get(&self, id: i64) -> AppResult<post::Model> {
        self.post_repo.get_by_id(id).await
    }

    pub async fn find(&self, id: i64) -> AppResult<Option<post::Model>> {
        self.post_repo.find_by_id(id).await
    }

    /// List posts, newest first.
    pub async fn list(&self, limit: u64, until_id: Option<i64>) -> AppResult<Vec<post::Model>> {
        self.post_repo.find_all(limit, until_id).await
    }

    pub async fn list_by_user(
        &self,
        user_id: i64,
        limit: u64,
        until_id: Option<i64>,
    ) -> AppResult<Vec<post::Model>> {
        self.post_repo.find_by_user(user_id, limit, until_id).await
    }

    /// Replace a post's caption. Hashtag links follow the new caption.
    pub async fn update_caption(
        &self,
        actor_id: i64,
        post_id: i64,
        input: UpdatePostInput,
    ) -> AppResult<post::Model> {
        input.validate()?;

        let post = self.owned(actor_id, post_id).await?;
        let previous = post.caption.clone();

        let mut active: post::ActiveModel = post.into();
        active.caption = Set(input.caption);
        let post = self.post_repo.update(active.stamp_updated(actor_id)).await?;

        self.link_hashtags(&post, Some(&previous)).await;

        Ok(post)
    }

    /// Delete a post. Only its creator may do so.
    pub async fn delete(&self, actor_id: i64, post_id: i64) -> AppResult<()> {
        self.owned(actor_id, post_id).await?;
        self.post_repo.delete(post_id).await?;

        tracing::info!(post_id, user_id = actor_id, "Deleted post");
        Ok(())
    }

    pub async fn hashtags(&self, post_id: i64) -> AppResult<Vec<hashtag::Model>> {
        self.hashtag_service.for_post(post_id).await
    }

    /// Sync caption hashtags. The post is already saved, so a failure is
    /// logged rather than returned.
    async fn link_hashtags(&self, post: &post::Model, previous: Option<&str>) {
        if let Err(e) = self
            .hashtag_service
            .sync_caption(post.id, previous, &post.caption)
            .await
        {
            tracing::warn!(error = %e, post_id = post.id, "Failed to sync caption hashtags");
        }
    }

    async fn owned(&self, actor_id: i64, post_id: i64) -> AppResult<post::Model> {
        let post = self.post_repo.get_by_id(post_id).await?;
        if post.created_by != actor_id {
            return Err(AppError::Forbidden(
                "Only the creator can modify this post".to_string(),
            ));
        }
        Ok(post)
    }
}
