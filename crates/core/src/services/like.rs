//! Post like service.

use snapfeed_common::AppResult;
use snapfeed_db::{
    entities::{Audited, post_like},
    repositories::{PostLikeRepository, PostRepository},
};
use sea_orm::Set;

use super::toggle::ToggleResult;

/// Like service for business logic.
#[derive(Clone)]
pub struct LikeService {
    like_repo: PostLikeRepository,
    post_repo: PostRepository,
}

impl LikeService {
    /// Create a new like service.
    #[must_use]
    pub const fn new(like_repo: PostLikeRepository, post_repo: PostRepository) -> Self {
        Self {
            like_repo,
            post_repo,
        }
    }

    /// Like a post, or remove the like if it already exists.
    pub async fn toggle(&self, actor_id: i64, post_id: i64) -> AppResult<ToggleResult> {
        self.post_repo.get_by_id(post_id).await?;

        if self.like_repo.delete_by_pair(actor_id, post_id).await? {
            tracing::debug!(user_id = actor_id, post_id, "Removed like");
            return Ok(ToggleResult::removed());
        }

        let model = post_like::ActiveModel {
            user_id: Set(actor_id),
            post_id: Set(post_id),
            ..Default::default()
        }
        .stamp_created(actor_id);

        let result = ToggleResult::from_insert(self.like_repo.create(model).await)?;
        tracing::debug!(user_id = actor_id, post_id, "Liked post");
        Ok(result)
    }

    /// Whether `user_id` has liked a post.
    pub async fn is_liked(&self, user_id: i64, post_id: i64) -> AppResult<bool> {
        self.like_repo.has_liked(user_id, post_id).await
    }

    /// Number of likes on a post.
    pub async fn like_count(&self, post_id: i64) -> AppResult<u64> {
        self.like_repo.count_by_post(post_id).await
    }

    /// Likes on a post, newest first.
    pub async fn likes(
        &self,
        post_id: i64,
        limit: u64,
        until_id: Option<i64>,
    ) -> AppResult<Vec<post_like::Model>> {
        self.like_repo.find_by_post(post_id, limit, until_id).await
    }
}
