//! Saved post service.

use sea_orm::Set;
use snapfeed_common::{AppError, AppResult};
use snapfeed_db::{
    entities::{Audited, post_save},
    repositories::{PostRepository, PostSaveRepository},
};

/// Saved post service for business logic.
#[derive(Clone)]
pub struct PostSaveService {
    save_repo: PostSaveRepository,
    post_repo: PostRepository,
}

impl PostSaveService {
    /// Create a new saved post service.
    #[must_use]
    pub const fn new(save_repo: PostSaveRepository, post_repo: PostRepository) -> Self {
        Self {
            save_repo,
            post_repo,
        }
    }

    /// Save a post for the actor. Saving twice returns the existing record.
    pub async fn save(&self, actor_id: i64, post_id: i64) -> AppResult<post_save::Model> {
        let post = self.post_repo.get_by_id(post_id).await?;

        if let Some(existing) = self.save_repo.find_by_pair(actor_id, post.id).await? {
            return Ok(existing);
        }

        let model = post_save::ActiveModel {
            user_id: Set(actor_id),
            post_id: Set(post.id),
            ..Default::default()
        }
        .stamp_created(actor_id);

        match self.save_repo.create(model).await {
            Ok(saved) => Ok(saved),
            Err(AppError::Conflict(_)) => self
                .save_repo
                .find_by_pair(actor_id, post.id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Saved post {post_id}"))),
            Err(e) => Err(e),
        }
    }

    /// Remove a saved post. Returns whether anything was removed.
    pub async fn unsave(&self, actor_id: i64, post_id: i64) -> AppResult<bool> {
        self.save_repo.delete_by_pair(actor_id, post_id).await
    }

    /// The actor's saved posts, most recently saved first.
    pub async fn list(
        &self,
        actor_id: i64,
        limit: u64,
        until_id: Option<i64>,
    ) -> AppResult<Vec<post_save::Model>> {
        self.save_repo.find_by_user(actor_id, limit, until_id).await
    }
}
