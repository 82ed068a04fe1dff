//! Post repository.

use std::sync::Arc;

use crate::entities::{Post, post};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use snapfeed_common::{AppError, AppResult};

/// Post repository for database operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a post by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a post by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i64) -> AppResult<post::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {id}")))
    }

    /// Find posts by IDs.
    pub async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<post::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Post::find()
            .filter(post::Column::Id.is_in(ids.to_vec()))
            .order_by_desc(post::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List posts, newest first.
    pub async fn find_all(&self, limit: u64, until_id: Option<i64>) -> AppResult<Vec<post::Model>> {
        let mut query = Post::find().order_by_desc(post::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(post::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Posts created by a user, newest first.
    pub async fn find_by_user(
        &self,
        user_id: i64,
        limit: u64,
        until_id: Option<i64>,
    ) -> AppResult<Vec<post::Model>> {
        let mut query = Post::find()
            .filter(post::Column::CreatedBy.eq(user_id))
            .order_by_desc(post::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(post::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new post.
    pub async fn create(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a post.
    pub async fn update(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a post. Likes, saves and hashtag links cascade; comments and
    /// reports that point at it are left in place.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        Post::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
