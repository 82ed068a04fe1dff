//! Saved post repository.

use std::sync::Arc;

use super::map_write_err;
use crate::entities::{PostSave, post_save};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use snapfeed_common::{AppError, AppResult};

/// Saved post repository for database operations.
#[derive(Clone)]
pub struct PostSaveRepository {
    db: Arc<DatabaseConnection>,
}

impl PostSaveRepository {
    /// Create a new saved post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a save by user and post.
    pub async fn find_by_pair(
        &self,
        user_id: i64,
        post_id: i64,
    ) -> AppResult<Option<post_save::Model>> {
        PostSave::find()
            .filter(post_save::Column::UserId.eq(user_id))
            .filter(post_save::Column::PostId.eq(post_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a save. A duplicate pair yields [`AppError::Conflict`].
    pub async fn create(&self, model: post_save::ActiveModel) -> AppResult<post_save::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| map_write_err(e, "Saved post"))
    }

    /// Delete a save by pair. Returns whether a row was removed.
    pub async fn delete_by_pair(&self, user_id: i64, post_id: i64) -> AppResult<bool> {
        let result = PostSave::delete_many()
            .filter(post_save::Column::UserId.eq(user_id))
            .filter(post_save::Column::PostId.eq(post_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// A user's saved posts, most recently saved first.
    pub async fn find_by_user(
        &self,
        user_id: i64,
        limit: u64,
        until_id: Option<i64>,
    ) -> AppResult<Vec<post_save::Model>> {
        let mut query = PostSave::find()
            .filter(post_save::Column::UserId.eq(user_id))
            .order_by_desc(post_save::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(post_save::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
