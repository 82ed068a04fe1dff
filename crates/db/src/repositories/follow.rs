//! Follow repository.

use std::sync::Arc;

use super::map_write_err;
use crate::entities::{Follow, follow};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use snapfeed_common::{AppError, AppResult};

/// Follow repository for database operations.
#[derive(Clone)]
pub struct FollowRepository {
    db: Arc<DatabaseConnection>,
}

impl FollowRepository {
    /// Create a new follow repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a follow by follower and followee.
    pub async fn find_by_pair(
        &self,
        follower_id: i64,
        following_id: i64,
    ) -> AppResult<Option<follow::Model>> {
        Follow::find()
            .filter(follow::Column::FollowerId.eq(follower_id))
            .filter(follow::Column::FollowingId.eq(following_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a user is following another user.
    pub async fn is_following(&self, follower_id: i64, following_id: i64) -> AppResult<bool> {
        Ok(self.find_by_pair(follower_id, following_id).await?.is_some())
    }

    /// Create a follow. A duplicate pair yields [`AppError::Conflict`].
    pub async fn create(&self, model: follow::ActiveModel) -> AppResult<follow::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| map_write_err(e, "Follow"))
    }

    /// Delete a follow by pair. Returns whether a row was removed.
    pub async fn delete_by_pair(&self, follower_id: i64, following_id: i64) -> AppResult<bool> {
        let result = Follow::delete_many()
            .filter(follow::Column::FollowerId.eq(follower_id))
            .filter(follow::Column::FollowingId.eq(following_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Follows made by a user (paginated).
    pub async fn find_following(
        &self,
        user_id: i64,
        limit: u64,
        until_id: Option<i64>,
    ) -> AppResult<Vec<follow::Model>> {
        let mut query = Follow::find()
            .filter(follow::Column::FollowerId.eq(user_id))
            .order_by_desc(follow::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(follow::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Follows of a user by others (paginated).
    pub async fn find_followers(
        &self,
        user_id: i64,
        limit: u64,
        until_id: Option<i64>,
    ) -> AppResult<Vec<follow::Model>> {
        let mut query = Follow::find()
            .filter(follow::Column::FollowingId.eq(user_id))
            .order_by_desc(follow::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(follow::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count followers of a user.
    pub async fn count_followers(&self, user_id: i64) -> AppResult<u64> {
        Follow::find()
            .filter(follow::Column::FollowingId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count users a user follows.
    pub async fn count_following(&self, user_id: i64) -> AppResult<u64> {
        Follow::find()
            .filter(follow::Column::FollowerId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
