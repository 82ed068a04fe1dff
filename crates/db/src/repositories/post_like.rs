//! Post like repository.

use std::sync::Arc;

use super::map_write_err;
use crate::entities::{PostLike, post_like};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use snapfeed_common::{AppError, AppResult};

/// Post like repository for database operations.
#[derive(Clone)]
pub struct PostLikeRepository {
    db: Arc<DatabaseConnection>,
}

impl PostLikeRepository {
    /// Create a new post like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a like by user and post.
    pub async fn find_by_pair(
        &self,
        user_id: i64,
        post_id: i64,
    ) -> AppResult<Option<post_like::Model>> {
        PostLike::find()
            .filter(post_like::Column::UserId.eq(user_id))
            .filter(post_like::Column::PostId.eq(post_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a user has liked a post.
    pub async fn has_liked(&self, user_id: i64, post_id: i64) -> AppResult<bool> {
        Ok(self.find_by_pair(user_id, post_id).await?.is_some())
    }

    /// Create a like. A duplicate pair yields [`AppError::Conflict`].
    pub async fn create(&self, model: post_like::ActiveModel) -> AppResult<post_like::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| map_write_err(e, "Like"))
    }

    /// Delete a like by pair. Returns whether a row was removed.
    pub async fn delete_by_pair(&self, user_id: i64, post_id: i64) -> AppResult<bool> {
        let result = PostLike::delete_many()
            .filter(post_like::Column::UserId.eq(user_id))
            .filter(post_like::Column::PostId.eq(post_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Likes on a post, newest first.
    pub async fn find_by_post(
        &self,
        post_id: i64,
        limit: u64,
        until_id: Option<i64>,
    ) -> AppResult<Vec<post_like::Model>> {
        let mut query = PostLike::find()
            .filter(post_like::Column::PostId.eq(post_id))
            .order_by_desc(post_like::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(post_like::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count likes on a post.
    pub async fn count_by_post(&self, post_id: i64) -> AppResult<u64> {
        PostLike::find()
            .filter(post_like::Column::PostId.eq(post_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, Set};

    fn create_test_like(id: i64, user_id: i64, post_id: i64) -> post_like::Model {
        post_like::Model {
            id,
            user_id,
            post_id,
            created_by: user_id,
            updated_by: user_id,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_has_liked() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_like(1, 5, 9)]])
                .into_connection(),
        );

        let repo = PostLikeRepository::new(db);
        assert!(repo.has_liked(5, 9).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_like() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_like(1, 5, 9)]])
                .into_connection(),
        );

        let repo = PostLikeRepository::new(db);
        let active = post_like::ActiveModel {
            user_id: Set(5),
            post_id: Set(9),
            ..Default::default()
        };

        let like = repo.create(active).await.unwrap();
        assert_eq!(like.post_id, 9);
    }

    #[tokio::test]
    async fn test_find_by_post() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_like(2, 6, 9), create_test_like(1, 5, 9)]])
                .into_connection(),
        );

        let repo = PostLikeRepository::new(db);
        let likes = repo.find_by_post(9, 10, None).await.unwrap();
        assert_eq!(likes.len(), 2);
    }
}
