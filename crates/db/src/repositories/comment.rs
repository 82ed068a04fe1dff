//! Comment repository.

use std::sync::Arc;

use crate::entities::{Comment, comment};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use snapfeed_common::{AppError, AppResult};

/// Comment repository for database operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a comment by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<comment::Model>> {
        Comment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a comment by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i64) -> AppResult<comment::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Comment {id}")))
    }

    /// List all comments, newest first.
    pub async fn find_all(
        &self,
        limit: u64,
        until_id: Option<i64>,
    ) -> AppResult<Vec<comment::Model>> {
        let mut query = Comment::find().order_by_desc(comment::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(comment::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Comments attached to a target, oldest first.
    pub async fn find_by_target(
        &self,
        target_kind: &str,
        target_id: i64,
        limit: u64,
        since_id: Option<i64>,
    ) -> AppResult<Vec<comment::Model>> {
        let mut query = Comment::find()
            .filter(comment::Column::TargetKind.eq(target_kind))
            .filter(comment::Column::TargetId.eq(target_id))
            .order_by_asc(comment::Column::Id);

        if let Some(id) = since_id {
            query = query.filter(comment::Column::Id.gt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count comments attached to a target.
    pub async fn count_by_target(&self, target_kind: &str, target_id: i64) -> AppResult<u64> {
        Comment::find()
            .filter(comment::Column::TargetKind.eq(target_kind))
            .filter(comment::Column::TargetId.eq(target_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Direct replies to a comment, oldest first.
    pub async fn find_replies(&self, parent_id: i64, limit: u64) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::ParentId.eq(parent_id))
            .order_by_asc(comment::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new comment.
    pub async fn create(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a comment and, through the parent key, its replies.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        Comment::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_comment(id: i64, target_id: i64, parent_id: Option<i64>) -> comment::Model {
        comment::Model {
            id,
            target_kind: "post".to_string(),
            target_id,
            text: format!("comment {id}"),
            parent_id,
            created_by: 1,
            updated_by: 1,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_target() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_comment(1, 7, None),
                    create_test_comment(2, 7, Some(1)),
                ]])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let comments = repo.find_by_target("post", 7, 50, None).await.unwrap();

        assert_eq!(comments.len(), 2);
        assert!(comments.iter().all(|c| c.target_id == 7));
    }

    #[tokio::test]
    async fn test_find_replies() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_comment(2, 7, Some(1))]])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let replies = repo.find_replies(1, 50).await.unwrap();

        assert_eq!(replies[0].parent_id, Some(1));
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<comment::Model>::new()])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        assert!(matches!(repo.get_by_id(3).await, Err(AppError::NotFound(_))));
    }
}
