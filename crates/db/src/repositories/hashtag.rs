//! Hashtag repository.

use std::sync::Arc;

use super::map_write_err;
use crate::entities::{Hashtag, PostHashtag, hashtag, post_hashtag};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use snapfeed_common::{AppError, AppResult};

/// Hashtag repository for database operations.
#[derive(Clone)]
pub struct HashtagRepository {
    db: Arc<DatabaseConnection>,
}

impl HashtagRepository {
    /// Create a new hashtag repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a hashtag by name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<hashtag::Model>> {
        let name_lower = name.to_lowercase();
        Hashtag::find()
            .filter(hashtag::Column::Name.eq(&name_lower))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find hashtags by exact name.
    pub async fn find_by_names(&self, names: &[String]) -> AppResult<Vec<hashtag::Model>> {
        if names.is_empty() {
            return Ok(vec![]);
        }

        Hashtag::find()
            .filter(hashtag::Column::Name.is_in(names.iter().map(|n| n.to_lowercase())))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get or create a hashtag.
    ///
    /// When a concurrent request inserts the same name first, the unique
    /// index rejects our insert and the winner's row is returned.
    pub async fn get_or_create(&self, name: &str) -> AppResult<hashtag::Model> {
        let name_lower = name.to_lowercase();

        if let Some(tag) = self.find_by_name(&name_lower).await? {
            return Ok(tag);
        }

        let model = hashtag::ActiveModel {
            name: Set(name_lower.clone()),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        match model.insert(self.db.as_ref()).await {
            Ok(tag) => Ok(tag),
            Err(e) => match map_write_err(e, "Hashtag") {
                AppError::Conflict(_) => self
                    .find_by_name(&name_lower)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("Hashtag #{name_lower}"))),
                other => Err(other),
            },
        }
    }

    /// List hashtags alphabetically.
    pub async fn find_all(&self, limit: u64) -> AppResult<Vec<hashtag::Model>> {
        Hashtag::find()
            .order_by_asc(hashtag::Column::Name)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Search hashtags by name prefix.
    pub async fn search(&self, query: &str, limit: u64) -> AppResult<Vec<hashtag::Model>> {
        let pattern = format!("{}%", query.to_lowercase());
        Hashtag::find()
            .filter(hashtag::Column::Name.like(&pattern))
            .order_by_asc(hashtag::Column::Name)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ==================== Post links ====================

    /// Link a post to a hashtag. Linking an already linked pair is a no-op.
    pub async fn link_post(&self, post_id: i64, hashtag_id: i64) -> AppResult<()> {
        let link = post_hashtag::ActiveModel {
            post_id: Set(post_id),
            hashtag_id: Set(hashtag_id),
            ..Default::default()
        };

        match link.insert(self.db.as_ref()).await {
            Ok(_) => Ok(()),
            Err(e) => match map_write_err(e, "Post hashtag") {
                AppError::Conflict(_) => Ok(()),
                other => Err(other),
            },
        }
    }

    /// Remove the links between a post and the given hashtags.
    pub async fn unlink_hashtags(&self, post_id: i64, hashtag_ids: &[i64]) -> AppResult<u64> {
        if hashtag_ids.is_empty() {
            return Ok(0);
        }

        PostHashtag::delete_many()
            .filter(post_hashtag::Column::PostId.eq(post_id))
            .filter(post_hashtag::Column::HashtagId.is_in(hashtag_ids.to_vec()))
            .exec(self.db.as_ref())
            .await
            .map(|res| res.rows_affected)
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Hashtags linked to a post.
    pub async fn find_by_post(&self, post_id: i64) -> AppResult<Vec<hashtag::Model>> {
        let ids: Vec<i64> = PostHashtag::find()
            .filter(post_hashtag::Column::PostId.eq(post_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .into_iter()
            .map(|link| link.hashtag_id)
            .collect();

        if ids.is_empty() {
            return Ok(vec![]);
        }

        Hashtag::find()
            .filter(hashtag::Column::Id.is_in(ids))
            .order_by_asc(hashtag::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// IDs of posts linked to a hashtag, newest post first.
    pub async fn find_post_ids(
        &self,
        hashtag_id: i64,
        limit: u64,
        until_id: Option<i64>,
    ) -> AppResult<Vec<i64>> {
        let mut query = PostHashtag::find()
            .filter(post_hashtag::Column::HashtagId.eq(hashtag_id))
            .order_by_desc(post_hashtag::Column::PostId);

        if let Some(id) = until_id {
            query = query.filter(post_hashtag::Column::PostId.lt(id));
        }

        let links = query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(links.into_iter().map(|link| link.post_id).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_hashtag(id: i64, name: &str) -> hashtag::Model {
        hashtag::Model {
            id,
            name: name.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_get_or_create_existing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_hashtag(1, "sunset")]])
                .into_connection(),
        );

        let repo = HashtagRepository::new(db);
        let tag = repo.get_or_create("Sunset").await.unwrap();

        assert_eq!(tag.id, 1);
        assert_eq!(tag.name, "sunset");
    }

    #[tokio::test]
    async fn test_get_or_create_new() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<hashtag::Model>::new()])
                .append_query_results([[create_test_hashtag(2, "beach")]])
                .into_connection(),
        );

        let repo = HashtagRepository::new(db);
        let tag = repo.get_or_create("beach").await.unwrap();

        assert_eq!(tag.id, 2);
    }

    #[tokio::test]
    async fn test_find_by_post() {
        let link = post_hashtag::Model {
            id: 1,
            post_id: 10,
            hashtag_id: 3,
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[link]])
                .append_query_results([[create_test_hashtag(3, "sunset")]])
                .into_connection(),
        );

        let repo = HashtagRepository::new(db);
        let tags = repo.find_by_post(10).await.unwrap();

        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "sunset");
    }

    #[tokio::test]
    async fn test_find_post_ids() {
        let links = vec![
            post_hashtag::Model {
                id: 2,
                post_id: 11,
                hashtag_id: 3,
            },
            post_hashtag::Model {
                id: 1,
                post_id: 10,
                hashtag_id: 3,
            },
        ];

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([links])
                .into_connection(),
        );

        let repo = HashtagRepository::new(db);
        assert_eq!(repo.find_post_ids(3, 20, None).await.unwrap(), vec![11, 10]);
    }

    #[tokio::test]
    async fn test_unlink_hashtags_only_named_links() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([sea_orm::MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = HashtagRepository::new(Arc::clone(&db));
        assert_eq!(repo.unlink_hashtags(10, &[]).await.unwrap(), 0);
        assert_eq!(repo.unlink_hashtags(10, &[3]).await.unwrap(), 1);
        drop(repo);

        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        assert_eq!(log.len(), 1);
        let sql = &log[0].statements()[0].sql;
        assert!(sql.starts_with("DELETE FROM \"post_hashtag\""));
        assert!(sql.contains("\"hashtag_id\" IN"));
    }
}
