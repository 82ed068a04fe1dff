//! Story repository.

use std::sync::Arc;

use super::map_write_err;
use crate::entities::{Story, StoryView, story, story_view};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use snapfeed_common::{AppError, AppResult};

/// Story repository for database operations.
#[derive(Clone)]
pub struct StoryRepository {
    db: Arc<DatabaseConnection>,
}

impl StoryRepository {
    /// Create a new story repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a story by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<story::Model>> {
        Story::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a story by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i64) -> AppResult<story::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Story {id}")))
    }

    /// List stories, newest first.
    pub async fn find_all(
        &self,
        limit: u64,
        until_id: Option<i64>,
    ) -> AppResult<Vec<story::Model>> {
        let mut query = Story::find().order_by_desc(story::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(story::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Stories created by a user, newest first.
    pub async fn find_by_user(&self, user_id: i64, limit: u64) -> AppResult<Vec<story::Model>> {
        Story::find()
            .filter(story::Column::CreatedBy.eq(user_id))
            .order_by_desc(story::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new story.
    pub async fn create(&self, model: story::ActiveModel) -> AppResult<story::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a story together with its view records.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        Story::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ==================== Views ====================

    /// Record that a user viewed a story. Repeated views keep the first record.
    pub async fn add_view(&self, story_id: i64, user_id: i64) -> AppResult<bool> {
        let view = story_view::ActiveModel {
            story_id: Set(story_id),
            user_id: Set(user_id),
            viewed_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        match view.insert(self.db.as_ref()).await {
            Ok(_) => Ok(true),
            Err(e) => match map_write_err(e, "Story view") {
                AppError::Conflict(_) => Ok(false),
                other => Err(other),
            },
        }
    }

    /// Views of a story, oldest first.
    pub async fn find_views(&self, story_id: i64) -> AppResult<Vec<story_view::Model>> {
        StoryView::find()
            .filter(story_view::Column::StoryId.eq(story_id))
            .order_by_asc(story_view::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count distinct viewers of a story.
    pub async fn count_views(&self, story_id: i64) -> AppResult<u64> {
        StoryView::find()
            .filter(story_view::Column::StoryId.eq(story_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
