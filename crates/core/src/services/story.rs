//! Story service.

use sea_orm::Set;
use snapfeed_common::{AppError, AppResult, StorageCategory};
use snapfeed_db::{
    entities::{Audited, story, user},
    repositories::{StoryRepository, UserRepository},
};

use super::media::{ImageSource, MediaStore};

/// Story service for business logic.
#[derive(Clone)]
pub struct StoryService {
    story_repo: StoryRepository,
    user_repo: UserRepository,
    media: MediaStore,
}

impl StoryService {
    /// Create a new story service.
    #[must_use]
    pub const fn new(story_repo: StoryRepository, user_repo: UserRepository, media: MediaStore) -> Self {
        Self {
            story_repo,
            user_repo,
            media,
        }
    }

    /// Create a story from an image.
    pub async fn create(&self, actor_id: i64, image: ImageSource) -> AppResult<story::Model> {
        let image = self
            .media
            .store(actor_id, StorageCategory::Stories, image)
            .await?;

        let model = story::ActiveModel {
            image: Set(image),
            ..Default::default()
        }
        .stamp_created(actor_id);

        let story = self.story_repo.create(model).await?;
        tracing::info!(story_id = story.id, user_id = actor_id, "Created story");

        Ok(story)
    }

    pub async fn get(&self, id: i64) -> AppResult<story::Model> {
        self.story_repo.get_by_id(id).await
    }

    pub async fn find(&self, id: i64) -> AppResult<Option<story::Model>> {
        self.story_repo.find_by_id(id).await
    }

    /// List stories, newest first.
    pub async fn list(&self, limit: u64, until_id: Option<i64>) -> AppResult<Vec<story::Model>> {
        self.story_repo.find_all(limit, until_id).await
    }

    pub async fn list_by_user(&self, user_id: i64, limit: u64) -> AppResult<Vec<story::Model>> {
        self.story_repo.find_by_user(user_id, limit).await
    }

    /// Record the actor as a viewer. Returns whether this was their first view.
    pub async fn view(&self, actor_id: i64, story_id: i64) -> AppResult<bool> {
        let story = self.story_repo.get_by_id(story_id).await?;
        self.story_repo.add_view(story.id, actor_id).await
    }

    /// Users who viewed a story, in viewing order.
    pub async fn viewers(&self, story_id: i64) -> AppResult<Vec<user::Model>> {
        let views = self.story_repo.find_views(story_id).await?;
        let ids: Vec<i64> = views.iter().map(|v| v.user_id).collect();

        let mut users = self.user_repo.find_by_ids(&ids).await?;
        users.sort_by_key(|u| ids.iter().position(|id| *id == u.id));
        Ok(users)
    }

    pub async fn view_count(&self, story_id: i64) -> AppResult<u64> {
        self.story_repo.count_views(story_id).await
    }

    /// Delete a story. Only its creator may do so.
    pub async fn delete(&self, actor_id: i64, story_id: i64) -> AppResult<()> {
        let story = self.story_repo.get_by_id(story_id).await?;
        if story.created_by != actor_id {
            return Err(AppError::Forbidden(
                "Only the creator can delete this story".to_string(),
            ));
        }

        self.story_repo.delete(story.id).await?;
        tracing::info!(story_id, user_id = actor_id, "Deleted story");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use snapfeed_common::LocalStorage;
    use snapfeed_db::{entities::story_view, test_utils};
    use std::sync::Arc;

    fn service(story_db: DatabaseConnection, user_db: DatabaseConnection) -> StoryService {
        StoryService::new(
            StoryRepository::new(Arc::new(story_db)),
            UserRepository::new(Arc::new(user_db)),
            MediaStore::new(Arc::new(LocalStorage::new(
                std::env::temp_dir(),
                "/media".to_string(),
            ))),
        )
    }

    fn view(id: i64, story_id: i64, user_id: i64) -> story_view::Model {
        story_view::Model {
            id,
            story_id,
            user_id,
            viewed_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_create_story() {
        let story_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_utils::story(1, 4)]])
            .into_connection();
        let user_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let story = service(story_db, user_db)
            .create(4, ImageSource::Path("stories/1.jpg".to_string()))
            .await
            .unwrap();

        assert_eq!(story.created_by, 4);
    }

    #[tokio::test]
    async fn test_view_missing_story() {
        let story_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<story::Model>::new()])
            .into_connection();
        let user_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        assert!(matches!(
            service(story_db, user_db).view(2, 99).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_viewers_keep_viewing_order() {
        let story_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[view(1, 1, 3), view(2, 1, 2)]])
            .into_connection();
        let user_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_utils::user(2, "bob"), test_utils::user(3, "carol")]])
            .into_connection();

        let viewers = service(story_db, user_db).viewers(1).await.unwrap();
        let names: Vec<_> = viewers.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, ["carol", "bob"]);
    }

    #[tokio::test]
    async fn test_delete_by_other_user_forbidden() {
        let story_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_utils::story(1, 4)]])
            .into_connection();
        let user_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        assert!(matches!(
            service(story_db, user_db).delete(5, 1).await,
            Err(AppError::Forbidden(_))
        ));
    }
}
