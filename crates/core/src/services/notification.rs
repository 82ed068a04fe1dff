//! Notification service.

use sea_orm::Set;
use snapfeed_common::{AppError, AppResult};
use snapfeed_db::{
    entities::{Audited, notification},
    repositories::{NotificationRepository, UserRepository},
};

/// Notification service for business logic.
#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
    user_repo: UserRepository,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub const fn new(notification_repo: NotificationRepository, user_repo: UserRepository) -> Self {
        Self {
            notification_repo,
            user_repo,
        }
    }

    /// Create a notification for `user_id`, stamped by the actor.
    pub async fn create(
        &self,
        actor_id: i64,
        user_id: i64,
        text: &str,
    ) -> AppResult<notification::Model> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Validation(
                "text: must not be empty".to_string(),
            ));
        }

        let user = self.user_repo.get_by_id(user_id).await?;

        let model = notification::ActiveModel {
            user_id: Set(user.id),
            text: Set(text.to_string()),
            is_read: Set(false),
            ..Default::default()
        }
        .stamp_created(actor_id);

        let created = self.notification_repo.create(model).await?;
        tracing::debug!(notification_id = created.id, user_id = user.id, "Created notification");

        Ok(created)
    }

    /// The actor's notifications, newest first.
    pub async fn list(
        &self,
        actor_id: i64,
        limit: u64,
        until_id: Option<i64>,
        unread_only: bool,
    ) -> AppResult<Vec<notification::Model>> {
        self.notification_repo
            .find_by_user(actor_id, limit, until_id, unread_only)
            .await
    }

    /// Mark one of the actor's notifications as read.
    pub async fn mark_read(&self, actor_id: i64, id: i64) -> AppResult<notification::Model> {
        let notification = self.notification_repo.get_by_id(id).await?;
        if notification.user_id != actor_id {
            return Err(AppError::Forbidden(
                "Not your notification".to_string(),
            ));
        }

        if notification.is_read {
            return Ok(notification);
        }

        let mut active: notification::ActiveModel = notification.into();
        active.is_read = Set(true);
        self.notification_repo
            .update(active.stamp_updated(actor_id))
            .await
    }

    /// Mark all of the actor's notifications as read.
    pub async fn mark_all_read(&self, actor_id: i64) -> AppResult<u64> {
        self.notification_repo.mark_all_as_read(actor_id).await
    }

    pub async fn unread_count(&self, actor_id: i64) -> AppResult<u64> {
        self.notification_repo.count_unread(actor_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use snapfeed_db::{entities::user, test_utils};
    use std::sync::Arc;

    fn notification(id: i64, user_id: i64, is_read: bool) -> notification::Model {
        notification::Model {
            id,
            user_id,
            text: "Someone liked your post".to_string(),
            is_read,
            created_by: 1,
            updated_by: 1,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn service(
        notification_db: DatabaseConnection,
        user_db: DatabaseConnection,
    ) -> NotificationService {
        NotificationService::new(
            NotificationRepository::new(Arc::new(notification_db)),
            UserRepository::new(Arc::new(user_db)),
        )
    }

    #[tokio::test]
    async fn test_create_for_missing_user() {
        let notification_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let user_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        assert!(matches!(
            service(notification_db, user_db).create(1, 9, "hello").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_create() {
        let notification_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[notification(1, 2, false)]])
            .into_connection();
        let user_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_utils::user(2, "bob")]])
            .into_connection();

        let created = service(notification_db, user_db)
            .create(1, 2, "Someone liked your post")
            .await
            .unwrap();
        assert_eq!(created.user_id, 2);
    }

    #[tokio::test]
    async fn test_mark_read_other_users_notification() {
        let notification_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[notification(1, 2, false)]])
            .into_connection();
        let user_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        assert!(matches!(
            service(notification_db, user_db).mark_read(3, 1).await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_mark_read_already_read_is_noop() {
        let notification_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[notification(1, 2, true)]])
            .into_connection();
        let user_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let read = service(notification_db, user_db).mark_read(2, 1).await.unwrap();
        assert!(read.is_read);
    }
}
