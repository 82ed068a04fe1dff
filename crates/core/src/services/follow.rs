//! Follow service.

use snapfeed_common::{AppError, AppResult};
use snapfeed_db::{
    entities::{Audited, follow, user},
    repositories::{FollowRepository, UserRepository},
};
use sea_orm::Set;

use super::toggle::ToggleResult;

/// Follow service for business logic.
#[derive(Clone)]
pub struct FollowService {
    follow_repo: FollowRepository,
    user_repo: UserRepository,
}

impl FollowService {
    /// Create a new follow service.
    #[must_use]
    pub const fn new(follow_repo: FollowRepository, user_repo: UserRepository) -> Self {
        Self {
            follow_repo,
            user_repo,
        }
    }

    /// Follow a user, or unfollow if already following.
    pub async fn toggle(&self, actor_id: i64, user_id: i64) -> AppResult<ToggleResult> {
        if actor_id == user_id {
            return Err(AppError::InvalidActor("Cannot follow yourself".to_string()));
        }

        self.user_repo.get_by_id(user_id).await?;

        if self.follow_repo.delete_by_pair(actor_id, user_id).await? {
            tracing::debug!(follower = actor_id, following = user_id, "Unfollowed");
            return Ok(ToggleResult::removed());
        }

        let model = follow::ActiveModel {
            follower_id: Set(actor_id),
            following_id: Set(user_id),
            ..Default::default()
        }
        .stamp_created(actor_id);

        let result = ToggleResult::from_insert(self.follow_repo.create(model).await)?;
        tracing::debug!(follower = actor_id, following = user_id, "Followed");
        Ok(result)
    }

    /// Whether `follower_id` follows `user_id`.
    pub async fn is_following(&self, follower_id: i64, user_id: i64) -> AppResult<bool> {
        self.follow_repo.is_following(follower_id, user_id).await
    }

    /// Users following `user_id`.
    pub async fn followers(
        &self,
        user_id: i64,
        limit: u64,
        until_id: Option<i64>,
    ) -> AppResult<Vec<user::Model>> {
        let ids: Vec<i64> = self
            .follow_repo
            .find_followers(user_id, limit, until_id)
            .await?
            .into_iter()
            .map(|f| f.follower_id)
            .collect();

        self.user_repo.find_by_ids(&ids).await
    }

    /// Users that `user_id` follows.
    pub async fn following(
        &self,
        user_id: i64,
        limit: u64,
        until_id: Option<i64>,
    ) -> AppResult<Vec<user::Model>> {
        let ids: Vec<i64> = self
            .follow_repo
            .find_following(user_id, limit, until_id)
            .await?
            .into_iter()
            .map(|f| f.following_id)
            .collect();

        self.user_repo.find_by_ids(&ids).await
    }

    pub async fn followers_count(&self, user_id: i64) -> AppResult<u64> {
        self.follow_repo.count_followers(user_id).await
    }

    pub async fn following_count(&self, user_id: i64) -> AppResult<u64> {
        self.follow_repo.count_following(user_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use snapfeed_db::test_utils;
    use std::sync::Arc;

    fn follow(id: i64, follower_id: i64, following_id: i64) -> follow::Model {
        follow::Model {
            id,
            follower_id,
            following_id,
            created_by: follower_id,
            updated_by: follower_id,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_follow_yourself_is_invalid_actor() {
        let follow_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let user_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = FollowService::new(
            FollowRepository::new(follow_db),
            UserRepository::new(user_db),
        );

        assert!(matches!(
            service.toggle(1, 1).await,
            Err(AppError::InvalidActor(_))
        ));
    }

    #[tokio::test]
    async fn test_toggle_follow_then_unfollow() {
        let target = test_utils::user(2, "bob");

        let follow_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([test_utils::exec(0)])
                .append_query_results([[follow(1, 1, 2)]])
                .append_exec_results([test_utils::exec(1)])
                .into_connection(),
        );
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[target.clone()], [target]])
                .into_connection(),
        );

        let service = FollowService::new(
            FollowRepository::new(follow_db),
            UserRepository::new(user_db),
        );

        assert_eq!(service.toggle(1, 2).await.unwrap(), ToggleResult::applied());
        assert_eq!(service.toggle(1, 2).await.unwrap(), ToggleResult::removed());
    }

    #[tokio::test]
    async fn test_follow_missing_user() {
        let follow_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = FollowService::new(
            FollowRepository::new(follow_db),
            UserRepository::new(user_db),
        );

        assert!(matches!(
            service.toggle(1, 9).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_followers_loads_users() {
        let follow_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[follow(1, 3, 2)]])
                .into_connection(),
        );
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_utils::user(3, "carol")]])
                .into_connection(),
        );

        let service = FollowService::new(
            FollowRepository::new(follow_db),
            UserRepository::new(user_db),
        );

        let followers = service.followers(2, 20, None).await.unwrap();
        assert_eq!(followers[0].username, "carol");
    }
}
