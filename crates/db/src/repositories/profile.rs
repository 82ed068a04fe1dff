//! Profile repository.

use std::sync::Arc;

use super::map_write_err;
use crate::entities::{Profile, profile};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use snapfeed_common::{AppError, AppResult};

/// Profile repository for database operations.
#[derive(Clone)]
pub struct ProfileRepository {
    db: Arc<DatabaseConnection>,
}

impl ProfileRepository {
    /// Create a new profile repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the profile belonging to a user.
    pub async fn find_by_user_id(&self, user_id: i64) -> AppResult<Option<profile::Model>> {
        Profile::find()
            .filter(profile::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the profile belonging to a user, returning an error if not found.
    pub async fn get_by_user_id(&self, user_id: i64) -> AppResult<profile::Model> {
        self.find_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Profile for user {user_id}")))
    }

    /// Find profiles for a batch of users.
    pub async fn find_by_user_ids(&self, user_ids: &[i64]) -> AppResult<Vec<profile::Model>> {
        if user_ids.is_empty() {
            return Ok(vec![]);
        }

        Profile::find()
            .filter(profile::Column::UserId.is_in(user_ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a profile.
    pub async fn create(&self, model: profile::ActiveModel) -> AppResult<profile::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| map_write_err(e, "Profile"))
    }

    /// Update a profile.
    pub async fn update(&self, model: profile::ActiveModel) -> AppResult<profile::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
