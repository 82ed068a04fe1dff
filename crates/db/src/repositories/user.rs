//! User repository.

use std::sync::Arc;

use super::map_write_err;
use crate::entities::{User, profile, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};
use snapfeed_common::{AppError, AppResult};

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i64) -> AppResult<user::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {id}")))
    }

    /// Find users by IDs.
    pub async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<user::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        User::find()
            .filter(user::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by username.
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by email address (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Email.eq(email.to_lowercase()))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List users, newest first.
    pub async fn find_all(&self, limit: u64, until_id: Option<i64>) -> AppResult<Vec<user::Model>> {
        let mut query = User::find().order_by_desc(user::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(user::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new user.
    pub async fn create(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| map_write_err(e, "User"))
    }

    /// Create a user and its profile in one transaction.
    ///
    /// `profile` builds the profile row from the inserted user. Nothing is
    /// kept when either insert fails.
    pub async fn create_with_profile<F>(
        &self,
        model: user::ActiveModel,
        profile: F,
    ) -> AppResult<(user::Model, profile::Model)>
    where
        F: FnOnce(&user::Model) -> profile::ActiveModel + Send,
    {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let user = model
            .insert(&txn)
            .await
            .map_err(|e| map_write_err(e, "User"))?;
        let profile = profile(&user)
            .insert(&txn)
            .await
            .map_err(|e| map_write_err(e, "Profile"))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((user, profile))
    }

    /// Delete a user; owned rows go with it through cascading foreign keys.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let user = self.get_by_id(id).await?;
        user.delete(self.db.as_ref())
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
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, Set};

    fn create_test_user(id: i64, username: &str) -> user::Model {
        user::Model {
            id,
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "$argon2id$test".to_string(),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let user = create_test_user(1, "alice");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user.clone()]])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.find_by_id(1).await.unwrap();

        assert_eq!(result.unwrap().username, "alice");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.get_by_id(99).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_by_ids_empty_skips_query() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = UserRepository::new(db);
        let result = repo.find_by_ids(&[]).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_create_user() {
        let user = create_test_user(1, "newuser");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user.clone()]])
                .into_connection(),
        );

        let repo = UserRepository::new(db);

        let active = user::ActiveModel {
            username: Set("newuser".to_string()),
            email: Set("newuser@example.com".to_string()),
            password_hash: Set("$argon2id$test".to_string()),
            ..Default::default()
        };

        let result = repo.create(active).await.unwrap();
        assert_eq!(result.username, "newuser");
    }

    #[tokio::test]
    async fn test_delete_user() {
        let user = create_test_user(1, "alice");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        assert!(repo.delete(1).await.is_ok());
    }

    fn new_user(username: &str) -> user::ActiveModel {
        user::ActiveModel {
            username: Set(username.to_string()),
            email: Set(format!("{username}@example.com")),
            password_hash: Set("$argon2id$test".to_string()),
            ..Default::default()
        }
    }

    fn empty_profile(user: &user::Model) -> profile::ActiveModel {
        profile::ActiveModel {
            user_id: Set(user.id),
            bio: Set(String::new()),
            profile_pic: Set(String::new()),
            created_by: Set(user.id),
            updated_by: Set(user.id),
            ..Default::default()
        }
    }

    fn transaction_sql(db: Arc<DatabaseConnection>) -> Vec<String> {
        Arc::try_unwrap(db)
            .unwrap()
            .into_transaction_log()
            .iter()
            .flat_map(|txn| txn.statements().iter().map(|stmt| stmt.sql.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_create_with_profile_commits() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user(1, "alice")]])
                .append_query_results([[crate::test_utils::profile(5, 1)]])
                .into_connection(),
        );

        let repo = UserRepository::new(Arc::clone(&db));
        let (user, profile) = repo
            .create_with_profile(new_user("alice"), empty_profile)
            .await
            .unwrap();
        drop(repo);

        assert_eq!(profile.user_id, user.id);
        let sql = transaction_sql(db);
        assert_eq!(sql.first().map(String::as_str), Some("BEGIN"));
        assert_eq!(sql.last().map(String::as_str), Some("COMMIT"));
    }

    #[tokio::test]
    async fn test_create_with_profile_rolls_back_user() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user(1, "alice")]])
                .append_query_errors([DbErr::Custom("connection reset".to_string())])
                .into_connection(),
        );

        let repo = UserRepository::new(Arc::clone(&db));
        let result = repo
            .create_with_profile(new_user("alice"), empty_profile)
            .await;
        drop(repo);

        assert!(matches!(result, Err(AppError::Database(_))));
        let sql = transaction_sql(db);
        assert!(sql.iter().any(|stmt| stmt.starts_with("INSERT INTO \"user\"")));
        assert_eq!(sql.last().map(String::as_str), Some("ROLLBACK"));
        assert!(!sql.iter().any(|stmt| stmt == "COMMIT"));
    }
}
