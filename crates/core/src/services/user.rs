//! User service.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use snapfeed_common::{AppError, AppResult};
use snapfeed_db::{
    entities::{Audited, profile, user},
    repositories::UserRepository,
};
use validator::Validate;

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

/// Input for registering a new user.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 1, max = 150))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    /// Register a new user along with an empty profile.
    pub async fn register(&self, input: RegisterInput) -> AppResult<user::Model> {
        input.validate()?;

        if self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }

        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = hash_password(&input.password)?;
        let now = Utc::now();

        let model = user::ActiveModel {
            username: Set(input.username),
            email: Set(input.email.to_lowercase()),
            password_hash: Set(password_hash),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        // The profile is owned and stamped by the user it describes.
        let (user, _) = self
            .user_repo
            .create_with_profile(model, |user| {
                profile::ActiveModel {
                    user_id: Set(user.id),
                    bio: Set(String::new()),
                    profile_pic: Set(String::new()),
                    ..Default::default()
                }
                .stamp_created(user.id)
            })
            .await?;

        tracing::info!(user_id = user.id, username = %user.username, "Registered user");

        Ok(user)
    }

    /// Check a username/password pair.
    ///
    /// Unknown users and wrong passwords fail the same way.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<user::Model> {
        let Some(user) = self.user_repo.find_by_username(username).await? else {
            return Err(AppError::AuthenticationRequired);
        };

        if !verify_password(password, &user.password_hash)? {
            tracing::debug!(username = %username, "Password mismatch");
            return Err(AppError::AuthenticationRequired);
        }

        Ok(user)
    }

    /// Get a user by ID.
    pub async fn get(&self, id: i64) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// Find a user by ID.
    pub async fn find(&self, id: i64) -> AppResult<Option<user::Model>> {
        self.user_repo.find_by_id(id).await
    }

    /// Load several users at once. Unknown IDs are skipped.
    pub async fn get_many(&self, ids: &[i64]) -> AppResult<Vec<user::Model>> {
        self.user_repo.find_by_ids(ids).await
    }

    /// List users, newest first.
    pub async fn list(&self, limit: u64, until_id: Option<i64>) -> AppResult<Vec<user::Model>> {
        self.user_repo.find_all(limit, until_id).await
    }

    /// Delete the actor's own account. Everything they created goes with it.
    pub async fn delete(&self, actor_id: i64) -> AppResult<()> {
        self.user_repo.delete(actor_id).await?;
        tracing::info!(user_id = actor_id, "Deleted account");
        Ok(())
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};
    use snapfeed_db::test_utils;
    use std::sync::Arc;

    fn register_input(username: &str, password: &str) -> RegisterInput {
        RegisterInput {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_hash_password() {
        let hash = hash_password("correct horse").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("battery staple", &hash).unwrap());
    }

    #[test]
    fn test_register_input_validation() {
        assert!(register_input("alice", "short").validate().is_err());
        assert!(register_input("", "long enough").validate().is_err());
        assert!(register_input("alice", "long enough").validate().is_ok());

        let mut input = register_input("alice", "long enough");
        input.email = "not-an-email".to_string();
        assert!(input.validate().is_err());
    }

    #[tokio::test]
    async fn test_register_creates_user_and_profile() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .append_query_results([Vec::<user::Model>::new()])
                .append_query_results([[test_utils::user(1, "alice")]])
                .append_query_results([[test_utils::profile(1, 1)]])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(user_db));

        let user = service
            .register(register_input("alice", "password123"))
            .await
            .unwrap();
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn test_register_fails_when_profile_insert_fails() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .append_query_results([Vec::<user::Model>::new()])
                .append_query_results([[test_utils::user(1, "alice")]])
                .append_query_errors([DbErr::Custom("connection reset".to_string())])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(Arc::clone(&user_db)));
        let result = service.register(register_input("alice", "password123")).await;
        drop(service);

        assert!(matches!(result, Err(AppError::Database(_))));
        let log = Arc::try_unwrap(user_db).unwrap().into_transaction_log();
        let last = log
            .last()
            .and_then(|txn| txn.statements().last())
            .map(|stmt| stmt.sql.clone());
        assert_eq!(last.as_deref(), Some("ROLLBACK"));
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_utils::user(1, "alice")]])
                .into_connection(),
        );
        let service = UserService::new(UserRepository::new(user_db));

        assert!(matches!(
            service.register(register_input("alice", "password123")).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_authenticate() {
        let mut stored = test_utils::user(1, "alice");
        stored.password_hash = hash_password("password123").unwrap();

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored.clone()], [stored]])
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );
        let service = UserService::new(UserRepository::new(user_db));

        assert_eq!(
            service.authenticate("alice", "password123").await.unwrap().id,
            1
        );
        assert!(matches!(
            service.authenticate("alice", "wrong-password").await,
            Err(AppError::AuthenticationRequired)
        ));
        assert!(matches!(
            service.authenticate("nobody", "password123").await,
            Err(AppError::AuthenticationRequired)
        ));
    }
}
