//! Direct message service.

use sea_orm::Set;
use serde::Deserialize;
use snapfeed_common::{AppError, AppResult};
use snapfeed_db::{
    entities::{Audited, message},
    repositories::{MessageRepository, UserRepository},
};
use validator::Validate;

/// Message service for business logic.
#[derive(Clone)]
pub struct MessageService {
    message_repo: MessageRepository,
    user_repo: UserRepository,
}

/// Input for sending a message.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageInput {
    pub receiver_id: i64,

    #[validate(length(min = 1, max = 5000))]
    pub text: String,
}

impl MessageService {
    /// Create a new message service.
    #[must_use]
    pub const fn new(message_repo: MessageRepository, user_repo: UserRepository) -> Self {
        Self {
            message_repo,
            user_repo,
        }
    }

    /// Send a message from the actor.
    pub async fn send(&self, actor_id: i64, input: SendMessageInput) -> AppResult<message::Model> {
        input.validate()?;

        let receiver = self.user_repo.get_by_id(input.receiver_id).await?;

        let model = message::ActiveModel {
            sender_id: Set(actor_id),
            receiver_id: Set(receiver.id),
            text: Set(input.text),
            seen: Set(false),
            ..Default::default()
        }
        .stamp_created(actor_id);

        let message = self.message_repo.create(model).await?;
        tracing::debug!(message_id = message.id, sender = actor_id, receiver = receiver.id, "Sent message");

        Ok(message)
    }

    /// Get a message the actor sent or received.
    pub async fn get(&self, actor_id: i64, id: i64) -> AppResult<message::Model> {
        let message = self.message_repo.get_by_id(id).await?;
        if message.sender_id != actor_id && message.receiver_id != actor_id {
            return Err(AppError::NotFound(format!("Message {id}")));
        }
        Ok(message)
    }

    /// Messages received by the actor, newest first.
    pub async fn inbox(
        &self,
        actor_id: i64,
        limit: u64,
        until_id: Option<i64>,
    ) -> AppResult<Vec<message::Model>> {
        self.message_repo.find_inbox(actor_id, limit, until_id).await
    }

    /// Messages between the actor and another user, newest first.
    pub async fn conversation(
        &self,
        actor_id: i64,
        partner_id: i64,
        limit: u64,
        until_id: Option<i64>,
    ) -> AppResult<Vec<message::Model>> {
        self.message_repo
            .find_conversation(actor_id, partner_id, limit, until_id)
            .await
    }

    /// Mark a message as seen. Only its receiver may do so.
    pub async fn mark_seen(&self, actor_id: i64, id: i64) -> AppResult<message::Model> {
        let message = self.message_repo.get_by_id(id).await?;
        if message.receiver_id != actor_id {
            return Err(AppError::Forbidden(
                "Only the receiver can mark a message as seen".to_string(),
            ));
        }

        if message.seen {
            return Ok(message);
        }

        let mut active: message::ActiveModel = message.into();
        active.seen = Set(true);
        self.message_repo.update(active.stamp_updated(actor_id)).await
    }

    pub async fn unseen_count(&self, actor_id: i64) -> AppResult<u64> {
        self.message_repo.count_unseen(actor_id).await
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

    fn message(id: i64, sender_id: i64, receiver_id: i64, seen: bool) -> message::Model {
        message::Model {
            id,
            sender_id,
            receiver_id,
            text: "hi".to_string(),
            seen,
            created_by: sender_id,
            updated_by: sender_id,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn service(message_db: DatabaseConnection, user_db: DatabaseConnection) -> MessageService {
        MessageService::new(
            MessageRepository::new(Arc::new(message_db)),
            UserRepository::new(Arc::new(user_db)),
        )
    }

    #[tokio::test]
    async fn test_send_to_missing_user() {
        let message_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let user_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let result = service(message_db, user_db)
            .send(
                1,
                SendMessageInput {
                    receiver_id: 2,
                    text: "hello".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_send_sets_sender_from_actor() {
        let message_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[message(1, 1, 2, false)]])
            .into_connection();
        let user_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_utils::user(2, "bob")]])
            .into_connection();

        let sent = service(message_db, user_db)
            .send(
                1,
                SendMessageInput {
                    receiver_id: 2,
                    text: "hi".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(sent.sender_id, 1);
        assert!(!sent.seen);
    }

    #[tokio::test]
    async fn test_mark_seen_by_sender_forbidden() {
        let message_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[message(1, 1, 2, false)]])
            .into_connection();
        let user_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        assert!(matches!(
            service(message_db, user_db).mark_seen(1, 1).await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_mark_seen_by_receiver() {
        let message_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[message(1, 1, 2, false)], [message(1, 1, 2, true)]])
            .into_connection();
        let user_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let seen = service(message_db, user_db).mark_seen(2, 1).await.unwrap();
        assert!(seen.seen);
    }
}
