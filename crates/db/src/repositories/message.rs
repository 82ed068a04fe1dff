//! Direct message repository.

use std::sync::Arc;

use crate::entities::{Message, message};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use snapfeed_common::{AppError, AppResult};

/// Message repository for database operations.
#[derive(Clone)]
pub struct MessageRepository {
    db: Arc<DatabaseConnection>,
}

impl MessageRepository {
    /// Create a new message repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a message by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<message::Model>> {
        Message::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a message by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i64) -> AppResult<message::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Message {id}")))
    }

    /// Messages received by a user, newest first.
    pub async fn find_inbox(
        &self,
        user_id: i64,
        limit: u64,
        until_id: Option<i64>,
    ) -> AppResult<Vec<message::Model>> {
        let mut query = Message::find()
            .filter(message::Column::ReceiverId.eq(user_id))
            .order_by_desc(message::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(message::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Messages exchanged between two users in either direction, newest first.
    pub async fn find_conversation(
        &self,
        user_id: i64,
        partner_id: i64,
        limit: u64,
        until_id: Option<i64>,
    ) -> AppResult<Vec<message::Model>> {
        let mut query = Message::find()
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(message::Column::SenderId.eq(user_id))
                            .add(message::Column::ReceiverId.eq(partner_id)),
                    )
                    .add(
                        Condition::all()
                            .add(message::Column::SenderId.eq(partner_id))
                            .add(message::Column::ReceiverId.eq(user_id)),
                    ),
            )
            .order_by_desc(message::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(message::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count unseen messages addressed to a user.
    pub async fn count_unseen(&self, user_id: i64) -> AppResult<u64> {
        Message::find()
            .filter(message::Column::ReceiverId.eq(user_id))
            .filter(message::Column::Seen.eq(false))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new message.
    pub async fn create(&self, model: message::ActiveModel) -> AppResult<message::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a message.
    pub async fn update(&self, model: message::ActiveModel) -> AppResult<message::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_message(id: i64, sender_id: i64, receiver_id: i64) -> message::Model {
        message::Model {
            id,
            sender_id,
            receiver_id,
            text: "hi".to_string(),
            seen: false,
            created_by: sender_id,
            updated_by: sender_id,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_conversation() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_message(2, 2, 1), create_test_message(1, 1, 2)]])
                .into_connection(),
        );

        let repo = MessageRepository::new(db);
        let messages = repo.find_conversation(1, 2, 20, None).await.unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender_id, 2);
    }

    #[tokio::test]
    async fn test_find_inbox() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_message(5, 3, 1)]])
                .into_connection(),
        );

        let repo = MessageRepository::new(db);
        let inbox = repo.find_inbox(1, 20, None).await.unwrap();

        assert!(inbox.iter().all(|m| m.receiver_id == 1));
    }
}
