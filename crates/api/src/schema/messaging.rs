//! Direct messages and notifications.

use async_graphql::{Context, Object, Result, ResultExt, ID};
use snapfeed_core::SendMessageInput;

use super::guard::AuthGuard;
use super::types::{MessageType, NotificationType};
use super::{page_limit, parse_id, parse_opt_id, services, viewer_id};

#[derive(Default)]
pub struct MessagingQuery;

#[Object]
impl MessagingQuery {
    /// Messages received by the viewer.
    #[graphql(guard = "AuthGuard")]
    async fn messages(
        &self,
        ctx: &Context<'_>,
        limit: Option<i32>,
        until_id: Option<ID>,
    ) -> Result<Vec<MessageType>> {
        let messages = services(ctx)?
            .message_service
            .inbox(
                viewer_id(ctx)?,
                page_limit(limit),
                parse_opt_id(until_id.as_ref())?,
            )
            .await
            .extend()?;
        Ok(messages.into_iter().map(MessageType).collect())
    }

    /// Messages between the viewer and another user.
    #[graphql(guard = "AuthGuard")]
    async fn conversation(
        &self,
        ctx: &Context<'_>,
        user_id: ID,
        limit: Option<i32>,
        until_id: Option<ID>,
    ) -> Result<Vec<MessageType>> {
        let messages = services(ctx)?
            .message_service
            .conversation(
                viewer_id(ctx)?,
                parse_id(&user_id)?,
                page_limit(limit),
                parse_opt_id(until_id.as_ref())?,
            )
            .await
            .extend()?;
        Ok(messages.into_iter().map(MessageType).collect())
    }

    /// The viewer's notifications.
    #[graphql(guard = "AuthGuard")]
    async fn notifications(
        &self,
        ctx: &Context<'_>,
        limit: Option<i32>,
        until_id: Option<ID>,
        #[graphql(default)] unread_only: bool,
    ) -> Result<Vec<NotificationType>> {
        let notifications = services(ctx)?
            .notification_service
            .list(
                viewer_id(ctx)?,
                page_limit(limit),
                parse_opt_id(until_id.as_ref())?,
                unread_only,
            )
            .await
            .extend()?;
        Ok(notifications.into_iter().map(NotificationType).collect())
    }

    #[graphql(guard = "AuthGuard")]
    async fn unread_notification_count(&self, ctx: &Context<'_>) -> Result<u64> {
        services(ctx)?
            .notification_service
            .unread_count(viewer_id(ctx)?)
            .await
            .extend()
    }

    /// Messages sent to the viewer that they have not seen yet.
    #[graphql(guard = "AuthGuard")]
    async fn unseen_message_count(&self, ctx: &Context<'_>) -> Result<u64> {
        services(ctx)?
            .message_service
            .unseen_count(viewer_id(ctx)?)
            .await
            .extend()
    }
}

#[derive(Default)]
pub struct MessagingMutation;

#[Object]
impl MessagingMutation {
    #[graphql(guard = "AuthGuard")]
    async fn send_message(
        &self,
        ctx: &Context<'_>,
        receiver_id: ID,
        text: String,
    ) -> Result<MessageType> {
        let input = SendMessageInput {
            receiver_id: parse_id(&receiver_id)?,
            text,
        };

        let message = services(ctx)?
            .message_service
            .send(viewer_id(ctx)?, input)
            .await
            .extend()?;
        Ok(MessageType(message))
    }

    #[graphql(guard = "AuthGuard")]
    async fn mark_message_seen(&self, ctx: &Context<'_>, id: ID) -> Result<MessageType> {
        let message = services(ctx)?
            .message_service
            .mark_seen(viewer_id(ctx)?, parse_id(&id)?)
            .await
            .extend()?;
        Ok(MessageType(message))
    }

    #[graphql(guard = "AuthGuard")]
    async fn create_notification(
        &self,
        ctx: &Context<'_>,
        user_id: ID,
        text: String,
    ) -> Result<NotificationType> {
        let notification = services(ctx)?
            .notification_service
            .create(viewer_id(ctx)?, parse_id(&user_id)?, &text)
            .await
            .extend()?;
        Ok(NotificationType(notification))
    }

    #[graphql(guard = "AuthGuard")]
    async fn mark_notification_read(&self, ctx: &Context<'_>, id: ID) -> Result<NotificationType> {
        let notification = services(ctx)?
            .notification_service
            .mark_read(viewer_id(ctx)?, parse_id(&id)?)
            .await
            .extend()?;
        Ok(NotificationType(notification))
    }

    /// Returns how many notifications changed.
    #[graphql(guard = "AuthGuard")]
    async fn mark_all_notifications_read(&self, ctx: &Context<'_>) -> Result<u64> {
        services(ctx)?
            .notification_service
            .mark_all_read(viewer_id(ctx)?)
            .await
            .extend()
    }
}
