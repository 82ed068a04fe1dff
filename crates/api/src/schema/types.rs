//! GraphQL object types.

#![allow(missing_docs)]

use async_graphql::{Context, Enum, Interface, Json, Object, Result, ResultExt, SimpleObject, ID};
use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use snapfeed_common::Claims;
use snapfeed_core::{Target, TargetKind, ToggleResult};
use snapfeed_db::entities::{
    comment, hashtag, message, notification, post, post_save, profile, report, story, user,
};

use super::{maybe_viewer_id, page_limit, parse_opt_id, services, to_id};

fn utc(ts: &DateTimeWithTimeZone) -> DateTime<Utc> {
    ts.with_timezone(&Utc)
}

async fn load_user(ctx: &Context<'_>, id: i64) -> Result<Option<UserType>> {
    let user = services(ctx)?.user_service.find(id).await.extend()?;
    Ok(user.map(UserType))
}

// ==================== Enums ====================

/// Kinds of record a comment or report may point at.
#[derive(Enum, Copy, Clone, Debug, Default, Eq, PartialEq)]
#[graphql(name = "TargetKind")]
pub enum TargetKindEnum {
    #[default]
    Post,
    Story,
}

impl From<TargetKindEnum> for TargetKind {
    fn from(kind: TargetKindEnum) -> Self {
        match kind {
            TargetKindEnum::Post => Self::Post,
            TargetKindEnum::Story => Self::Story,
        }
    }
}

impl From<TargetKind> for TargetKindEnum {
    fn from(kind: TargetKind) -> Self {
        match kind {
            TargetKind::Post => Self::Post,
            TargetKind::Story => Self::Story,
        }
    }
}

/// Records that point at a post or story.
#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum AnnotationKind {
    Comment,
    Report,
}

// ==================== Interfaces ====================

/// Anything a comment or report can be attached to.
#[derive(Interface)]
#[graphql(field(name = "id", ty = "ID"))]
pub enum Commentable {
    Post(PostType),
    Story(StoryType),
}

impl From<Target> for Commentable {
    fn from(target: Target) -> Self {
        match target {
            Target::Post(post) => Self::Post(PostType(post)),
            Target::Story(story) => Self::Story(StoryType(story)),
        }
    }
}

// ==================== Users ====================

pub struct UserType(pub user::Model);

#[Object(name = "User")]
impl UserType {
    async fn id(&self) -> ID {
        to_id(self.0.id)
    }

    async fn username(&self) -> &str {
        &self.0.username
    }

    async fn email(&self) -> &str {
        &self.0.email
    }

    async fn date_joined(&self) -> DateTime<Utc> {
        utc(&self.0.created_at)
    }

    async fn profile(&self, ctx: &Context<'_>) -> Result<Option<ProfileType>> {
        let profiles = services(ctx)?
            .profile_service
            .find_for_users(&[self.0.id])
            .await
            .extend()?;
        Ok(profiles.into_iter().next().map(ProfileType))
    }

    async fn posts(
        &self,
        ctx: &Context<'_>,
        limit: Option<i32>,
        until_id: Option<ID>,
    ) -> Result<Vec<PostType>> {
        let posts = services(ctx)?
            .post_service
            .list_by_user(self.0.id, page_limit(limit), parse_opt_id(until_id.as_ref())?)
            .await
            .extend()?;
        Ok(posts.into_iter().map(PostType).collect())
    }

    async fn followers_count(&self, ctx: &Context<'_>) -> Result<u64> {
        services(ctx)?
            .follow_service
            .followers_count(self.0.id)
            .await
            .extend()
    }

    async fn following_count(&self, ctx: &Context<'_>) -> Result<u64> {
        services(ctx)?
            .follow_service
            .following_count(self.0.id)
            .await
            .extend()
    }

    async fn followers(&self, ctx: &Context<'_>, limit: Option<i32>) -> Result<Vec<Self>> {
        let users = services(ctx)?
            .follow_service
            .followers(self.0.id, page_limit(limit), None)
            .await
            .extend()?;
        Ok(users.into_iter().map(Self).collect())
    }

    async fn following(&self, ctx: &Context<'_>, limit: Option<i32>) -> Result<Vec<Self>> {
        let users = services(ctx)?
            .follow_service
            .following(self.0.id, page_limit(limit), None)
            .await
            .extend()?;
        Ok(users.into_iter().map(Self).collect())
    }

    /// Whether the viewer follows this user.
    async fn followed_by_me(&self, ctx: &Context<'_>) -> Result<bool> {
        let Some(viewer) = maybe_viewer_id(ctx) else {
            return Ok(false);
        };
        services(ctx)?
            .follow_service
            .is_following(viewer, self.0.id)
            .await
            .extend()
    }
}

pub struct ProfileType(pub profile::Model);

#[Object(name = "Profile")]
impl ProfileType {
    async fn id(&self) -> ID {
        to_id(self.0.id)
    }

    async fn user(&self, ctx: &Context<'_>) -> Result<Option<UserType>> {
        load_user(ctx, self.0.user_id).await
    }

    async fn bio(&self) -> &str {
        &self.0.bio
    }

    async fn profile_pic(&self) -> &str {
        &self.0.profile_pic
    }

    async fn created_at(&self) -> DateTime<Utc> {
        utc(&self.0.created_at)
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        utc(&self.0.updated_at)
    }
}

// ==================== Posts & stories ====================

pub struct PostType(pub post::Model);

#[Object(name = "Post")]
impl PostType {
    async fn id(&self) -> ID {
        to_id(self.0.id)
    }

    async fn caption(&self) -> &str {
        &self.0.caption
    }

    async fn image(&self) -> &str {
        &self.0.image
    }

    async fn created_by(&self, ctx: &Context<'_>) -> Result<Option<UserType>> {
        load_user(ctx, self.0.created_by).await
    }

    async fn updated_by(&self, ctx: &Context<'_>) -> Result<Option<UserType>> {
        load_user(ctx, self.0.updated_by).await
    }

    async fn created_at(&self) -> DateTime<Utc> {
        utc(&self.0.created_at)
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        utc(&self.0.updated_at)
    }

    async fn like_count(&self, ctx: &Context<'_>) -> Result<u64> {
        services(ctx)?
            .like_service
            .like_count(self.0.id)
            .await
            .extend()
    }

    async fn liked_by_me(&self, ctx: &Context<'_>) -> Result<bool> {
        let Some(viewer) = maybe_viewer_id(ctx) else {
            return Ok(false);
        };
        services(ctx)?
            .like_service
            .is_liked(viewer, self.0.id)
            .await
            .extend()
    }

    /// Users who liked the post, most recent like first.
    async fn liked_by(
        &self,
        ctx: &Context<'_>,
        limit: Option<i32>,
        until_id: Option<ID>,
    ) -> Result<Vec<UserType>> {
        let services = services(ctx)?;
        let likes = services
            .like_service
            .likes(self.0.id, page_limit(limit), parse_opt_id(until_id.as_ref())?)
            .await
            .extend()?;
        let ids: Vec<i64> = likes.iter().map(|like| like.user_id).collect();
        let mut users = services.user_service.get_many(&ids).await.extend()?;
        users.sort_by_key(|user| ids.iter().position(|id| *id == user.id));
        Ok(users.into_iter().map(UserType).collect())
    }

    async fn hashtags(&self, ctx: &Context<'_>) -> Result<Vec<HashtagType>> {
        let tags = services(ctx)?
            .post_service
            .hashtags(self.0.id)
            .await
            .extend()?;
        Ok(tags.into_iter().map(HashtagType).collect())
    }

    async fn comments(
        &self,
        ctx: &Context<'_>,
        limit: Option<i32>,
        since_id: Option<ID>,
    ) -> Result<Vec<CommentType>> {
        let comments = services(ctx)?
            .comment_service
            .list_for_target(
                TargetKind::Post.as_str(),
                self.0.id,
                page_limit(limit),
                parse_opt_id(since_id.as_ref())?,
            )
            .await
            .extend()?;
        Ok(comments.into_iter().map(CommentType).collect())
    }

    async fn comment_count(&self, ctx: &Context<'_>) -> Result<u64> {
        services(ctx)?
            .comment_service
            .count_for_target(TargetKind::Post, self.0.id)
            .await
            .extend()
    }
}

pub struct StoryType(pub story::Model);

#[Object(name = "Story")]
impl StoryType {
    async fn id(&self) -> ID {
        to_id(self.0.id)
    }

    async fn image(&self) -> &str {
        &self.0.image
    }

    async fn created_by(&self, ctx: &Context<'_>) -> Result<Option<UserType>> {
        load_user(ctx, self.0.created_by).await
    }

    async fn created_at(&self) -> DateTime<Utc> {
        utc(&self.0.created_at)
    }

    async fn viewers(&self, ctx: &Context<'_>) -> Result<Vec<UserType>> {
        let users = services(ctx)?
            .story_service
            .viewers(self.0.id)
            .await
            .extend()?;
        Ok(users.into_iter().map(UserType).collect())
    }

    async fn view_count(&self, ctx: &Context<'_>) -> Result<u64> {
        services(ctx)?
            .story_service
            .view_count(self.0.id)
            .await
            .extend()
    }

    async fn comments(
        &self,
        ctx: &Context<'_>,
        limit: Option<i32>,
        since_id: Option<ID>,
    ) -> Result<Vec<CommentType>> {
        let comments = services(ctx)?
            .comment_service
            .list_for_target(
                TargetKind::Story.as_str(),
                self.0.id,
                page_limit(limit),
                parse_opt_id(since_id.as_ref())?,
            )
            .await
            .extend()?;
        Ok(comments.into_iter().map(CommentType).collect())
    }
}

// ==================== Comments & reports ====================

pub struct CommentType(pub comment::Model);

#[Object(name = "Comment")]
impl CommentType {
    async fn id(&self) -> ID {
        to_id(self.0.id)
    }

    async fn text(&self) -> &str {
        &self.0.text
    }

    /// Stored tag of the target kind.
    async fn target_kind(&self) -> &str {
        &self.0.target_kind
    }

    async fn target_id(&self) -> ID {
        to_id(self.0.target_id)
    }

    /// The post or story commented on; null once it has been deleted.
    async fn content_object(&self, ctx: &Context<'_>) -> Result<Option<Commentable>> {
        let target = services(ctx)?
            .comment_service
            .target(&self.0)
            .await
            .extend()?;
        Ok(target.map(Commentable::from))
    }

    async fn parent(&self, ctx: &Context<'_>) -> Result<Option<Self>> {
        let parent = services(ctx)?
            .comment_service
            .parent(&self.0)
            .await
            .extend()?;
        Ok(parent.map(Self))
    }

    async fn replies(&self, ctx: &Context<'_>, limit: Option<i32>) -> Result<Vec<Self>> {
        let replies = services(ctx)?
            .comment_service
            .list_replies(self.0.id, page_limit(limit))
            .await
            .extend()?;
        Ok(replies.into_iter().map(Self).collect())
    }

    async fn created_by(&self, ctx: &Context<'_>) -> Result<Option<UserType>> {
        load_user(ctx, self.0.created_by).await
    }

    async fn created_at(&self) -> DateTime<Utc> {
        utc(&self.0.created_at)
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        utc(&self.0.updated_at)
    }
}

pub struct ReportType(pub report::Model);

#[Object(name = "Report")]
impl ReportType {
    async fn id(&self) -> ID {
        to_id(self.0.id)
    }

    async fn reason(&self) -> &str {
        &self.0.reason
    }

    async fn reported_by(&self, ctx: &Context<'_>) -> Result<Option<UserType>> {
        load_user(ctx, self.0.reported_by).await
    }

    async fn target_kind(&self) -> &str {
        &self.0.target_kind
    }

    async fn target_id(&self) -> ID {
        to_id(self.0.target_id)
    }

    async fn content_object(&self, ctx: &Context<'_>) -> Result<Option<Commentable>> {
        let target = services(ctx)?
            .report_service
            .target(&self.0)
            .await
            .extend()?;
        Ok(target.map(Commentable::from))
    }

    async fn created_at(&self) -> DateTime<Utc> {
        utc(&self.0.created_at)
    }
}

// ==================== Messaging ====================

pub struct MessageType(pub message::Model);

#[Object(name = "Message")]
impl MessageType {
    async fn id(&self) -> ID {
        to_id(self.0.id)
    }

    async fn sender(&self, ctx: &Context<'_>) -> Result<Option<UserType>> {
        load_user(ctx, self.0.sender_id).await
    }

    async fn receiver(&self, ctx: &Context<'_>) -> Result<Option<UserType>> {
        load_user(ctx, self.0.receiver_id).await
    }

    async fn text(&self) -> &str {
        &self.0.text
    }

    async fn seen(&self) -> bool {
        self.0.seen
    }

    async fn created_at(&self) -> DateTime<Utc> {
        utc(&self.0.created_at)
    }
}

pub struct NotificationType(pub notification::Model);

#[Object(name = "Notification")]
impl NotificationType {
    async fn id(&self) -> ID {
        to_id(self.0.id)
    }

    async fn user(&self, ctx: &Context<'_>) -> Result<Option<UserType>> {
        load_user(ctx, self.0.user_id).await
    }

    async fn text(&self) -> &str {
        &self.0.text
    }

    async fn is_read(&self) -> bool {
        self.0.is_read
    }

    async fn created_at(&self) -> DateTime<Utc> {
        utc(&self.0.created_at)
    }
}

// ==================== Hashtags & saves ====================

pub struct HashtagType(pub hashtag::Model);

#[Object(name = "Hashtag")]
impl HashtagType {
    async fn id(&self) -> ID {
        to_id(self.0.id)
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn posts(
        &self,
        ctx: &Context<'_>,
        limit: Option<i32>,
        until_id: Option<ID>,
    ) -> Result<Vec<PostType>> {
        let posts = services(ctx)?
            .hashtag_service
            .posts_for_id(self.0.id, page_limit(limit), parse_opt_id(until_id.as_ref())?)
            .await
            .extend()?;
        Ok(posts.into_iter().map(PostType).collect())
    }
}

pub struct PostSaveType(pub post_save::Model);

#[Object(name = "PostSave")]
impl PostSaveType {
    async fn id(&self) -> ID {
        to_id(self.0.id)
    }

    async fn user(&self, ctx: &Context<'_>) -> Result<Option<UserType>> {
        load_user(ctx, self.0.user_id).await
    }

    /// The saved post; null once it has been deleted.
    async fn post(&self, ctx: &Context<'_>) -> Result<Option<PostType>> {
        let post = services(ctx)?
            .post_service
            .find(self.0.post_id)
            .await
            .extend()?;
        Ok(post.map(PostType))
    }

    async fn created_at(&self) -> DateTime<Utc> {
        utc(&self.0.created_at)
    }
}

// ==================== Payloads ====================

/// Outcome of a like or follow toggle.
#[derive(SimpleObject, Clone, Copy, Debug)]
#[graphql(name = "ToggleResult")]
pub struct TogglePayload {
    /// Whether the relation exists after the call.
    pub applied: bool,
}

impl From<ToggleResult> for TogglePayload {
    fn from(result: ToggleResult) -> Self {
        Self {
            applied: result.applied,
        }
    }
}

#[derive(SimpleObject)]
pub struct RegisterPayload {
    pub user: UserType,
}

#[derive(SimpleObject)]
pub struct AuthPayload {
    pub token: String,
    pub payload: Json<Claims>,
    /// Unix time after which the token can no longer be refreshed.
    pub refresh_expires_in: i64,
    pub user: Option<UserType>,
}

#[derive(SimpleObject)]
pub struct VerifyPayload {
    pub payload: Json<Claims>,
}
