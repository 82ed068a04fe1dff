//! Comment service.

use snapfeed_common::{AppError, AppResult};
use snapfeed_db::{
    entities::{Audited, comment},
    repositories::CommentRepository,
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::annotation::AnnotationResolver;
use super::target::{Target, TargetKind};

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    resolver: AnnotationResolver,
}

/// Input for creating a comment.
///
/// A reply (`parent_id` set) inherits its parent's target; `target_id` may
/// be omitted, and when given it must match the parent's target. A missing
/// `target_kind` means `post` for a top-level comment and the parent's kind
/// for a reply.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentInput {
    #[validate(length(min = 1, max = 2200))]
    pub text: String,

    pub target_kind: Option<String>,

    pub target_id: Option<i64>,

    pub parent_id: Option<i64>,
}

impl CreateCommentInput {
    /// A top-level comment on a post.
    #[must_use]
    pub fn on_post(post_id: i64, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target_kind: Some(TargetKind::Post.as_str().to_string()),
            target_id: Some(post_id),
            parent_id: None,
        }
    }
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(comment_repo: CommentRepository, resolver: AnnotationResolver) -> Self {
        Self {
            comment_repo,
            resolver,
        }
    }

    /// Create a comment authored by `actor_id`.
    pub async fn create(&self, actor_id: i64, input: CreateCommentInput) -> AppResult<comment::Model> {
        input.validate()?;

        let target = match input.parent_id {
            Some(parent_id) => self.reply_target(parent_id, &input).await?,
            None => {
                let target_id = input
                    .target_id
                    .ok_or_else(|| AppError::BadRequest("targetId is required".to_string()))?;
                let kind = input
                    .target_kind
                    .as_deref()
                    .unwrap_or(TargetKind::Post.as_str());
                self.resolver.check_target(kind, target_id).await?
            }
        };

        let model = comment::ActiveModel {
            target_kind: Set(target.kind().as_str().to_string()),
            target_id: Set(target.id()),
            text: Set(input.text),
            parent_id: Set(input.parent_id),
            ..Default::default()
        }
        .stamp_created(actor_id);

        let comment = self.comment_repo.create(model).await?;

        tracing::debug!(
            comment_id = comment.id,
            target_kind = %comment.target_kind,
            target_id = comment.target_id,
            "Created comment"
        );

        Ok(comment)
    }

    /// Validate a reply against its parent and resolve the shared target.
    async fn reply_target(&self, parent_id: i64, input: &CreateCommentInput) -> AppResult<Target> {
        let parent = self
            .comment_repo
            .find_by_id(parent_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Parent comment {parent_id}")))?;

        if let Some(target_id) = input.target_id {
            let kind: TargetKind = input
                .target_kind
                .as_deref()
                .unwrap_or(&parent.target_kind)
                .parse()
                .map_err(AppError::invalid_target)?;

            if kind.as_str() != parent.target_kind || target_id != parent.target_id {
                return Err(AppError::invalid_target(AppError::BadRequest(format!(
                    "reply target {kind}:{target_id} does not match parent target {}:{}",
                    parent.target_kind, parent.target_id
                ))));
            }
        }

        self.resolver
            .check_target(&parent.target_kind, parent.target_id)
            .await
    }

    /// Get a comment by ID.
    pub async fn get(&self, id: i64) -> AppResult<comment::Model> {
        self.comment_repo.get_by_id(id).await
    }

    /// Find a comment by ID.
    pub async fn find(&self, id: i64) -> AppResult<Option<comment::Model>> {
        self.comment_repo.find_by_id(id).await
    }

    /// List all comments, newest first.
    pub async fn list(&self, limit: u64, until_id: Option<i64>) -> AppResult<Vec<comment::Model>> {
        self.comment_repo.find_all(limit, until_id).await
    }

    /// List comments on a target, oldest first.
    pub async fn list_for_target(
        &self,
        kind: &str,
        target_id: i64,
        limit: u64,
        since_id: Option<i64>,
    ) -> AppResult<Vec<comment::Model>> {
        let kind: TargetKind = kind.parse()?;
        self.comment_repo
            .find_by_target(kind.as_str(), target_id, limit, since_id)
            .await
    }

    /// Count comments on a target.
    pub async fn count_for_target(&self, kind: TargetKind, target_id: i64) -> AppResult<u64> {
        self.comment_repo
            .count_by_target(kind.as_str(), target_id)
            .await
    }

    /// Direct replies to a comment.
    pub async fn list_replies(&self, comment_id: i64, limit: u64) -> AppResult<Vec<comment::Model>> {
        self.comment_repo.find_replies(comment_id, limit).await
    }

    /// The comment a reply answers, if any.
    pub async fn parent(&self, comment: &comment::Model) -> AppResult<Option<comment::Model>> {
        match comment.parent_id {
            Some(parent_id) => self.comment_repo.find_by_id(parent_id).await,
            None => Ok(None),
        }
    }

    /// Resolve the target of a comment; `None` once the target is deleted.
    pub async fn target(&self, comment: &comment::Model) -> AppResult<Option<Target>> {
        self.resolver.resolve_target(comment).await
    }

    /// Delete a comment written by `actor_id`, together with its replies.
    pub async fn delete(&self, actor_id: i64, id: i64) -> AppResult<()> {
        let comment = self.comment_repo.get_by_id(id).await?;

        if comment.created_by != actor_id {
            return Err(AppError::Forbidden(
                "Only the author can delete a comment".to_string(),
            ));
        }

        self.comment_repo.delete(id).await
    }
}
