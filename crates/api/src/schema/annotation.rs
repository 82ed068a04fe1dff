//! Comments, reports and target resolution.

use async_graphql::{Context, Object, Result, ResultExt, ID};
use snapfeed_core::{CreateCommentInput, CreateReportInput, TargetKind};

use super::guard::AuthGuard;
use super::types::{AnnotationKind, CommentType, Commentable, ReportType, TargetKindEnum};
use super::{page_limit, parse_id, parse_opt_id, services, viewer_id};

#[derive(Default)]
pub struct AnnotationQuery;

#[Object]
impl AnnotationQuery {
    /// All comments, newest first.
    #[graphql(guard = "AuthGuard")]
    async fn comments(
        &self,
        ctx: &Context<'_>,
        limit: Option<i32>,
        until_id: Option<ID>,
    ) -> Result<Vec<CommentType>> {
        let comments = services(ctx)?
            .comment_service
            .list(page_limit(limit), parse_opt_id(until_id.as_ref())?)
            .await
            .extend()?;
        Ok(comments.into_iter().map(CommentType).collect())
    }

    #[graphql(guard = "AuthGuard")]
    async fn comment(&self, ctx: &Context<'_>, id: ID) -> Result<Option<CommentType>> {
        let comment = services(ctx)?
            .comment_service
            .find(parse_id(&id)?)
            .await
            .extend()?;
        Ok(comment.map(CommentType))
    }

    /// Comments on one post or story, oldest first.
    #[graphql(guard = "AuthGuard")]
    async fn comments_for_target(
        &self,
        ctx: &Context<'_>,
        target_kind: TargetKindEnum,
        target_id: ID,
        limit: Option<i32>,
        since_id: Option<ID>,
    ) -> Result<Vec<CommentType>> {
        let comments = services(ctx)?
            .comment_service
            .list_for_target(
                TargetKind::from(target_kind).as_str(),
                parse_id(&target_id)?,
                page_limit(limit),
                parse_opt_id(since_id.as_ref())?,
            )
            .await
            .extend()?;
        Ok(comments.into_iter().map(CommentType).collect())
    }

    /// All reports, newest first.
    #[graphql(guard = "AuthGuard")]
    async fn reports(
        &self,
        ctx: &Context<'_>,
        limit: Option<i32>,
        until_id: Option<ID>,
    ) -> Result<Vec<ReportType>> {
        let reports = services(ctx)?
            .report_service
            .list(page_limit(limit), parse_opt_id(until_id.as_ref())?)
            .await
            .extend()?;
        Ok(reports.into_iter().map(ReportType).collect())
    }

    /// Reports the viewer has filed, newest first.
    #[graphql(guard = "AuthGuard")]
    async fn my_reports(&self, ctx: &Context<'_>, limit: Option<i32>) -> Result<Vec<ReportType>> {
        let reports = services(ctx)?
            .report_service
            .list_by_reporter(viewer_id(ctx)?, page_limit(limit))
            .await
            .extend()?;
        Ok(reports.into_iter().map(ReportType).collect())
    }

    #[graphql(guard = "AuthGuard")]
    async fn reports_for_target(
        &self,
        ctx: &Context<'_>,
        target_kind: TargetKindEnum,
        target_id: ID,
        limit: Option<i32>,
    ) -> Result<Vec<ReportType>> {
        let reports = services(ctx)?
            .report_service
            .list_for_target(
                TargetKind::from(target_kind).as_str(),
                parse_id(&target_id)?,
                page_limit(limit),
            )
            .await
            .extend()?;
        Ok(reports.into_iter().map(ReportType).collect())
    }

    /// The post or story a comment or report points at; null once deleted.
    #[graphql(guard = "AuthGuard")]
    async fn annotation_target(
        &self,
        ctx: &Context<'_>,
        kind: AnnotationKind,
        id: ID,
    ) -> Result<Option<Commentable>> {
        let services = services(ctx)?;
        let id = parse_id(&id)?;

        let target = match kind {
            AnnotationKind::Comment => {
                let comment = services.comment_service.get(id).await.extend()?;
                services.annotation_resolver.resolve_target(&comment).await
            }
            AnnotationKind::Report => {
                let report = services.report_service.get(id).await.extend()?;
                services.annotation_resolver.resolve_target(&report).await
            }
        }
        .extend()?;

        Ok(target.map(Commentable::from))
    }
}

#[derive(Default)]
pub struct AnnotationMutation;

#[Object]
impl AnnotationMutation {
    /// Comment on a post or story, or reply to a comment with `parentId`.
    #[graphql(guard = "AuthGuard")]
    async fn create_comment(
        &self,
        ctx: &Context<'_>,
        text: String,
        #[graphql(desc = "Defaults to POST, or to the parent's kind for a reply")]
        target_kind: Option<TargetKindEnum>,
        target_id: Option<ID>,
        parent_id: Option<ID>,
    ) -> Result<CommentType> {
        let input = CreateCommentInput {
            text,
            target_kind: target_kind.map(|kind| TargetKind::from(kind).as_str().to_string()),
            target_id: parse_opt_id(target_id.as_ref())?,
            parent_id: parse_opt_id(parent_id.as_ref())?,
        };

        let comment = services(ctx)?
            .comment_service
            .create(viewer_id(ctx)?, input)
            .await
            .extend()?;
        Ok(CommentType(comment))
    }

    /// Delete one of the viewer's comments along with its replies.
    #[graphql(guard = "AuthGuard")]
    async fn delete_comment(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        services(ctx)?
            .comment_service
            .delete(viewer_id(ctx)?, parse_id(&id)?)
            .await
            .extend()?;
        Ok(true)
    }

    #[graphql(guard = "AuthGuard")]
    async fn create_report(
        &self,
        ctx: &Context<'_>,
        reason: String,
        #[graphql(default)] target_kind: TargetKindEnum,
        target_id: ID,
    ) -> Result<ReportType> {
        let input = CreateReportInput {
            reason,
            target_kind: TargetKind::from(target_kind).as_str().to_string(),
            target_id: parse_id(&target_id)?,
        };

        let report = services(ctx)?
            .report_service
            .create(viewer_id(ctx)?, input)
            .await
            .extend()?;
        Ok(ReportType(report))
    }
}
