//! Report service.

use snapfeed_common::AppResult;
use snapfeed_db::{
    entities::{Audited, report},
    repositories::ReportRepository,
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::annotation::AnnotationResolver;
use super::target::{Target, TargetKind};

/// Report service for business logic.
#[derive(Clone)]
pub struct ReportService {
    report_repo: ReportRepository,
    resolver: AnnotationResolver,
}

/// Input for reporting a post or story.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReportInput {
    #[validate(length(min = 1, max = 1000))]
    pub reason: String,

    pub target_kind: String,

    pub target_id: i64,
}

impl ReportService {
    /// Create a new report service.
    #[must_use]
    pub const fn new(report_repo: ReportRepository, resolver: AnnotationResolver) -> Self {
        Self {
            report_repo,
            resolver,
        }
    }

    /// File a report on behalf of `actor_id`.
    pub async fn create(&self, actor_id: i64, input: CreateReportInput) -> AppResult<report::Model> {
        input.validate()?;

        let target = self
            .resolver
            .check_target(&input.target_kind, input.target_id)
            .await?;

        let model = report::ActiveModel {
            reported_by: Set(actor_id),
            target_kind: Set(target.kind().as_str().to_string()),
            target_id: Set(target.id()),
            reason: Set(input.reason),
            ..Default::default()
        }
        .stamp_created(actor_id);

        let report = self.report_repo.create(model).await?;

        tracing::info!(
            report_id = report.id,
            reporter = actor_id,
            target_kind = %report.target_kind,
            target_id = report.target_id,
            "Report filed"
        );

        Ok(report)
    }

    /// Get a report by ID.
    pub async fn get(&self, id: i64) -> AppResult<report::Model> {
        self.report_repo.get_by_id(id).await
    }

    /// List all reports, newest first.
    pub async fn list(&self, limit: u64, until_id: Option<i64>) -> AppResult<Vec<report::Model>> {
        self.report_repo.find_all(limit, until_id).await
    }

    /// List reports filed against a target.
    pub async fn list_for_target(
        &self,
        kind: &str,
        target_id: i64,
        limit: u64,
    ) -> AppResult<Vec<report::Model>> {
        let kind: TargetKind = kind.parse()?;
        self.report_repo
            .find_by_target(kind.as_str(), target_id, limit)
            .await
    }

    /// List reports filed by a user.
    pub async fn list_by_reporter(&self, user_id: i64, limit: u64) -> AppResult<Vec<report::Model>> {
        self.report_repo.find_by_reporter(user_id, limit).await
    }

    /// Resolve the target of a report; `None` once the target is deleted.
    pub async fn target(&self, report: &report::Model) -> AppResult<Option<Target>> {
        self.resolver.resolve_target(report).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::target::TargetRegistry;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use snapfeed_common::AppError;
    use snapfeed_db::{
        entities::{post, story},
        repositories::{PostRepository, StoryRepository},
        test_utils,
    };
    use std::sync::Arc;

    fn service(
        reports: Vec<Vec<report::Model>>,
        posts: Vec<Vec<post::Model>>,
        stories: Vec<Vec<story::Model>>,
    ) -> ReportService {
        let report_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results(reports)
                .into_connection(),
        );
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results(posts)
                .into_connection(),
        );
        let story_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results(stories)
                .into_connection(),
        );

        ReportService::new(
            ReportRepository::new(report_db),
            AnnotationResolver::new(Arc::new(TargetRegistry::with_defaults(
                PostRepository::new(post_db),
                StoryRepository::new(story_db),
            ))),
        )
    }

    #[tokio::test]
    async fn test_report_story() {
        let story = test_utils::story(2, 10);
        let created = test_utils::report(1, 30, "story", 2);
        let service = service(vec![vec![created]], vec![], vec![vec![story.clone()]]);

        let input = CreateReportInput {
            reason: "spam".to_string(),
            target_kind: "story".to_string(),
            target_id: 2,
        };
        let report = service.create(30, input).await.unwrap();
        assert_eq!(report.reported_by, 30);

        let service = self::service(vec![], vec![], vec![vec![story.clone()]]);
        assert_eq!(
            service.target(&report).await.unwrap(),
            Some(Target::Story(story))
        );
    }

    #[tokio::test]
    async fn test_report_missing_target() {
        let service = service(vec![], vec![vec![]], vec![]);

        let input = CreateReportInput {
            reason: "spam".to_string(),
            target_kind: "post".to_string(),
            target_id: 5,
        };

        let err = service.create(30, input).await.unwrap_err();
        assert_eq!(err.error_code(), "TARGET_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_report_reason_required() {
        let service = service(vec![], vec![], vec![]);

        let input = CreateReportInput {
            reason: String::new(),
            target_kind: "post".to_string(),
            target_id: 5,
        };

        assert!(matches!(
            service.create(30, input).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_list_for_target_rejects_unknown_kind() {
        let service = service(vec![], vec![], vec![]);

        assert!(matches!(
            service.list_for_target("reel", 1, 10).await,
            Err(AppError::UnknownTargetKind(_))
        ));
    }
}
