//! Resolution of comment and report targets.

use std::sync::Arc;

use snapfeed_common::{AppError, AppResult};
use snapfeed_db::entities::{comment, report};

use super::target::{Target, TargetRef, TargetRegistry};

/// A record that annotates a target through a stored `(kind, id)` pair.
pub trait Annotation {
    fn target_kind(&self) -> &str;

    fn target_id(&self) -> i64;
}

impl Annotation for comment::Model {
    fn target_kind(&self) -> &str {
        &self.target_kind
    }

    fn target_id(&self) -> i64 {
        self.target_id
    }
}

impl Annotation for report::Model {
    fn target_kind(&self) -> &str {
        &self.target_kind
    }

    fn target_id(&self) -> i64 {
        self.target_id
    }
}

/// Validates targets for new annotations and resolves targets of stored ones.
#[derive(Clone)]
pub struct AnnotationResolver {
    registry: Arc<TargetRegistry>,
}

impl AnnotationResolver {
    #[must_use]
    pub const fn new(registry: Arc<TargetRegistry>) -> Self {
        Self { registry }
    }

    /// Resolve the target a new annotation will point at.
    ///
    /// Registry failures are wrapped in [`AppError::InvalidTarget`]; store
    /// errors pass through unchanged.
    pub async fn check_target(&self, kind: &str, id: i64) -> AppResult<Target> {
        self.registry.resolve(kind, id).await.map_err(|e| match e {
            AppError::UnknownTargetKind(_) | AppError::TargetNotFound { .. } => {
                AppError::invalid_target(e)
            }
            other => other,
        })
    }

    /// Load the target of a stored annotation.
    ///
    /// Returns `None` when the target was deleted after the annotation was
    /// created. A stored tag that is no longer supported is an
    /// [`AppError::UnknownTargetKind`] error.
    pub async fn resolve_target<A>(&self, annotation: &A) -> AppResult<Option<Target>>
    where
        A: Annotation + Sync,
    {
        let target = TargetRef::parse(annotation.target_kind(), annotation.target_id())?;
        self.registry.find(target).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::target::TargetKind;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use snapfeed_db::{
        repositories::{PostRepository, StoryRepository},
        test_utils,
    };

    fn resolver(
        posts: Vec<Vec<snapfeed_db::entities::post::Model>>,
        stories: Vec<Vec<snapfeed_db::entities::story::Model>>,
    ) -> AnnotationResolver {
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

        AnnotationResolver::new(Arc::new(TargetRegistry::with_defaults(
            PostRepository::new(post_db),
            StoryRepository::new(story_db),
        )))
    }

    #[tokio::test]
    async fn test_check_target_wraps_missing_record() {
        let resolver = resolver(vec![vec![]], vec![]);

        let err = resolver.check_target("post", 99).await.unwrap_err();
        assert!(matches!(&err, AppError::InvalidTarget(inner)
            if matches!(inner.as_ref(), AppError::TargetNotFound { id: 99, .. })));
        assert_eq!(err.error_code(), "TARGET_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_check_target_wraps_unknown_kind() {
        let resolver = resolver(vec![], vec![]);

        let err = resolver.check_target("video", 1).await.unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_TARGET_KIND");
        assert!(err.to_string().contains("video"));
    }

    #[tokio::test]
    async fn test_resolve_target_of_comment() {
        let story = test_utils::story(4, 1);
        let resolver = resolver(vec![], vec![vec![story.clone()]]);
        let comment = test_utils::comment(1, 2, "story", 4);

        let target = resolver.resolve_target(&comment).await.unwrap();
        assert_eq!(target, Some(Target::Story(story)));
    }

    #[tokio::test]
    async fn test_resolve_target_after_deletion() {
        let resolver = resolver(vec![vec![]], vec![]);
        let report = test_utils::report(1, 2, "post", 8);

        let target = resolver.resolve_target(&report).await.unwrap();
        assert!(target.is_none());
    }

    #[tokio::test]
    async fn test_resolve_target_unsupported_tag() {
        let resolver = resolver(vec![], vec![]);
        let comment = test_utils::comment(1, 2, "reel", 4);

        assert!(matches!(
            resolver.resolve_target(&comment).await,
            Err(AppError::UnknownTargetKind(tag)) if tag == "reel"
        ));
    }

    #[test]
    fn test_annotation_pairs() {
        let comment = test_utils::comment(1, 2, "post", 4);
        assert_eq!(
            TargetRef::parse(comment.target_kind(), Annotation::target_id(&comment)).unwrap(),
            TargetRef::new(TargetKind::Post, 4)
        );
    }
}
