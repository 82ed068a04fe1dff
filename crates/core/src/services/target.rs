//! Target registry for comments and reports.
//!
//! Comments and reports point at "something annotatable" through a stored
//! `(target_kind, target_id)` pair. The registry maps each supported kind to
//! a lookup that loads the record, so adding a kind means one [`TargetKind`]
//! variant and one registration.

use std::{collections::HashMap, fmt, str::FromStr, sync::Arc};

use async_trait::async_trait;
use snapfeed_common::{AppError, AppResult};
use snapfeed_db::{
    entities::{post, story},
    repositories::{PostRepository, StoryRepository},
};

/// Kinds of record a comment or report may target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Post,
    Story,
}

impl TargetKind {
    /// Every supported kind.
    pub const ALL: [Self; 2] = [Self::Post, Self::Story];

    /// Tag persisted in `target_kind` columns.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Story => "story",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetKind {
    type Err = AppError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "post" => Ok(Self::Post),
            "story" => Ok(Self::Story),
            other => Err(AppError::UnknownTargetKind(other.to_string())),
        }
    }
}

/// A loaded annotation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Post(post::Model),
    Story(story::Model),
}

impl Target {
    #[must_use]
    pub const fn kind(&self) -> TargetKind {
        match self {
            Self::Post(_) => TargetKind::Post,
            Self::Story(_) => TargetKind::Story,
        }
    }

    #[must_use]
    pub const fn id(&self) -> i64 {
        match self {
            Self::Post(p) => p.id,
            Self::Story(s) => s.id,
        }
    }

    /// User who created the target.
    #[must_use]
    pub const fn owner_id(&self) -> i64 {
        match self {
            Self::Post(p) => p.created_by,
            Self::Story(s) => s.created_by,
        }
    }

    #[must_use]
    pub const fn target_ref(&self) -> TargetRef {
        TargetRef::new(self.kind(), self.id())
    }
}

/// Records that comments and reports may point at.
pub trait Annotatable {
    const KIND: TargetKind;

    fn target_id(&self) -> i64;

    fn target_ref(&self) -> TargetRef {
        TargetRef::new(Self::KIND, self.target_id())
    }
}

impl Annotatable for post::Model {
    const KIND: TargetKind = TargetKind::Post;

    fn target_id(&self) -> i64 {
        self.id
    }
}

impl Annotatable for story::Model {
    const KIND: TargetKind = TargetKind::Story;

    fn target_id(&self) -> i64 {
        self.id
    }
}

/// A validated `(kind, id)` reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetRef {
    pub kind: TargetKind,
    pub id: i64,
}

impl TargetRef {
    #[must_use]
    pub const fn new(kind: TargetKind, id: i64) -> Self {
        Self { kind, id }
    }

    /// Parse a stored or client-supplied tag.
    pub fn parse(kind: &str, id: i64) -> AppResult<Self> {
        Ok(Self::new(kind.parse()?, id))
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Loads records of a single kind.
#[async_trait]
pub trait TargetLookup: Send + Sync {
    async fn lookup(&self, id: i64) -> AppResult<Option<Target>>;
}

#[async_trait]
impl TargetLookup for PostRepository {
    async fn lookup(&self, id: i64) -> AppResult<Option<Target>> {
        Ok(self.find_by_id(id).await?.map(Target::Post))
    }
}

#[async_trait]
impl TargetLookup for StoryRepository {
    async fn lookup(&self, id: i64) -> AppResult<Option<Target>> {
        Ok(self.find_by_id(id).await?.map(Target::Story))
    }
}

/// Maps target kinds to their lookups.
#[derive(Clone, Default)]
pub struct TargetRegistry {
    lookups: HashMap<TargetKind, Arc<dyn TargetLookup>>,
}

impl TargetRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in post and story lookups.
    #[must_use]
    pub fn with_defaults(post_repo: PostRepository, story_repo: StoryRepository) -> Self {
        let mut registry = Self::new();
        registry.register(TargetKind::Post, Arc::new(post_repo));
        registry.register(TargetKind::Story, Arc::new(story_repo));
        registry
    }

    /// Register the lookup for a kind, replacing any previous one.
    pub fn register(&mut self, kind: TargetKind, lookup: Arc<dyn TargetLookup>) -> &mut Self {
        self.lookups.insert(kind, lookup);
        self
    }

    /// Whether a lookup is registered for `kind`.
    #[must_use]
    pub fn supports(&self, kind: TargetKind) -> bool {
        self.lookups.contains_key(&kind)
    }

    /// Resolve a tag and id to the target record.
    ///
    /// Fails with [`AppError::UnknownTargetKind`] for an unsupported or
    /// unregistered tag and [`AppError::TargetNotFound`] when no record exists.
    pub async fn resolve(&self, kind: &str, id: i64) -> AppResult<Target> {
        self.resolve_ref(TargetRef::parse(kind, id)?).await
    }

    /// Resolve a parsed reference to the target record.
    pub async fn resolve_ref(&self, target: TargetRef) -> AppResult<Target> {
        self.find(target)
            .await?
            .ok_or_else(|| AppError::TargetNotFound {
                kind: target.kind.to_string(),
                id: target.id,
            })
    }

    /// Load a target, returning `None` when the record no longer exists.
    pub async fn find(&self, target: TargetRef) -> AppResult<Option<Target>> {
        let lookup = self
            .lookups
            .get(&target.kind)
            .ok_or_else(|| AppError::UnknownTargetKind(target.kind.to_string()))?;

        lookup.lookup(target.id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use snapfeed_db::test_utils;

    struct FixedLookup(Option<Target>);

    #[async_trait]
    impl TargetLookup for FixedLookup {
        async fn lookup(&self, _id: i64) -> AppResult<Option<Target>> {
            Ok(self.0.clone())
        }
    }

    fn registry(posts: Vec<post::Model>, stories: Vec<story::Model>) -> TargetRegistry {
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([posts])
                .into_connection(),
        );
        let story_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([stories])
                .into_connection(),
        );

        TargetRegistry::with_defaults(PostRepository::new(post_db), StoryRepository::new(story_db))
    }

    #[test]
    fn test_kind_tags() {
        for kind in TargetKind::ALL {
            assert_eq!(kind.as_str().parse::<TargetKind>().unwrap(), kind);
        }
        assert!(matches!(
            "video".parse::<TargetKind>(),
            Err(AppError::UnknownTargetKind(tag)) if tag == "video"
        ));
    }

    #[test]
    fn test_annotatable_refs() {
        let post = test_utils::post(3, 1, "hello");
        let story = test_utils::story(4, 1);

        assert_eq!(post.target_ref(), TargetRef::new(TargetKind::Post, 3));
        assert_eq!(story.target_ref(), TargetRef::new(TargetKind::Story, 4));
        assert_eq!(Target::Story(story).target_ref().to_string(), "story:4");
    }

    #[tokio::test]
    async fn test_resolve_post() {
        let post = test_utils::post(7, 1, "sunset");
        let registry = registry(vec![post.clone()], vec![]);

        let target = registry.resolve("post", 7).await.unwrap();
        assert_eq!(target, Target::Post(post));
    }

    #[tokio::test]
    async fn test_resolve_story() {
        let story = test_utils::story(9, 2);
        let registry = registry(vec![], vec![story.clone()]);

        let target = registry.resolve("story", 9).await.unwrap();
        assert_eq!(target.kind(), TargetKind::Story);
        assert_eq!(target.owner_id(), 2);
    }

    #[tokio::test]
    async fn test_resolve_unknown_kind() {
        let registry = registry(vec![], vec![]);

        let result = registry.resolve("video", 1).await;
        assert!(matches!(result, Err(AppError::UnknownTargetKind(_))));
    }

    #[tokio::test]
    async fn test_resolve_missing_record() {
        let registry = registry(vec![], vec![]);

        let result = registry.resolve("post", 404).await;
        assert!(matches!(
            result,
            Err(AppError::TargetNotFound { kind, id: 404 }) if kind == "post"
        ));
    }

    #[tokio::test]
    async fn test_unregistered_kind() {
        let mut registry = TargetRegistry::new();
        registry.register(TargetKind::Post, Arc::new(FixedLookup(None)));

        assert!(registry.supports(TargetKind::Post));
        assert!(!registry.supports(TargetKind::Story));
        assert!(matches!(
            registry.resolve("story", 1).await,
            Err(AppError::UnknownTargetKind(_))
        ));
    }

    #[tokio::test]
    async fn test_register_replaces_lookup() {
        let story = test_utils::story(5, 1);
        let mut registry = TargetRegistry::new();
        registry
            .register(TargetKind::Story, Arc::new(FixedLookup(None)))
            .register(TargetKind::Story, Arc::new(FixedLookup(Some(Target::Story(story)))));

        let target = registry.resolve("story", 5).await.unwrap();
        assert_eq!(target.id(), 5);
    }
}
