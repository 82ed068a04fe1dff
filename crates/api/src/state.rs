//! Shared application state.

#![allow(missing_docs)]

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use snapfeed_common::{StorageBackend, TokenIssuer};
use snapfeed_core::{
    AnnotationResolver, CommentService, FollowService, HashtagService, LikeService, MediaStore,
    MessageService, NotificationService, PostSaveService, PostService, ProfileService,
    ReportService, StoryService, TargetRegistry, UserService,
};
use snapfeed_db::repositories::{
    CommentRepository, FollowRepository, HashtagRepository, MessageRepository,
    NotificationRepository, PostLikeRepository, PostRepository, PostSaveRepository,
    ProfileRepository, ReportRepository, StoryRepository, UserRepository,
};

use crate::schema::{AppSchema, build_schema};

/// Every service the resolvers call into.
#[derive(Clone)]
pub struct Services {
    pub user_service: UserService,
    pub profile_service: ProfileService,
    pub post_service: PostService,
    pub story_service: StoryService,
    pub comment_service: CommentService,
    pub report_service: ReportService,
    pub like_service: LikeService,
    pub follow_service: FollowService,
    pub post_save_service: PostSaveService,
    pub hashtag_service: HashtagService,
    pub message_service: MessageService,
    pub notification_service: NotificationService,
    pub annotation_resolver: AnnotationResolver,
}

impl Services {
    /// Wire repositories and services over one connection pool.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, storage: Arc<dyn StorageBackend>) -> Self {
        let user_repo = UserRepository::new(Arc::clone(&db));
        let profile_repo = ProfileRepository::new(Arc::clone(&db));
        let post_repo = PostRepository::new(Arc::clone(&db));
        let story_repo = StoryRepository::new(Arc::clone(&db));
        let comment_repo = CommentRepository::new(Arc::clone(&db));
        let report_repo = ReportRepository::new(Arc::clone(&db));
        let like_repo = PostLikeRepository::new(Arc::clone(&db));
        let follow_repo = FollowRepository::new(Arc::clone(&db));
        let post_save_repo = PostSaveRepository::new(Arc::clone(&db));
        let hashtag_repo = HashtagRepository::new(Arc::clone(&db));
        let message_repo = MessageRepository::new(Arc::clone(&db));
        let notification_repo = NotificationRepository::new(Arc::clone(&db));

        let media = MediaStore::new(storage);
        let registry = TargetRegistry::with_defaults(post_repo.clone(), story_repo.clone());
        let annotation_resolver = AnnotationResolver::new(Arc::new(registry));
        let hashtag_service = HashtagService::new(hashtag_repo, post_repo.clone());

        Self {
            user_service: UserService::new(user_repo.clone()),
            profile_service: ProfileService::new(profile_repo, media.clone()),
            post_service: PostService::new(post_repo.clone(), hashtag_service.clone(), media.clone()),
            story_service: StoryService::new(story_repo, user_repo.clone(), media),
            comment_service: CommentService::new(comment_repo, annotation_resolver.clone()),
            report_service: ReportService::new(report_repo, annotation_resolver.clone()),
            like_service: LikeService::new(like_repo, post_repo.clone()),
            follow_service: FollowService::new(follow_repo, user_repo.clone()),
            post_save_service: PostSaveService::new(post_save_repo, post_repo),
            hashtag_service,
            message_service: MessageService::new(message_repo, user_repo.clone()),
            notification_service: NotificationService::new(notification_repo, user_repo),
            annotation_resolver,
        }
    }
}

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub schema: AppSchema,
    pub tokens: TokenIssuer,
}

impl AppState {
    #[must_use]
    pub fn new(services: Services, tokens: TokenIssuer) -> Self {
        Self {
            schema: build_schema(services, tokens.clone()),
            tokens,
        }
    }
}
