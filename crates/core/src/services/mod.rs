//! Business logic services.

#![allow(missing_docs)]

pub mod annotation;
pub mod comment;
pub mod follow;
pub mod hashtag;
pub mod like;
pub mod media;
pub mod message;
pub mod notification;
pub mod post;
pub mod post_save;
pub mod profile;
pub mod report;
pub mod story;
pub mod target;
pub mod toggle;
pub mod user;

pub use annotation::{Annotation, AnnotationResolver};
pub use comment::{CommentService, CreateCommentInput};
pub use follow::FollowService;
pub use hashtag::{HashtagService, extract_hashtags};
pub use like::LikeService;
pub use media::{ImageSource, MediaStore, NewUpload};
pub use message::{MessageService, SendMessageInput};
pub use notification::NotificationService;
pub use post::{CreatePostInput, PostService, UpdatePostInput};
pub use post_save::PostSaveService;
pub use profile::{ProfileService, UpdateProfileInput};
pub use report::{CreateReportInput, ReportService};
pub use story::StoryService;
pub use target::{Annotatable, Target, TargetKind, TargetLookup, TargetRef, TargetRegistry};
pub use toggle::ToggleResult;
pub use user::{RegisterInput, UserService};
