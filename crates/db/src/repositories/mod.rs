//! Database repositories.

mod comment;
mod follow;
mod hashtag;
mod message;
mod notification;
mod post;
mod post_like;
mod post_save;
mod profile;
mod report;
mod story;
mod user;

pub use comment::CommentRepository;
pub use follow::FollowRepository;
pub use hashtag::HashtagRepository;
pub use message::MessageRepository;
pub use notification::NotificationRepository;
pub use post::PostRepository;
pub use post_like::PostLikeRepository;
pub use post_save::PostSaveRepository;
pub use profile::ProfileRepository;
pub use report::ReportRepository;
pub use story::StoryRepository;
pub use user::UserRepository;

use sea_orm::{DbErr, SqlErr};
use snapfeed_common::AppError;

/// Map a failed write, surfacing unique-constraint violations as conflicts.
///
/// Pair tables (likes, follows, saves) rely on this to detect a concurrent
/// duplicate insert.
pub(crate) fn map_write_err(err: DbErr, what: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            AppError::Conflict(format!("{what} already exists: {detail}"))
        }
        _ => AppError::Database(err.to_string()),
    }
}
