//! Database entities.

#![allow(missing_docs)]

pub mod audit;
pub mod comment;
pub mod follow;
pub mod hashtag;
pub mod message;
pub mod notification;
pub mod post;
pub mod post_hashtag;
pub mod post_like;
pub mod post_save;
pub mod profile;
pub mod report;
pub mod story;
pub mod story_view;
pub mod user;

pub use audit::Audited;
pub use comment::Entity as Comment;
pub use follow::Entity as Follow;
pub use hashtag::Entity as Hashtag;
pub use message::Entity as Message;
pub use notification::Entity as Notification;
pub use post::Entity as Post;
pub use post_hashtag::Entity as PostHashtag;
pub use post_like::Entity as PostLike;
pub use post_save::Entity as PostSave;
pub use profile::Entity as Profile;
pub use report::Entity as Report;
pub use story::Entity as Story;
pub use story_view::Entity as StoryView;
pub use user::Entity as User;
