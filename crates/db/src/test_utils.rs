//! Test utilities for database-backed code.
//!
//! Model fixtures for seeding `MockDatabase` query results in repository,
//! service and API tests. Enabled with the `test-utils` feature.

use chrono::Utc;
use sea_orm::MockExecResult;

use crate::entities::{comment, hashtag, post, post_like, profile, report, story, user};

/// A user with a predictable email and a placeholder password hash.
#[must_use]
pub fn user(id: i64, username: &str) -> user::Model {
    user::Model {
        id,
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$placeholder".to_string(),
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

/// An empty profile owned by `user_id`.
#[must_use]
pub fn profile(id: i64, user_id: i64) -> profile::Model {
    profile::Model {
        id,
        user_id,
        bio: String::new(),
        profile_pic: String::new(),
        created_by: user_id,
        updated_by: user_id,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

/// A post created by `owner`.
#[must_use]
pub fn post(id: i64, owner: i64, caption: &str) -> post::Model {
    post::Model {
        id,
        caption: caption.to_string(),
        image: format!("posts/{id}.jpg"),
        created_by: owner,
        updated_by: owner,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

/// A story created by `owner`.
#[must_use]
pub fn story(id: i64, owner: i64) -> story::Model {
    story::Model {
        id,
        image: format!("stories/{id}.jpg"),
        created_by: owner,
        updated_by: owner,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

/// A top-level comment by `author` on the given target.
#[must_use]
pub fn comment(id: i64, author: i64, target_kind: &str, target_id: i64) -> comment::Model {
    comment::Model {
        id,
        target_kind: target_kind.to_string(),
        target_id,
        text: format!("comment {id}"),
        parent_id: None,
        created_by: author,
        updated_by: author,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

/// A report filed by `reporter` against the given target.
#[must_use]
pub fn report(id: i64, reporter: i64, target_kind: &str, target_id: i64) -> report::Model {
    report::Model {
        id,
        reported_by: reporter,
        target_kind: target_kind.to_string(),
        target_id,
        reason: "spam".to_string(),
        created_by: reporter,
        updated_by: reporter,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

/// A like on `post_id` by `user_id`.
#[must_use]
pub fn like(id: i64, user_id: i64, post_id: i64) -> post_like::Model {
    post_like::Model {
        id,
        user_id,
        post_id,
        created_by: user_id,
        updated_by: user_id,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

/// A hashtag.
#[must_use]
pub fn hashtag(id: i64, name: &str) -> hashtag::Model {
    hashtag::Model {
        id,
        name: name.to_string(),
        created_at: Utc::now().into(),
    }
}

/// Exec result for a statement that touched `rows_affected` rows.
#[must_use]
pub const fn exec(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}
