//! Creator/updater stamping shared by every content entity.
//!
//! The audit columns are filled from the acting user of the request and
//! never from client input.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set, entity::prelude::DateTimeWithTimeZone};

/// Active models carrying `created_by`, `updated_by`, `created_at` and `updated_at`.
pub trait Audited: ActiveModelTrait + Sized {
    /// Stamp all four audit columns for a new row.
    #[must_use]
    fn stamp_created(self, actor_id: i64) -> Self;

    /// Re-stamp the updater and update time.
    #[must_use]
    fn stamp_updated(self, actor_id: i64) -> Self;
}

fn now() -> DateTimeWithTimeZone {
    Utc::now().into()
}

macro_rules! impl_audited {
    ($($entity:ident),+ $(,)?) => {
        $(
            impl Audited for super::$entity::ActiveModel {
                fn stamp_created(mut self, actor_id: i64) -> Self {
                    let ts = now();
                    self.created_by = Set(actor_id);
                    self.updated_by = Set(actor_id);
                    self.created_at = Set(ts);
                    self.updated_at = Set(ts);
                    self
                }

                fn stamp_updated(mut self, actor_id: i64) -> Self {
                    self.updated_by = Set(actor_id);
                    self.updated_at = Set(now());
                    self
                }
            }
        )+
    };
}

impl_audited!(
    comment,
    follow,
    message,
    notification,
    post,
    post_like,
    post_save,
    profile,
    report,
    story,
);
