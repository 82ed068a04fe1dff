//! Profile service.

use sea_orm::Set;
use serde::Deserialize;
use snapfeed_common::{AppResult, StorageCategory};
use snapfeed_db::{
    entities::{Audited, profile},
    repositories::ProfileRepository,
};
use validator::Validate;

use super::media::{ImageSource, MediaStore};

/// Profile service for business logic.
#[derive(Clone)]
pub struct ProfileService {
    profile_repo: ProfileRepository,
    media: MediaStore,
}

/// Input for updating the actor's profile. Absent fields are left as they are.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileInput {
    #[validate(length(max = 2048))]
    pub bio: Option<String>,

    #[serde(skip)]
    pub profile_pic: Option<ImageSource>,
}

impl ProfileService {
    /// Create a new profile service.
    #[must_use]
    pub const fn new(profile_repo: ProfileRepository, media: MediaStore) -> Self {
        Self {
            profile_repo,
            media,
        }
    }

    pub async fn get_for_user(&self, user_id: i64) -> AppResult<profile::Model> {
        self.profile_repo.get_by_user_id(user_id).await
    }

    pub async fn find_for_users(&self, user_ids: &[i64]) -> AppResult<Vec<profile::Model>> {
        self.profile_repo.find_by_user_ids(user_ids).await
    }

    /// Create the actor's profile if missing, otherwise update it.
    pub async fn upsert(
        &self,
        actor_id: i64,
        input: UpdateProfileInput,
    ) -> AppResult<profile::Model> {
        input.validate()?;

        let profile_pic = match input.profile_pic {
            Some(source) => Some(
                self.media
                    .store(actor_id, StorageCategory::ProfilePics, source)
                    .await?,
            ),
            None => None,
        };

        match self.profile_repo.find_by_user_id(actor_id).await? {
            Some(existing) => {
                let mut active: profile::ActiveModel = existing.into();
                if let Some(bio) = input.bio {
                    active.bio = Set(bio);
                }
                if let Some(pic) = profile_pic {
                    active.profile_pic = Set(pic);
                }
                self.profile_repo
                    .update(active.stamp_updated(actor_id))
                    .await
            }
            None => {
                let model = profile::ActiveModel {
                    user_id: Set(actor_id),
                    bio: Set(input.bio.unwrap_or_default()),
                    profile_pic: Set(profile_pic.unwrap_or_default()),
                    ..Default::default()
                }
                .stamp_created(actor_id);
                self.profile_repo.create(model).await
            }
        }
    }

    /// Replace the actor's avatar. The bio is left as it is.
    pub async fn set_avatar(&self, actor_id: i64, source: ImageSource) -> AppResult<profile::Model> {
        self.upsert(
            actor_id,
            UpdateProfileInput {
                bio: None,
                profile_pic: Some(source),
            },
        )
        .await
    }
}
