//! Users, profiles and follows.

use async_graphql::{Context, Object, Result, ResultExt, Upload, ID};
use snapfeed_core::{ImageSource, UpdateProfileInput};

use super::guard::AuthGuard;
use super::types::{ProfileType, TogglePayload, UserType};
use super::{image_source, page_limit, parse_id, parse_opt_id, read_upload, services, viewer_id};

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// The authenticated user.
    #[graphql(guard = "AuthGuard")]
    async fn me(&self, ctx: &Context<'_>) -> Result<UserType> {
        let user = services(ctx)?
            .user_service
            .get(viewer_id(ctx)?)
            .await
            .extend()?;
        Ok(UserType(user))
    }

    #[graphql(guard = "AuthGuard")]
    async fn users(
        &self,
        ctx: &Context<'_>,
        limit: Option<i32>,
        until_id: Option<ID>,
    ) -> Result<Vec<UserType>> {
        let users = services(ctx)?
            .user_service
            .list(page_limit(limit), parse_opt_id(until_id.as_ref())?)
            .await
            .extend()?;
        Ok(users.into_iter().map(UserType).collect())
    }

    #[graphql(guard = "AuthGuard")]
    async fn user(&self, ctx: &Context<'_>, id: ID) -> Result<Option<UserType>> {
        let user = services(ctx)?
            .user_service
            .find(parse_id(&id)?)
            .await
            .extend()?;
        Ok(user.map(UserType))
    }

    #[graphql(guard = "AuthGuard")]
    async fn profile(&self, ctx: &Context<'_>, user_id: ID) -> Result<ProfileType> {
        let profile = services(ctx)?
            .profile_service
            .get_for_user(parse_id(&user_id)?)
            .await
            .extend()?;
        Ok(ProfileType(profile))
    }
}

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    /// Follow a user, or unfollow if already following.
    #[graphql(guard = "AuthGuard")]
    async fn toggle_follow(&self, ctx: &Context<'_>, user_id: ID) -> Result<TogglePayload> {
        let result = services(ctx)?
            .follow_service
            .toggle(viewer_id(ctx)?, parse_id(&user_id)?)
            .await
            .extend()?;
        Ok(result.into())
    }

    /// Update the viewer's bio and avatar. The avatar is either a stored
    /// path (`profilePic`) or an upload (`avatar`).
    #[graphql(guard = "AuthGuard")]
    async fn update_profile(
        &self,
        ctx: &Context<'_>,
        bio: Option<String>,
        profile_pic: Option<String>,
        avatar: Option<Upload>,
    ) -> Result<ProfileType> {
        let profile_pic = match (avatar, profile_pic) {
            (Some(upload), _) => Some(ImageSource::Upload(read_upload(ctx, &upload)?)),
            (None, Some(path)) => Some(ImageSource::Path(path)),
            (None, None) => None,
        };

        let profile = services(ctx)?
            .profile_service
            .upsert(viewer_id(ctx)?, UpdateProfileInput { bio, profile_pic })
            .await
            .extend()?;
        Ok(ProfileType(profile))
    }

    /// Replace the viewer's avatar with a stored path or an upload.
    #[graphql(guard = "AuthGuard")]
    async fn set_avatar(
        &self,
        ctx: &Context<'_>,
        profile_pic: Option<String>,
        avatar: Option<Upload>,
    ) -> Result<ProfileType> {
        let source = image_source(ctx, profile_pic, avatar.as_ref())?;
        let profile = services(ctx)?
            .profile_service
            .set_avatar(viewer_id(ctx)?, source)
            .await
            .extend()?;
        Ok(ProfileType(profile))
    }

    /// Delete the viewer's account and everything they created.
    #[graphql(guard = "AuthGuard")]
    async fn delete_account(&self, ctx: &Context<'_>) -> Result<bool> {
        services(ctx)?
            .user_service
            .delete(viewer_id(ctx)?)
            .await
            .extend()?;
        Ok(true)
    }
}
