//! Posts, stories, likes, saves and hashtags.

use async_graphql::{Context, Object, Result, ResultExt, Upload, ID};
use snapfeed_core::{CreatePostInput, UpdatePostInput};

use super::guard::AuthGuard;
use super::types::{HashtagType, PostSaveType, PostType, StoryType, TogglePayload};
use super::{image_source, page_limit, parse_id, parse_opt_id, services, viewer_id};

#[derive(Default)]
pub struct ContentQuery;

#[Object]
impl ContentQuery {
    #[graphql(guard = "AuthGuard")]
    async fn posts(
        &self,
        ctx: &Context<'_>,
        limit: Option<i32>,
        until_id: Option<ID>,
    ) -> Result<Vec<PostType>> {
        let posts = services(ctx)?
            .post_service
            .list(page_limit(limit), parse_opt_id(until_id.as_ref())?)
            .await
            .extend()?;
        Ok(posts.into_iter().map(PostType).collect())
    }

    #[graphql(guard = "AuthGuard")]
    async fn post(&self, ctx: &Context<'_>, id: ID) -> Result<Option<PostType>> {
        let post = services(ctx)?
            .post_service
            .find(parse_id(&id)?)
            .await
            .extend()?;
        Ok(post.map(PostType))
    }

    #[graphql(guard = "AuthGuard")]
    async fn stories(
        &self,
        ctx: &Context<'_>,
        limit: Option<i32>,
        until_id: Option<ID>,
    ) -> Result<Vec<StoryType>> {
        let stories = services(ctx)?
            .story_service
            .list(page_limit(limit), parse_opt_id(until_id.as_ref())?)
            .await
            .extend()?;
        Ok(stories.into_iter().map(StoryType).collect())
    }

    #[graphql(guard = "AuthGuard")]
    async fn story(&self, ctx: &Context<'_>, id: ID) -> Result<Option<StoryType>> {
        let story = services(ctx)?
            .story_service
            .find(parse_id(&id)?)
            .await
            .extend()?;
        Ok(story.map(StoryType))
    }

    #[graphql(guard = "AuthGuard")]
    async fn hashtags(
        &self,
        ctx: &Context<'_>,
        limit: Option<i32>,
        prefix: Option<String>,
    ) -> Result<Vec<HashtagType>> {
        let service = &services(ctx)?.hashtag_service;
        let tags = match prefix {
            Some(prefix) => service.search(&prefix, page_limit(limit)).await,
            None => service.list(page_limit(limit)).await,
        }
        .extend()?;
        Ok(tags.into_iter().map(HashtagType).collect())
    }

    #[graphql(guard = "AuthGuard")]
    async fn hashtag(&self, ctx: &Context<'_>, name: String) -> Result<HashtagType> {
        let tag = services(ctx)?
            .hashtag_service
            .get(&name)
            .await
            .extend()?;
        Ok(HashtagType(tag))
    }

    /// The viewer's saved posts.
    #[graphql(guard = "AuthGuard")]
    async fn post_saves(
        &self,
        ctx: &Context<'_>,
        limit: Option<i32>,
        until_id: Option<ID>,
    ) -> Result<Vec<PostSaveType>> {
        let saves = services(ctx)?
            .post_save_service
            .list(
                viewer_id(ctx)?,
                page_limit(limit),
                parse_opt_id(until_id.as_ref())?,
            )
            .await
            .extend()?;
        Ok(saves.into_iter().map(PostSaveType).collect())
    }
}

#[derive(Default)]
pub struct ContentMutation;

#[Object]
impl ContentMutation {
    /// Create a post from a stored image path or an uploaded file.
    #[graphql(guard = "AuthGuard")]
    async fn create_post(
        &self,
        ctx: &Context<'_>,
        caption: String,
        image: Option<String>,
        file: Option<Upload>,
    ) -> Result<PostType> {
        let input = CreatePostInput {
            caption,
            image: image_source(ctx, image, file.as_ref())?,
        };

        let post = services(ctx)?
            .post_service
            .create(viewer_id(ctx)?, input)
            .await
            .extend()?;
        Ok(PostType(post))
    }

    #[graphql(guard = "AuthGuard")]
    async fn update_post(&self, ctx: &Context<'_>, id: ID, caption: String) -> Result<PostType> {
        let post = services(ctx)?
            .post_service
            .update_caption(viewer_id(ctx)?, parse_id(&id)?, UpdatePostInput { caption })
            .await
            .extend()?;
        Ok(PostType(post))
    }

    #[graphql(guard = "AuthGuard")]
    async fn delete_post(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        services(ctx)?
            .post_service
            .delete(viewer_id(ctx)?, parse_id(&id)?)
            .await
            .extend()?;
        Ok(true)
    }

    #[graphql(guard = "AuthGuard")]
    async fn create_story(
        &self,
        ctx: &Context<'_>,
        image: Option<String>,
        file: Option<Upload>,
    ) -> Result<StoryType> {
        let source = image_source(ctx, image, file.as_ref())?;
        let story = services(ctx)?
            .story_service
            .create(viewer_id(ctx)?, source)
            .await
            .extend()?;
        Ok(StoryType(story))
    }

    /// Record the viewer as having seen a story.
    #[graphql(guard = "AuthGuard")]
    async fn view_story(&self, ctx: &Context<'_>, id: ID) -> Result<StoryType> {
        let story_id = parse_id(&id)?;
        let service = &services(ctx)?.story_service;

        service.view(viewer_id(ctx)?, story_id).await.extend()?;
        let story = service.get(story_id).await.extend()?;
        Ok(StoryType(story))
    }

    #[graphql(guard = "AuthGuard")]
    async fn delete_story(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        services(ctx)?
            .story_service
            .delete(viewer_id(ctx)?, parse_id(&id)?)
            .await
            .extend()?;
        Ok(true)
    }

    /// Like a post, or remove the like if already liked.
    #[graphql(guard = "AuthGuard")]
    async fn toggle_like(&self, ctx: &Context<'_>, post_id: ID) -> Result<TogglePayload> {
        let result = services(ctx)?
            .like_service
            .toggle(viewer_id(ctx)?, parse_id(&post_id)?)
            .await
            .extend()?;
        Ok(result.into())
    }

    #[graphql(guard = "AuthGuard")]
    async fn save_post(&self, ctx: &Context<'_>, post_id: ID) -> Result<PostSaveType> {
        let saved = services(ctx)?
            .post_save_service
            .save(viewer_id(ctx)?, parse_id(&post_id)?)
            .await
            .extend()?;
        Ok(PostSaveType(saved))
    }

    /// Returns whether a save was removed.
    #[graphql(guard = "AuthGuard")]
    async fn unsave_post(&self, ctx: &Context<'_>, post_id: ID) -> Result<bool> {
        services(ctx)?
            .post_save_service
            .unsave(viewer_id(ctx)?, parse_id(&post_id)?)
            .await
            .extend()
    }

    #[graphql(guard = "AuthGuard")]
    async fn create_hashtag(&self, ctx: &Context<'_>, name: String) -> Result<HashtagType> {
        let tag = services(ctx)?
            .hashtag_service
            .get_or_create(&name)
            .await
            .extend()?;
        Ok(HashtagType(tag))
    }

    #[graphql(guard = "AuthGuard")]
    async fn tag_post(&self, ctx: &Context<'_>, post_id: ID, name: String) -> Result<HashtagType> {
        let tag = services(ctx)?
            .hashtag_service
            .tag_post(viewer_id(ctx)?, parse_id(&post_id)?, &name)
            .await
            .extend()?;
        Ok(HashtagType(tag))
    }
}
