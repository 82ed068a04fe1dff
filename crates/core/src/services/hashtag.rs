//! Hashtag service.

use serde::Deserialize;
use snapfeed_common::{AppError, AppResult};
use snapfeed_db::{
    entities::{hashtag, post},
    repositories::{HashtagRepository, PostRepository},
};
use validator::Validate;

/// Hashtag service for business logic.
#[derive(Clone)]
pub struct HashtagService {
    hashtag_repo: HashtagRepository,
    post_repo: PostRepository,
}

/// Input for creating a hashtag. A leading `#` is accepted and dropped.
#[derive(Debug, Deserialize, Validate)]
pub struct HashtagInput {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
}

impl HashtagInput {
    fn normalized(name: &str) -> AppResult<String> {
        let input = Self {
            name: name.trim().trim_start_matches('#').to_lowercase(),
        };
        input.validate()?;
        Ok(input.name)
    }
}

impl HashtagService {
    /// Create a new hashtag service.
    #[must_use]
    pub const fn new(hashtag_repo: HashtagRepository, post_repo: PostRepository) -> Self {
        Self {
            hashtag_repo,
            post_repo,
        }
    }

    /// Get the hashtag with this name, creating it on first use.
    pub async fn get_or_create(&self, name: &str) -> AppResult<hashtag::Model> {
        let name = HashtagInput::normalized(name)?;
        self.hashtag_repo.get_or_create(&name).await
    }

    pub async fn get(&self, name: &str) -> AppResult<hashtag::Model> {
        let name = HashtagInput::normalized(name)?;
        self.hashtag_repo
            .find_by_name(&name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Hashtag #{name}")))
    }

    /// List hashtags alphabetically.
    pub async fn list(&self, limit: u64) -> AppResult<Vec<hashtag::Model>> {
        self.hashtag_repo.find_all(limit).await
    }

    pub async fn search(&self, prefix: &str, limit: u64) -> AppResult<Vec<hashtag::Model>> {
        self.hashtag_repo
            .search(prefix.trim().trim_start_matches('#'), limit)
            .await
    }

    /// Posts carrying a hashtag, newest first.
    pub async fn posts_for(
        &self,
        name: &str,
        limit: u64,
        until_id: Option<i64>,
    ) -> AppResult<Vec<post::Model>> {
        let tag = self.get(name).await?;
        let post_ids = self
            .hashtag_repo
            .find_post_ids(tag.id, limit, until_id)
            .await?;
        self.post_repo.find_by_ids(&post_ids).await
    }

    /// Posts carrying a hashtag, looked up by its ID.
    pub async fn posts_for_id(
        &self,
        hashtag_id: i64,
        limit: u64,
        until_id: Option<i64>,
    ) -> AppResult<Vec<post::Model>> {
        let post_ids = self
            .hashtag_repo
            .find_post_ids(hashtag_id, limit, until_id)
            .await?;
        self.post_repo.find_by_ids(&post_ids).await
    }

    pub async fn for_post(&self, post_id: i64) -> AppResult<Vec<hashtag::Model>> {
        self.hashtag_repo.find_by_post(post_id).await
    }

    /// Attach a hashtag to a post. Only the post's creator may tag it.
    pub async fn tag_post(
        &self,
        actor_id: i64,
        post_id: i64,
        name: &str,
    ) -> AppResult<hashtag::Model> {
        let post = self.post_repo.get_by_id(post_id).await?;
        if post.created_by != actor_id {
            return Err(AppError::Forbidden(
                "Only the creator can tag this post".to_string(),
            ));
        }

        let tag = self.get_or_create(name).await?;
        self.hashtag_repo.link_post(post.id, tag.id).await?;

        tracing::debug!(post_id, hashtag = %tag.name, "Tagged post");
        Ok(tag)
    }

    /// Bring a post's caption hashtags in line with a new caption.
    ///
    /// Tags that were in `previous` but not in `caption` are unlinked; tags
    /// in `caption` are linked. Links added with [`Self::tag_post`] for tags
    /// that never appeared in the previous caption are left alone. Words
    /// that are not valid tag names are skipped.
    pub async fn sync_caption(
        &self,
        post_id: i64,
        previous: Option<&str>,
        caption: &str,
    ) -> AppResult<Vec<hashtag::Model>> {
        let current = caption_tags(caption);
        let dropped: Vec<String> = previous
            .map(caption_tags)
            .unwrap_or_default()
            .into_iter()
            .filter(|name| !current.contains(name))
            .collect();

        if !dropped.is_empty() {
            let ids: Vec<i64> = self
                .hashtag_repo
                .find_by_names(&dropped)
                .await?
                .into_iter()
                .map(|tag| tag.id)
                .collect();
            self.hashtag_repo.unlink_hashtags(post_id, &ids).await?;
        }

        let mut tags = Vec::with_capacity(current.len());
        for name in current {
            let tag = self.hashtag_repo.get_or_create(&name).await?;
            self.hashtag_repo.link_post(post_id, tag.id).await?;
            tags.push(tag);
        }

        tracing::debug!(
            post_id,
            linked = tags.len(),
            unlinked = dropped.len(),
            "Synced caption hashtags"
        );
        Ok(tags)
    }
}

/// Valid, normalized tag names in a caption.
fn caption_tags(caption: &str) -> Vec<String> {
    extract_hashtags(caption)
        .iter()
        .filter_map(|name| HashtagInput::normalized(name).ok())
        .collect()
}

/// Extract #hashtags from text, lowercased and deduplicated.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for word in text.split_whitespace() {
        if let Some(tag) = word.strip_prefix('#') {
            let tag = tag
                .trim_end_matches(|c: char| !c.is_alphanumeric() && c != '_')
                .to_lowercase();
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }
    }
    tags
}
