//! Image handling for posts, stories and avatars.

use std::sync::Arc;

use snapfeed_common::{AppError, AppResult, StorageBackend, StorageCategory, generate_storage_key};

/// An image uploaded with the request.
#[derive(Debug, Clone)]
pub struct NewUpload {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Where an entity's image comes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// An already stored path, kept as given.
    Path(String),
    /// Bytes to write to storage first.
    Upload(NewUpload),
}

/// Writes uploaded images to the configured storage backend.
#[derive(Clone)]
pub struct MediaStore {
    storage: Arc<dyn StorageBackend>,
}

impl MediaStore {
    /// Create a new media store.
    #[must_use]
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self { storage }
    }

    /// Resolve an image source to the path stored on the entity.
    ///
    /// Uploads are written before the caller persists anything; the blob
    /// stays behind if that later write fails.
    pub async fn store(
        &self,
        actor_id: i64,
        category: StorageCategory,
        source: ImageSource,
    ) -> AppResult<String> {
        match source {
            ImageSource::Path(path) => {
                let path = path.trim();
                if path.is_empty() {
                    return Err(AppError::BadRequest("An image is required".to_string()));
                }
                Ok(path.to_string())
            }
            ImageSource::Upload(upload) => {
                if upload.data.is_empty() {
                    return Err(AppError::BadRequest("Uploaded image is empty".to_string()));
                }

                let key = generate_storage_key(category, actor_id, &upload.filename);
                let stored = self
                    .storage
                    .upload(&key, &upload.data, &upload.content_type)
                    .await?;

                tracing::debug!(user_id = actor_id, key = %stored.key, size = stored.size, "Stored image");

                Ok(stored.url)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use snapfeed_common::LocalStorage;

    fn media_store(root: &std::path::Path) -> MediaStore {
        MediaStore::new(Arc::new(LocalStorage::new(
            root.to_path_buf(),
            "/media".to_string(),
        )))
    }

    #[tokio::test]
    async fn test_path_is_kept() {
        let store = media_store(&std::env::temp_dir());
        let path = store
            .store(1, StorageCategory::Posts, ImageSource::Path("posts/a.jpg".to_string()))
            .await
            .unwrap();

        assert_eq!(path, "posts/a.jpg");
    }

    #[tokio::test]
    async fn test_blank_path_rejected() {
        let store = media_store(&std::env::temp_dir());
        let result = store
            .store(1, StorageCategory::Stories, ImageSource::Path("  ".to_string()))
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_upload_is_written() {
        let root = std::env::temp_dir().join(format!("snapfeed-media-{}", unique_suffix()));
        let store = media_store(&root);

        let url = store
            .store(
                7,
                StorageCategory::ProfilePics,
                ImageSource::Upload(NewUpload {
                    filename: "me.png".to_string(),
                    content_type: "image/png".to_string(),
                    data: b"png".to_vec(),
                }),
            )
            .await
            .unwrap();

        assert!(url.starts_with("/media/profile_pics/"));
        assert!(url.ends_with(".png"));

        tokio::fs::remove_dir_all(root).await.ok();
    }

    fn unique_suffix() -> i64 {
        chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
    }
}
