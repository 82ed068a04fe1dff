//! File storage for uploaded images.
//!
//! Uploads are written synchronously before the owning entity is created.
//! A blob whose entity later fails to persist is left in place.

use std::path::PathBuf;

use crate::config::StorageConfig;
use crate::{AppError, AppResult};

/// Stored file metadata.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Storage key (path relative to the storage root).
    pub key: String,
    /// Public URL to access the file.
    pub url: String,
    /// File size in bytes.
    pub size: u64,
    /// MIME content type as reported by the client.
    pub content_type: String,
    /// MD5 hash of the file.
    pub md5: String,
}

/// Folder an upload is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageCategory {
    /// Post images.
    Posts,
    /// Story images.
    Stories,
    /// Profile avatars.
    ProfilePics,
}

impl StorageCategory {
    /// Directory name for this category.
    #[must_use]
    pub const fn dir(self) -> &'static str {
        match self {
            Self::Posts => "posts",
            Self::Stories => "stories",
            Self::ProfilePics => "profile_pics",
        }
    }
}

/// Storage backend trait.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Upload a file.
    async fn upload(&self, key: &str, data: &[u8], content_type: &str) -> AppResult<StoredFile>;

    /// Get the public URL for a key.
    fn public_url(&self, key: &str) -> String;
}

/// Local filesystem storage backend.
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new local storage backend.
    #[must_use]
    pub const fn new(base_path: PathBuf, base_url: String) -> Self {
        Self {
            base_path,
            base_url,
        }
    }

    /// Create a local storage backend from configuration.
    #[must_use]
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.base_path.clone(), config.base_url.clone())
    }
}

#[async_trait::async_trait]
impl StorageBackend for LocalStorage {
    async fn upload(&self, key: &str, data: &[u8], content_type: &str) -> AppResult<StoredFile> {
        let path = self.base_path.join(key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to create directory: {e}")))?;
        }

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write file: {e}")))?;

        let md5 = format!("{:x}", md5::compute(data));

        tracing::debug!(key = %key, size = data.len(), "Stored file");

        Ok(StoredFile {
            key: key.to_string(),
            url: self.public_url(key),
            size: data.len() as u64,
            content_type: content_type.to_string(),
            md5,
        })
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

}

/// Generate a unique storage key for an upload.
///
/// Keys look like `posts/2025/01/31/42/1738281600000_<uuid>.jpg`.
#[must_use]
pub fn generate_storage_key(
    category: StorageCategory,
    user_id: i64,
    original_name: &str,
) -> String {
    use chrono::Utc;

    let now = Utc::now();
    let date_path = now.format("%Y/%m/%d").to_string();
    let timestamp = now.timestamp_millis();

    let extension = original_name
        .rfind('.')
        .filter(|&pos| pos > 0 && pos < original_name.len() - 1)
        .map(|pos| &original_name[pos + 1..])
        .filter(|ext| ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map_or_else(|| "bin".to_string(), str::to_lowercase);

    format!(
        "{}/{}/{}/{}_{}.{}",
        category.dir(),
        date_path,
        user_id,
        timestamp,
        uuid::Uuid::new_v4(),
        extension
    )
}
