//! Blob storage for uploaded images.
//!
//! Blobs are addressed by date-partitioned keys such as
//! `community/images/2024/05/01/3f2a...e1.jpg`. The public URL of a blob is
//! the configured base URL followed by its key.

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use std::path::{Component, Path, PathBuf};

use crate::config::UploadConfig;

/// Key prefix for images attached to memories.
pub const COMMUNITY_IMAGES: &str = "community/images";

/// Key prefix for user profile images.
pub const USER_PROFILES: &str = "users/profiles";

#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("upload of {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },

    #[error("unsupported content type: {0}")]
    UnsupportedType(String),

    #[error("invalid blob key: {0}")]
    InvalidKey(String),

    #[error("blob I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A validated upload waiting to be stored.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Where a stored blob ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub key: String,
    pub url: String,
    pub name: String,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Validate and store an upload under a fresh key below `prefix`.
    async fn put(&self, prefix: &str, upload: Upload) -> Result<StoredBlob, BlobError>;

    /// Delete a blob. A missing blob is not an error.
    async fn delete(&self, key: &str) -> Result<(), BlobError>;

    async fn exists(&self, key: &str) -> Result<bool, BlobError>;

    fn url_for(&self, key: &str) -> String;

    fn key_from_url(&self, url: &str) -> Option<String>;
}

/// Stores blobs as files below the upload directory.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    public_base_url: String,
    max_bytes: usize,
    allowed_content_types: Vec<String>,
}

impl LocalBlobStore {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            root: config.dir.clone(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
            max_bytes: config.max_bytes,
            allowed_content_types: config.allowed_content_types.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check size and content type of an upload.
    pub fn validate(&self, upload: &Upload) -> Result<(), BlobError> {
        if upload.bytes.len() > self.max_bytes {
            return Err(BlobError::TooLarge {
                size: upload.bytes.len(),
                limit: self.max_bytes,
            });
        }
        let content_type = upload.content_type.to_ascii_lowercase();
        if !self.allowed_content_types.iter().any(|t| *t == content_type) {
            return Err(BlobError::UnsupportedType(upload.content_type.clone()));
        }
        Ok(())
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, BlobError> {
        let relative = Path::new(key);
        let safe = !key.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !safe {
            return Err(BlobError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, prefix: &str, upload: Upload) -> Result<StoredBlob, BlobError> {
        self.validate(&upload)?;

        let key = generate_key(prefix, &upload.content_type);
        let path = self.path_for(&key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &upload.bytes).await?;

        tracing::debug!(key = %key, bytes = upload.bytes.len(), "Stored blob");

        Ok(StoredBlob {
            url: self.url_for(&key),
            key,
            name: upload.file_name,
        })
    }

    async fn delete(&self, key: &str) -> Result<(), BlobError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(key, "Deleted blob");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(key, "Blob already gone");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool, BlobError> {
        let path = self.path_for(key)?;
        Ok(tokio::fs::try_exists(&path).await?)
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key.trim_start_matches('/'))
    }

    fn key_from_url(&self, url: &str) -> Option<String> {
        let path = url
            .strip_prefix(self.public_base_url.as_str())
            .unwrap_or(url)
            .trim_start_matches('/');
        if path.is_empty() {
            return None;
        }
        Some(percent_decode(path))
    }
}

/// Build `{prefix}/{YYYY}/{MM}/{DD}/{uuid}{ext}` for an upload.
pub fn generate_key(prefix: &str, content_type: &str) -> String {
    let now = Utc::now();
    format!(
        "{}/{:04}/{:02}/{:02}/{}{}",
        prefix.trim_matches('/'),
        now.year(),
        now.month(),
        now.day(),
        uuid::Uuid::new_v4().simple(),
        extension_for(content_type)
    )
}

/// File extension for a validated content type. The client's file name
/// never picks the extension.
fn extension_for(content_type: &str) -> &'static str {
    match content_type.to_ascii_lowercase().as_str() {
        "image/jpeg" => ".jpg",
        "image/png" => ".png",
        "image/webp" => ".webp",
        _ => "",
    }
}

fn percent_decode(path: &str) -> String {
    // form decoding turns '+' into a space, keys keep it literal
    let escaped = path.replace('+', "%2B");
    url::form_urlencoded::parse(format!("k={escaped}").as_bytes())
        .next()
        .map(|(_, value)| value.into_owned())
        .unwrap_or_else(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &Path) -> LocalBlobStore {
        LocalBlobStore::new(&UploadConfig {
            dir: dir.to_path_buf(),
            public_base_url: "/media/".to_string(),
            max_bytes: 16,
            ..UploadConfig::default()
        })
    }

    fn upload(name: &str, content_type: &str, size: usize) -> Upload {
        Upload {
            file_name: name.to_string(),
            content_type: content_type.to_string(),
            bytes: vec![7; size],
        }
    }

    #[test]
    fn keys_are_date_partitioned() {
        let key = generate_key(COMMUNITY_IMAGES, "image/jpeg");
        let parts: Vec<&str> = key.split('/').collect();
        assert_eq!(parts.len(), 6);
        assert_eq!(parts[0], "community");
        assert_eq!(parts[1], "images");
        assert_eq!(parts[2].len(), 4);
        assert_eq!(parts[3].len(), 2);
        assert_eq!(parts[4].len(), 2);
        assert!(parts[5].ends_with(".jpg"));
        assert_eq!(parts[5].len(), 32 + 4);
    }

    #[test]
    fn extension_follows_content_type() {
        assert_eq!(extension_for("image/webp"), ".webp");
        assert_eq!(extension_for("IMAGE/PNG"), ".png");
        assert_eq!(extension_for("application/octet-stream"), "");
    }

    #[tokio::test]
    async fn file_name_does_not_pick_the_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        let stored = store
            .put(COMMUNITY_IMAGES, upload("x.html", "image/png", 8))
            .await
            .unwrap();
        assert!(stored.key.ends_with(".png"));
        assert!(stored.url.ends_with(".png"));
        assert_eq!(stored.name, "x.html");

        let stored = store
            .put(COMMUNITY_IMAGES, upload("photo.png", "image/jpeg", 8))
            .await
            .unwrap();
        assert!(stored.key.ends_with(".jpg"));
    }

    #[tokio::test]
    async fn put_and_delete_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        let stored = store
            .put(USER_PROFILES, upload("me.png", "image/png", 8))
            .await
            .unwrap();
        assert!(stored.url.starts_with("/media/users/profiles/"));
        assert!(store.exists(&stored.key).await.unwrap());
        assert_eq!(store.key_from_url(&stored.url), Some(stored.key.clone()));

        store.delete(&stored.key).await.unwrap();
        assert!(!store.exists(&stored.key).await.unwrap());
        // deleting twice is fine
        store.delete(&stored.key).await.unwrap();
    }

    #[tokio::test]
    async fn rejects_large_and_unsupported_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        let err = store
            .put(COMMUNITY_IMAGES, upload("big.jpg", "image/jpeg", 17))
            .await
            .unwrap_err();
        assert!(matches!(err, BlobError::TooLarge { size: 17, limit: 16 }));

        let err = store
            .put(COMMUNITY_IMAGES, upload("anim.gif", "image/gif", 4))
            .await
            .unwrap_err();
        assert!(matches!(err, BlobError::UnsupportedType(_)));
    }

    #[tokio::test]
    async fn rejects_keys_escaping_the_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        assert!(matches!(
            store.delete("../etc/passwd").await,
            Err(BlobError::InvalidKey(_))
        ));
        assert!(matches!(store.delete("/abs").await, Err(BlobError::InvalidKey(_))));
    }

    #[test]
    fn key_from_url_decodes_and_strips_base() {
        let store = store(Path::new("/tmp/unused"));
        assert_eq!(
            store.key_from_url("/media/community/images/a%20b.jpg"),
            Some("community/images/a b.jpg".to_string())
        );
        assert_eq!(
            store.key_from_url("/users/profiles/x+y.png"),
            Some("users/profiles/x+y.png".to_string())
        );
        assert_eq!(store.key_from_url("/media/"), None);
    }
}
