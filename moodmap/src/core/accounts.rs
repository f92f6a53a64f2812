//! Registration, profiles and the per-user page.

use lazy_static::lazy_static;
use regex::Regex;

use super::{Moodmap, conflict};
use crate::blob::{self, Upload};
use crate::models::{MyPage, NewUser, PublicProfile, User, UserRole, UserUpdate};
use crate::storage::MemoryFilter;
use crate::{MoodmapError, Result};

const MAX_NICKNAME_CHARS: usize = 255;
const MAX_DETAIL_CHARS: usize = 255;

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap();
}

/// Lowercase the domain part of an email address.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// Changes a user may make to their own profile.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub nickname: Option<String>,
    pub detail: Option<String>,
}

pub struct Accounts<'a> {
    app: &'a Moodmap,
}

impl<'a> Accounts<'a> {
    pub(crate) fn new(app: &'a Moodmap) -> Self {
        Self { app }
    }

    pub fn validate_email(&self, email: &str) -> Result<()> {
        if EMAIL_REGEX.is_match(email.trim()) {
            Ok(())
        } else {
            Err(MoodmapError::Validation(format!("invalid email address: {}", email)))
        }
    }

    pub fn validate_password(&self, password: &str) -> Result<()> {
        let min = self.app.config.community.min_password_length;
        if password.chars().count() < min {
            return Err(MoodmapError::Validation(format!(
                "password must be at least {} characters",
                min
            )));
        }
        Ok(())
    }

    fn validate_nickname(&self, nickname: &str) -> Result<String> {
        let nickname = nickname.trim();
        if nickname.is_empty() {
            return Err(MoodmapError::Validation("nickname is required".to_string()));
        }
        if nickname.chars().count() > MAX_NICKNAME_CHARS {
            return Err(MoodmapError::Validation(format!(
                "nickname must be at most {} characters",
                MAX_NICKNAME_CHARS
            )));
        }
        Ok(nickname.to_string())
    }

    pub async fn is_email_available(&self, email: &str) -> Result<bool> {
        self.validate_email(email)?;
        let email = normalize_email(email);
        Ok(self.app.storage.get_user_by_email(&email).await?.is_none())
    }

    pub async fn is_nickname_available(&self, nickname: &str) -> Result<bool> {
        let nickname = self.validate_nickname(nickname)?;
        Ok(self.app.storage.get_user_by_nickname(&nickname).await?.is_none())
    }

    /// Create an account. The password must already be hashed.
    pub async fn register(
        &self,
        email: &str,
        nickname: &str,
        password_hash: &str,
        detail: Option<&str>,
    ) -> Result<User> {
        self.validate_email(email)?;
        let nickname = self.validate_nickname(nickname)?;
        let detail = detail.unwrap_or_default().trim().to_string();
        if detail.chars().count() > MAX_DETAIL_CHARS {
            return Err(MoodmapError::Validation(format!(
                "detail must be at most {} characters",
                MAX_DETAIL_CHARS
            )));
        }

        let user = self
            .app
            .storage
            .create_user(NewUser {
                email: normalize_email(email),
                nickname,
                password_hash: password_hash.to_string(),
                detail,
                role: UserRole::User,
            })
            .await
            .map_err(conflict)?;

        tracing::info!(user_id = %user.id, "Registered user");
        Ok(user)
    }

    pub async fn get_user(&self, id: &str) -> Result<User> {
        self.app
            .storage
            .get_user(id)
            .await?
            .ok_or_else(|| MoodmapError::NotFound(format!("user {}", id)))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.app.storage.get_user_by_email(&normalize_email(email)).await?)
    }

    pub async fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> Result<User> {
        let mut patch = UserUpdate::default();
        if let Some(nickname) = update.nickname {
            patch.nickname = Some(self.validate_nickname(&nickname)?);
        }
        if let Some(detail) = update.detail {
            let detail = detail.trim().to_string();
            if detail.chars().count() > MAX_DETAIL_CHARS {
                return Err(MoodmapError::Validation(format!(
                    "detail must be at most {} characters",
                    MAX_DETAIL_CHARS
                )));
            }
            patch.detail = Some(detail);
        }

        if patch.is_empty() {
            return self.get_user(user_id).await;
        }
        self.app
            .storage
            .update_user(user_id, patch)
            .await
            .map_err(conflict)
    }

    pub async fn set_password_hash(&self, user_id: &str, password_hash: &str) -> Result<User> {
        let patch = UserUpdate {
            password_hash: Some(password_hash.to_string()),
            ..UserUpdate::default()
        };
        Ok(self.app.storage.update_user(user_id, patch).await?)
    }

    /// Replace the profile image. The previous blob is removed.
    pub async fn set_profile_image(&self, user_id: &str, upload: Upload) -> Result<User> {
        let user = self.get_user(user_id).await?;
        let stored = self.app.blobs.put(blob::USER_PROFILES, upload).await?;

        let patch = UserUpdate {
            profile_image_url: Some(stored.url.clone()),
            ..UserUpdate::default()
        };
        let updated = match self.app.storage.update_user(user_id, patch).await {
            Ok(updated) => updated,
            Err(e) => {
                self.remove_blob(&stored.key).await;
                return Err(e.into());
            }
        };

        if let Some(old_url) = user.profile_image_url.as_deref()
            && let Some(key) = self.app.blobs.key_from_url(old_url)
        {
            self.remove_blob(&key).await;
        }
        Ok(updated)
    }

    /// Delete an account with everything it owns, including uploaded blobs.
    pub async fn delete_account(&self, user_id: &str) -> Result<()> {
        let user = self.get_user(user_id).await?;

        let filter = MemoryFilter {
            user_id: Some(user_id.to_string()),
            ..MemoryFilter::default()
        };
        let memories = self.app.storage.list_memories(&filter, None, None).await?;
        let mut keys = Vec::new();
        for memory in &memories {
            for image in self.app.storage.list_images(&memory.id).await? {
                keys.push(image.image_key);
            }
        }
        if let Some(key) = user
            .profile_image_url
            .as_deref()
            .and_then(|url| self.app.blobs.key_from_url(url))
        {
            keys.push(key);
        }

        self.app.storage.delete_user(user_id).await?;
        for key in keys {
            self.remove_blob(&key).await;
        }

        tracing::info!(user_id, "Deleted user");
        Ok(())
    }

    /// Public page of a user with bookmarks and saved places.
    pub async fn mypage(&self, user_id: &str) -> Result<MyPage> {
        let user = self.get_user(user_id).await?;

        let bookmarks = self.app.community().list_bookmarks(user_id).await?;
        let saved_places = self.app.places().list_saved(user_id).await?;

        Ok(MyPage {
            user: PublicProfile::from(&user),
            bookmarks,
            saved_places,
        })
    }

    async fn remove_blob(&self, key: &str) {
        if let Err(e) = self.app.blobs.delete(key).await {
            tracing::warn!(key, "Failed to delete blob: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_domain_is_lowercased() {
        assert_eq!(normalize_email(" Kim@Example.COM "), "Kim@example.com");
        assert_eq!(normalize_email("no-at-sign"), "no-at-sign");
    }

    #[test]
    fn email_pattern() {
        assert!(EMAIL_REGEX.is_match("a.b+c@example.co.kr"));
        assert!(!EMAIL_REGEX.is_match("a@b"));
        assert!(!EMAIL_REGEX.is_match("not an email"));
    }
}
