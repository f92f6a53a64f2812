//! User accounts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::User => write!(f, "user"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

/// A registered user.
///
/// `detail` is the short taste-profile phrase regenerated from the places the
/// user saved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub nickname: String,
    #[serde(default)]
    pub detail: String,
    pub password_hash: String,
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to register a user. The password is already hashed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub nickname: String,
    pub password_hash: String,
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub role: UserRole,
}

/// Partial update of a user; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.nickname.is_none()
            && self.detail.is_none()
            && self.password_hash.is_none()
            && self.profile_image_url.is_none()
            && self.role.is_none()
    }
}

/// What other users may see of an account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublicProfile {
    pub id: String,
    pub nickname: String,
    pub detail: String,
    pub profile_image_url: Option<String>,
}

impl From<&User> for PublicProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            nickname: user.nickname.clone(),
            detail: user.detail.clone(),
            profile_image_url: user.profile_image_url.clone(),
        }
    }
}

/// A user's page: profile, bookmarks and saved places.
#[derive(Debug, Clone, Serialize)]
pub struct MyPage {
    pub user: PublicProfile,
    pub bookmarks: Vec<super::BookmarkView>,
    pub saved_places: Vec<super::SavedPlaceView>,
}
