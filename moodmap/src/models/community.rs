//! Community posts ("memories") and everything hanging off them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which tag table a [`Tag`] lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    Emotion,
    Location,
}

impl TagKind {
    pub fn table(&self) -> &'static str {
        match self {
            TagKind::Emotion => "emotion",
            TagKind::Location => "location",
        }
    }
}

impl std::fmt::Display for TagKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table())
    }
}

/// A named tag. Emotions and locations share the same shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Tag {
    pub id: String,
    pub name: String,
}

pub type Emotion = Tag;
pub type Location = Tag;

/// Emotions and locations offered to clients, both ordered by id.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TagOptions {
    pub emotions: Vec<Emotion>,
    pub locations: Vec<Location>,
}

/// A user post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Memory {
    pub id: String,
    pub user_id: String,
    pub content: String,
    #[serde(default)]
    pub emotion_ids: Vec<String>,
    pub location_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMemory {
    pub user_id: String,
    pub content: String,
    pub emotion_ids: Vec<String>,
    pub location_id: Option<String>,
}

/// Partial update of a memory.
///
/// `location_id: Some(None)` clears the location.
#[derive(Debug, Clone, Default)]
pub struct MemoryUpdate {
    pub content: Option<String>,
    pub emotion_ids: Option<Vec<String>>,
    pub location_id: Option<Option<String>>,
}

/// A memory with its tags, author nickname and images resolved.
#[derive(Debug, Clone, Serialize)]
pub struct MemoryView {
    pub memory: Memory,
    pub nickname: String,
    pub emotions: Vec<Emotion>,
    pub location: Option<Location>,
    pub images: Vec<Image>,
}

/// An image attached to a memory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Image {
    pub id: String,
    pub memory_id: String,
    pub image_url: String,
    /// Blob store key the URL was built from
    pub image_key: String,
    pub image_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bookmark {
    pub id: String,
    pub user_id: String,
    pub memory_id: String,
    pub created_at: DateTime<Utc>,
}

/// A bookmark with a preview of the bookmarked memory.
#[derive(Debug, Clone, Serialize)]
pub struct BookmarkView {
    pub bookmark: Bookmark,
    pub memory_content: String,
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: String,
    pub memory_id: String,
    pub user_id: String,
    /// Author nickname at the time of writing
    pub nickname: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One page of results.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub size: usize,
}
