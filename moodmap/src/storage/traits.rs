//! Trait definitions for moodmap storage

use async_trait::async_trait;
use std::fmt::Debug;

use crate::models::{
    AiSummary, Bookmark, Comment, Image, InferenceRecommendation, InferenceSession, Memory,
    MemoryUpdate, NewMemory, NewPlace, NewUser, Place, PlaceStatus, RecKind, SavedPlace, Tag,
    TagKind, User, UserUpdate,
};
use crate::storage::errors::StorageError;
use crate::storage::filters::{MemoryFilter, PlaceFilter};

type Result<T> = std::result::Result<T, StorageError>;

/// Base trait for all storage implementations
#[async_trait]
pub trait BaseStore: Send + Sync + 'static + Debug {
    /// Check if the store is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get metadata about the store (engine, record counts)
    async fn get_metadata(&self) -> Result<serde_json::Value>;
}

/// User accounts. Email and nickname are unique.
#[async_trait]
pub trait UserStore: BaseStore {
    async fn create_user(&self, user: NewUser) -> Result<User>;

    async fn get_user(&self, id: &str) -> Result<Option<User>>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn get_user_by_nickname(&self, nickname: &str) -> Result<Option<User>>;

    async fn update_user(&self, id: &str, update: UserUpdate) -> Result<User>;

    /// Delete a user together with everything they own
    async fn delete_user(&self, id: &str) -> Result<bool>;
}

/// Emotion and location tags. Names are unique per kind.
#[async_trait]
pub trait TagStore: BaseStore {
    /// Create a tag. Without an explicit id the next numeric id is used.
    async fn create_tag(&self, kind: TagKind, id: Option<String>, name: &str) -> Result<Tag>;

    async fn get_tag(&self, kind: TagKind, id: &str) -> Result<Option<Tag>>;

    /// Fetch several tags, keeping the order of `ids` and skipping unknown ones
    async fn get_tags(&self, kind: TagKind, ids: &[String]) -> Result<Vec<Tag>>;

    async fn find_tag_by_name(&self, kind: TagKind, name: &str) -> Result<Option<Tag>>;

    /// All tags of a kind ordered by id
    async fn list_tags(&self, kind: TagKind) -> Result<Vec<Tag>>;

    async fn rename_tag(&self, kind: TagKind, id: &str, name: &str) -> Result<Tag>;

    /// Delete a tag.
    ///
    /// Emotions are pulled out of memory and place tag lists. Locations are
    /// cleared from memories, take their inference sessions with them, and
    /// cannot be deleted while a place still points at them.
    async fn delete_tag(&self, kind: TagKind, id: &str) -> Result<bool>;
}

/// Community posts and their images.
#[async_trait]
pub trait MemoryStore: BaseStore {
    async fn create_memory(&self, memory: NewMemory) -> Result<Memory>;

    async fn get_memory(&self, id: &str) -> Result<Option<Memory>>;

    async fn update_memory(&self, id: &str, update: MemoryUpdate) -> Result<Memory>;

    /// Delete a memory with its images, comments and bookmarks
    async fn delete_memory(&self, id: &str) -> Result<bool>;

    /// Newest first
    async fn list_memories(
        &self,
        filter: &MemoryFilter,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Memory>>;

    async fn count_memories(&self, filter: &MemoryFilter) -> Result<usize>;

    async fn add_image(
        &self,
        memory_id: &str,
        image_url: &str,
        image_key: &str,
        image_name: &str,
    ) -> Result<Image>;

    async fn get_image(&self, id: &str) -> Result<Option<Image>>;

    /// Images of a memory in upload order
    async fn list_images(&self, memory_id: &str) -> Result<Vec<Image>>;

    async fn delete_image(&self, id: &str) -> Result<bool>;
}

/// Bookmarks, one per user and memory.
#[async_trait]
pub trait BookmarkStore: BaseStore {
    async fn create_bookmark(&self, user_id: &str, memory_id: &str) -> Result<Bookmark>;

    async fn get_bookmark(&self, id: &str) -> Result<Option<Bookmark>>;

    async fn find_bookmark(&self, user_id: &str, memory_id: &str) -> Result<Option<Bookmark>>;

    /// Newest first
    async fn list_bookmarks(&self, user_id: &str) -> Result<Vec<Bookmark>>;

    async fn delete_bookmark(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait CommentStore: BaseStore {
    async fn create_comment(
        &self,
        memory_id: &str,
        user_id: &str,
        nickname: &str,
        content: &str,
    ) -> Result<Comment>;

    async fn get_comment(&self, id: &str) -> Result<Option<Comment>>;

    async fn update_comment(&self, id: &str, content: &str) -> Result<Comment>;

    async fn delete_comment(&self, id: &str) -> Result<bool>;

    /// Oldest first
    async fn list_comments(&self, memory_id: &str) -> Result<Vec<Comment>>;

    async fn count_comments(&self, memory_id: &str) -> Result<usize>;
}

/// Places and their AI summaries. The provider place id is unique.
#[async_trait]
pub trait PlaceStore: BaseStore {
    async fn create_place(&self, place: NewPlace) -> Result<Place>;

    async fn get_place(&self, id: &str) -> Result<Option<Place>>;

    async fn get_place_by_google_id(&self, google_place_id: &str) -> Result<Option<Place>>;

    async fn update_place_status(&self, id: &str, status: PlaceStatus) -> Result<Place>;

    async fn set_place_emotions(&self, id: &str, emotion_ids: Vec<String>) -> Result<Place>;

    /// Newest first
    async fn list_places(
        &self,
        filter: &PlaceFilter,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Place>>;

    async fn count_places(&self, filter: &PlaceFilter) -> Result<usize>;

    /// Delete a place with its summaries, saves and session entries
    async fn delete_place(&self, id: &str) -> Result<bool>;

    async fn add_summary(&self, place_id: &str, summary: &str) -> Result<AiSummary>;

    /// Most recently created summary
    async fn latest_summary(&self, place_id: &str) -> Result<Option<AiSummary>>;

    /// Newest first
    async fn list_summaries(&self, place_id: &str) -> Result<Vec<AiSummary>>;
}

/// Places saved by users, unique per (user, place, rec).
#[async_trait]
pub trait SavedPlaceStore: BaseStore {
    async fn create_saved_place(
        &self,
        user_id: &str,
        place_id: &str,
        rec: RecKind,
        summary_snapshot: &str,
    ) -> Result<SavedPlace>;

    async fn get_saved_place(&self, id: &str) -> Result<Option<SavedPlace>>;

    async fn find_saved_place(
        &self,
        user_id: &str,
        place_id: &str,
        rec: RecKind,
    ) -> Result<Option<SavedPlace>>;

    /// Newest first
    async fn list_saved_places(&self, user_id: &str) -> Result<Vec<SavedPlace>>;

    async fn delete_saved_place(&self, id: &str) -> Result<bool>;
}

/// Inference sessions and the places they recommended.
#[async_trait]
pub trait InferenceStore: BaseStore {
    async fn create_session(
        &self,
        user_id: Option<&str>,
        location_ids: Vec<String>,
        emotion_ids: Vec<String>,
        overall_recommendation: &str,
    ) -> Result<InferenceSession>;

    async fn get_session(&self, id: &str) -> Result<Option<InferenceSession>>;

    /// Sessions of a user, newest first
    async fn list_sessions(
        &self,
        user_id: &str,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<InferenceSession>>;

    async fn count_sessions(&self, user_id: &str) -> Result<usize>;

    async fn add_recommendation(
        &self,
        session_id: &str,
        place_id: &str,
        summary: &str,
        emotion_tags: Vec<String>,
        rank: u32,
    ) -> Result<InferenceRecommendation>;

    /// In rank order
    async fn list_recommendations(&self, session_id: &str) -> Result<Vec<InferenceRecommendation>>;
}

/// Everything the application needs from storage.
pub trait Store:
    UserStore
    + TagStore
    + MemoryStore
    + BookmarkStore
    + CommentStore
    + PlaceStore
    + SavedPlaceStore
    + InferenceStore
{
}

impl<T> Store for T where
    T: UserStore
        + TagStore
        + MemoryStore
        + BookmarkStore
        + CommentStore
        + PlaceStore
        + SavedPlaceStore
        + InferenceStore
{
}
