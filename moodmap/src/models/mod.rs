//! Domain models for users, community posts, places and recommendations

pub mod community;
pub mod inference;
pub mod place;
pub mod user;

pub use community::{
    Bookmark, BookmarkView, Comment, Emotion, Image, Location, Memory, MemoryUpdate, MemoryView,
    NewMemory, Page, Tag, TagKind, TagOptions,
};
pub use inference::{
    InferenceOutcome, InferenceRecommendation, InferenceSession, RecommendedPlace, SessionDetail,
    SessionEntry,
};
pub use place::{
    AiSummary, NewPlace, Place, PlaceStatus, PlaceView, RecKind, Review, SavedPlace, SavedPlaceView,
    StoreCard,
};
pub use user::{MyPage, NewUser, PublicProfile, User, UserRole, UserUpdate};

/// Generate a new record identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
