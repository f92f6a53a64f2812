//! Filter types for storage queries

use serde::{Deserialize, Serialize};

use crate::models::PlaceStatus;

/// Filter for memory listings. All set fields must match.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MemoryFilter {
    /// Author
    pub user_id: Option<String>,

    /// Memories tagged with this emotion
    pub emotion_id: Option<String>,

    pub location_id: Option<String>,
}

/// Filter for place listings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlaceFilter {
    pub location_id: Option<String>,

    /// Places tagged with this emotion
    pub emotion_id: Option<String>,

    pub status: Option<PlaceStatus>,

    /// Case-sensitive substring of the place name
    pub name_contains: Option<String>,
}
