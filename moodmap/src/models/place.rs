//! Recommended venues, their AI summaries and per-user saved places

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Business status of a place.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlaceStatus {
    #[default]
    Operating,
    Closed,
    Moved,
}

impl PlaceStatus {
    /// Map a places provider `business_status` value.
    ///
    /// Temporary closures still count as operating; only a permanent
    /// closure marks the place closed. Moves are never reported by the
    /// provider and are set by hand.
    pub fn from_business_status(status: Option<&str>) -> Self {
        match status {
            Some("CLOSED_PERMANENTLY") => PlaceStatus::Closed,
            _ => PlaceStatus::Operating,
        }
    }

    /// Label shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            PlaceStatus::Operating => "운영중",
            PlaceStatus::Closed => "폐업함",
            PlaceStatus::Moved => "이전함",
        }
    }
}

impl std::str::FromStr for PlaceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "operating" | "운영중" => Ok(PlaceStatus::Operating),
            "closed" | "폐업함" => Ok(PlaceStatus::Closed),
            "moved" | "이전함" => Ok(PlaceStatus::Moved),
            other => Err(format!("Invalid place status: {}", other)),
        }
    }
}

/// Why a place was recommended. Serialized as `1` or `2`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub enum RecKind {
    /// Similar to a store that closed
    Similar,
    /// Picked by an inference session from locations and emotions
    Inference,
}

impl TryFrom<u8> for RecKind {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(RecKind::Similar),
            2 => Ok(RecKind::Inference),
            other => Err(format!("rec must be 1 or 2, got {}", other)),
        }
    }
}

impl From<RecKind> for u8 {
    fn from(kind: RecKind) -> Self {
        match kind {
            RecKind::Similar => 1,
            RecKind::Inference => 2,
        }
    }
}

/// A provider review kept with the place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Review {
    pub text: String,
    pub rating: Option<f64>,
    /// Unix seconds
    pub time: Option<i64>,
    pub author: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Place {
    pub id: String,
    pub google_place_id: String,
    pub name: String,
    pub address: String,
    pub location_id: String,
    #[serde(default)]
    pub emotion_ids: Vec<String>,
    pub image_url: Option<String>,
    pub google_rating: Option<f64>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub place_types: Vec<String>,
    #[serde(default)]
    pub status: PlaceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NewPlace {
    pub google_place_id: String,
    pub name: String,
    pub address: String,
    pub location_id: String,
    pub emotion_ids: Vec<String>,
    pub image_url: Option<String>,
    pub google_rating: Option<f64>,
    pub reviews: Vec<Review>,
    pub place_types: Vec<String>,
    pub status: PlaceStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AiSummary {
    pub id: String,
    pub place_id: String,
    pub summary: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedPlace {
    pub id: String,
    pub user_id: String,
    pub place_id: String,
    pub rec: RecKind,
    /// Latest AI summary at the time of saving
    #[serde(default)]
    pub summary_snapshot: String,
    pub created_at: DateTime<Utc>,
}

/// A saved place joined with the place it points to.
#[derive(Debug, Clone, Serialize)]
pub struct SavedPlaceView {
    pub saved: SavedPlace,
    pub place: Place,
}

/// A place with its tags and current summary resolved.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceView {
    pub place: Place,
    pub emotions: Vec<super::Emotion>,
    pub location: Option<super::Location>,
    pub summary: Option<AiSummary>,
}

/// Search result card for a single store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreCard {
    pub google_place_id: String,
    pub name: String,
    pub address: String,
    pub status: PlaceStatus,
    pub status_label: String,
    pub rating: Option<f64>,
    pub photo_url: Option<String>,
    pub summary_card: String,
    pub emotion_tags: Vec<String>,
}
