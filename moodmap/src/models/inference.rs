//! Inference sessions: recommendations computed from chosen locations and emotions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AiSummary, Emotion, Location, Place, RecKind};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InferenceSession {
    pub id: String,
    /// Anonymous sessions are allowed
    pub user_id: Option<String>,
    pub location_ids: Vec<String>,
    pub emotion_ids: Vec<String>,
    #[serde(default)]
    pub overall_recommendation: String,
    pub created_at: DateTime<Utc>,
}

/// One place recommended by a session, in rank order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InferenceRecommendation {
    pub id: String,
    pub session_id: String,
    pub place_id: String,
    pub summary: String,
    #[serde(default)]
    pub emotion_tags: Vec<String>,
    pub rank: u32,
}

/// A place as handed back to clients by the recommendation flows.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendedPlace {
    pub place: Place,
    pub rec: RecKind,
    pub emotions: Vec<Emotion>,
    pub location: Option<Location>,
    pub summary: Option<AiSummary>,
}

/// Result of running an inference session.
#[derive(Debug, Clone, Serialize)]
pub struct InferenceOutcome {
    pub session: InferenceSession,
    pub places: Vec<RecommendedPlace>,
}

/// A stored recommendation with the place it points to.
#[derive(Debug, Clone, Serialize)]
pub struct SessionEntry {
    pub recommendation: InferenceRecommendation,
    pub place: Place,
}

/// A stored session with its tags and recommendations resolved.
#[derive(Debug, Clone, Serialize)]
pub struct SessionDetail {
    pub session: InferenceSession,
    pub locations: Vec<Location>,
    pub emotions: Vec<Emotion>,
    pub recommendations: Vec<SessionEntry>,
}
