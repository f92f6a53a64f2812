//! Application services on top of storage and the external providers.
//!
//! [`Moodmap`] owns the shared handles. Each area of the application is
//! reached through a short-lived view borrowed from it, e.g.
//! `moodmap.community().create_memory(..)`.

mod accounts;
mod community;
mod external;
mod manager;
mod places;
mod recommend;

pub use accounts::{Accounts, ProfileUpdate};
pub use community::{Community, MemoryInput, Pagination};
pub use manager::Moodmap;
pub use places::{PlaceInput, Places};
pub use recommend::{InferenceRequest, Recommender, SimilarRequest, extract_neighborhood};

use crate::MoodmapError;
use crate::storage::StorageError;

/// Surface uniqueness and missing-record failures as domain errors.
pub(crate) fn conflict(err: StorageError) -> MoodmapError {
    match err {
        StorageError::AlreadyExists(message) => MoodmapError::Conflict(message),
        StorageError::Constraint(message) => MoodmapError::Conflict(message),
        StorageError::NotFound(message) => MoodmapError::NotFound(message),
        other => other.into(),
    }
}
