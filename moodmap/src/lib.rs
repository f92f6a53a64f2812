//! # Moodmap
//!
//! Backend library for a small social app where people post "memories" of
//! places they love, tag them with emotions and neighbourhoods, and get
//! venue recommendations built from a places provider and an LLM.
//!
//! ## Quick Start
//!
//! ```no_run
//! use moodmap::prelude::*;
//!
//! async fn example() -> Result<()> {
//!     let config = ConfigBuilder::new().with_memory_storage().build()?;
//!     let moodmap = moodmap::init(config).await?;
//!
//!     let options = moodmap.community().tag_options().await?;
//!     println!("{} emotions available", options.emotions.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **storage**: embedded SurrealDB behind async store traits
//! - **cache**: TTL response cache and call metrics for external APIs
//! - **providers**: places search and LLM completion clients
//! - **core**: community operations, saved places and the recommendation pipeline

pub mod blob;
pub mod cache;
pub mod config;
pub mod core;
pub mod logging;
pub mod models;
pub mod prompts;
pub mod providers;
pub mod seed;
pub mod storage;

/// The prelude re-exports commonly used types for convenience
pub mod prelude {
    pub use crate::init;

    pub use crate::config::{ConfigBuilder, LogLevel, MoodmapConfig, StorageConfig};

    pub use crate::models::{
        AiSummary, Bookmark, Comment, Emotion, Image, InferenceSession, Location, Memory,
        MemoryView, Place, PlaceStatus, RecKind, SavedPlace, TagKind, User,
    };

    pub use crate::core::{InferenceRequest, MemoryInput, Moodmap, Pagination, SimilarRequest};

    pub use crate::storage::StorageError;

    pub use crate::{MoodmapError, Result};
}

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error type for moodmap operations
#[derive(Debug, thiserror::Error)]
pub enum MoodmapError {
    /// Error during storage operations
    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Logging error
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LogError),

    /// Upload or blob storage error
    #[error("Blob error: {0}")]
    Blob(#[from] crate::blob::BlobError),

    /// External provider failure (places API or LLM)
    #[error("Provider error: {0}")]
    Provider(#[from] crate::providers::ProviderError),

    /// Request failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Requested record does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// Caller is not allowed to touch the record
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Record conflicts with an existing one
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Selected locations and emotions produced no candidate places
    #[error("No places found for the selected locations")]
    NoPlacesFound,

    /// Seed file could not be read
    #[error("Seed error: {0}")]
    Seed(String),

    /// Other unclassified errors
    #[error("{0}")]
    Other(String),
}

impl From<crate::config::ConfigError> for MoodmapError {
    fn from(err: crate::config::ConfigError) -> Self {
        MoodmapError::Configuration(err.to_string())
    }
}

/// Result type for moodmap operations
pub type Result<T> = std::result::Result<T, MoodmapError>;

/// Initialize moodmap with the provided configuration
///
/// Sets up logging, opens the configured storage, and wires the places and
/// LLM clients when API keys are present. Without keys the recommendation
/// features report [`providers::ProviderError::NotConfigured`] until clients
/// are attached with [`core::Moodmap::with_places_client`] and
/// [`core::Moodmap::with_llm_client`].
pub async fn init(config: config::MoodmapConfig) -> Result<core::Moodmap> {
    // Ignore errors if tracing is already initialized
    let _ = logging::init(&config.logging);

    let storage = storage::create_storage_service(&config.storage).await?;
    let blobs = blob::LocalBlobStore::new(&config.uploads);

    let mut moodmap = core::Moodmap::new(storage, std::sync::Arc::new(blobs), config.clone());

    if let Some(client) = providers::places::GooglePlacesClient::from_config(&config.places)? {
        moodmap = moodmap.with_places_client(std::sync::Arc::new(client));
    }
    if let Some(client) = providers::llm::OpenAiClient::from_config(&config.llm)? {
        moodmap = moodmap.with_llm_client(std::sync::Arc::new(client));
    }

    tracing::info!(
        storage = ?config.storage.engine,
        places = moodmap.places_configured(),
        llm = moodmap.llm_configured(),
        "moodmap initialized"
    );

    Ok(moodmap)
}
