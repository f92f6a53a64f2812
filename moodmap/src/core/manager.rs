//! The application handle.

use std::sync::Arc;

use super::{Accounts, Community, Places, Recommender};
use crate::blob::BlobStore;
use crate::cache::{ApiMetrics, ResponseCache};
use crate::config::MoodmapConfig;
use crate::models::User;
use crate::providers::{LlmClient, PlacesClient};
use crate::storage::Store;
use crate::{MoodmapError, Result};

/// Shared handles for every moodmap operation.
///
/// Cloning is cheap; clones share storage, cache and metrics.
#[derive(Clone)]
pub struct Moodmap {
    pub(crate) storage: Arc<dyn Store>,
    pub(crate) blobs: Arc<dyn BlobStore>,
    pub(crate) places_client: Option<Arc<dyn PlacesClient>>,
    pub(crate) llm_client: Option<Arc<dyn LlmClient>>,
    pub(crate) cache: ResponseCache,
    pub(crate) metrics: ApiMetrics,
    pub(crate) config: Arc<MoodmapConfig>,
}

impl std::fmt::Debug for Moodmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Moodmap")
            .field("storage", &self.storage)
            .field("places_configured", &self.places_configured())
            .field("llm_configured", &self.llm_configured())
            .field("cache", &self.cache)
            .finish()
    }
}

impl Moodmap {
    /// Create a handle without external providers.
    pub fn new(storage: Arc<dyn Store>, blobs: Arc<dyn BlobStore>, config: MoodmapConfig) -> Self {
        Self {
            storage,
            blobs,
            places_client: None,
            llm_client: None,
            cache: ResponseCache::new(&config.cache),
            metrics: ApiMetrics::new(),
            config: Arc::new(config),
        }
    }

    pub fn with_places_client(mut self, client: Arc<dyn PlacesClient>) -> Self {
        self.places_client = Some(client);
        self
    }

    pub fn with_llm_client(mut self, client: Arc<dyn LlmClient>) -> Self {
        self.llm_client = Some(client);
        self
    }

    pub fn places_configured(&self) -> bool {
        self.places_client.is_some()
    }

    pub fn llm_configured(&self) -> bool {
        self.llm_client.is_some()
    }

    pub fn accounts(&self) -> Accounts<'_> {
        Accounts::new(self)
    }

    pub fn community(&self) -> Community<'_> {
        Community::new(self)
    }

    pub fn places(&self) -> Places<'_> {
        Places::new(self)
    }

    pub fn recommender(&self) -> Recommender<'_> {
        Recommender::new(self)
    }

    pub fn storage(&self) -> &Arc<dyn Store> {
        &self.storage
    }

    pub fn blobs(&self) -> &Arc<dyn BlobStore> {
        &self.blobs
    }

    pub fn config(&self) -> &MoodmapConfig {
        &self.config
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn metrics(&self) -> &ApiMetrics {
        &self.metrics
    }

    /// The user behind a write. Deleted accounts are `NotFound`.
    pub(crate) async fn require_user(&self, user_id: &str) -> Result<User> {
        self.storage
            .get_user(user_id)
            .await?
            .ok_or_else(|| MoodmapError::NotFound(format!("user {}", user_id)))
    }
}
