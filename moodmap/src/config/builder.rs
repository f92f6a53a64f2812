//! Configuration builder.
//!
//! This module provides a builder pattern API for creating configurations.

use super::{Result, models::*, validation};
use std::path::{Path, PathBuf};

/// Builder for creating MoodmapConfig instances.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: MoodmapConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self {
            config: MoodmapConfig::default(),
        }
    }

    /// Start from an already loaded configuration.
    pub fn from_config(config: MoodmapConfig) -> Self {
        Self { config }
    }

    /// Set the base data directory. Uploads move along with it.
    pub fn with_data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.storage.data_dir = path.as_ref().to_path_buf();
        self.config.uploads.dir = self.config.storage.data_dir.join("uploads");
        self
    }

    /// Use RocksDB under a per-user data directory unless one was set.
    pub fn with_default_storage(mut self) -> Self {
        if self.config.storage.data_dir == PathBuf::from("./data") {
            let data_dir = directories::ProjectDirs::from("org", "moodmap", "moodmap")
                .map(|dirs| dirs.data_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".moodmap"));
            self = self.with_data_dir(data_dir);
        }
        self.config.storage.engine = StorageEngine::RocksDb;
        self
    }

    /// Use in-memory storage (good for testing)
    pub fn with_memory_storage(mut self) -> Self {
        self.config.storage.engine = StorageEngine::Memory;
        self
    }

    /// Set the SurrealDB namespace and database.
    pub fn with_database(mut self, namespace: impl Into<String>, database: impl Into<String>) -> Self {
        self.config.storage.namespace = namespace.into();
        self.config.storage.database = database.into();
        self
    }

    /// Set the log level.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Set the log format.
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.config.logging.format = format;
        self
    }

    pub fn with_places_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.places.api_key = Some(key.into());
        self
    }

    pub fn with_llm_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.llm.api_key = Some(key.into());
        self
    }

    pub fn with_llm_model(mut self, model: impl Into<String>) -> Self {
        self.config.llm.model = model.into();
        self
    }

    /// Disable the response cache entirely.
    pub fn without_cache(mut self) -> Self {
        self.config.cache.enabled = false;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.config.cache.capacity = capacity;
        self
    }

    pub fn with_upload_limit(mut self, max_bytes: usize) -> Self {
        self.config.uploads.max_bytes = max_bytes;
        self
    }

    pub fn with_seed_files<P: AsRef<Path>>(mut self, emotions: P, locations: P) -> Self {
        self.config.seed.emotions_csv = Some(emotions.as_ref().to_path_buf());
        self.config.seed.locations_csv = Some(locations.as_ref().to_path_buf());
        self
    }

    /// In-memory storage, quiet logging, no provider keys.
    pub fn testing() -> Self {
        Self::new()
            .with_memory_storage()
            .with_log_level(LogLevel::Warn)
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<MoodmapConfig> {
        validation::validate_config(&self.config)?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
