//! Configuration validation utilities.

use super::ConfigError;
use super::models::*;

/// Validate the entire configuration.
pub fn validate_config(config: &MoodmapConfig) -> Result<(), ConfigError> {
    validate_storage_config(&config.storage)?;
    validate_cache_config(&config.cache)?;
    validate_places_config(&config.places)?;
    validate_upload_config(&config.uploads)?;

    if config.community.max_emotions_per_memory == 0 {
        return Err(ConfigError::ValidationError(
            "max_emotions_per_memory must be at least 1".to_string(),
        ));
    }
    if config.community.default_page_size == 0
        || config.community.default_page_size > config.community.max_page_size
    {
        return Err(ConfigError::ValidationError(
            "default_page_size must be between 1 and max_page_size".to_string(),
        ));
    }

    Ok(())
}

fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.data_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Data directory cannot be empty".to_string(),
        ));
    }
    if config.namespace.is_empty() {
        return Err(ConfigError::ValidationError(
            "SurrealDB namespace cannot be empty".to_string(),
        ));
    }
    if config.database.is_empty() {
        return Err(ConfigError::ValidationError(
            "SurrealDB database cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    if config.enabled && config.capacity == 0 {
        return Err(ConfigError::ValidationError(
            "Cache capacity must be greater than zero when the cache is enabled".to_string(),
        ));
    }
    Ok(())
}

fn validate_places_config(config: &PlacesConfig) -> Result<(), ConfigError> {
    if !(0.0..=5.0).contains(&config.min_rating) {
        return Err(ConfigError::ValidationError(format!(
            "min_rating must be within 0..=5, got {}",
            config.min_rating
        )));
    }
    if config.detail_limit == 0 {
        return Err(ConfigError::ValidationError(
            "detail_limit must be at least 1".to_string(),
        ));
    }
    if config.search_max_results == 0 || config.similar_max_results == 0 {
        return Err(ConfigError::ValidationError(
            "search result limits must be at least 1".to_string(),
        ));
    }
    Ok(())
}

fn validate_upload_config(config: &UploadConfig) -> Result<(), ConfigError> {
    if config.max_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "Upload max_bytes must be greater than zero".to_string(),
        ));
    }
    if config.allowed_content_types.is_empty() {
        return Err(ConfigError::ValidationError(
            "At least one upload content type must be allowed".to_string(),
        ));
    }
    Ok(())
}
