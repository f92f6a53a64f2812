//! Configuration system for moodmap.
//!
//! Configuration is layered: built-in defaults, then config files, then
//! `MOODMAP_`-prefixed environment variables. Nested keys use a double
//! underscore, e.g. `MOODMAP_PLACES__API_KEY`.

mod builder;
mod loader;
mod models;
mod validation;

pub use builder::ConfigBuilder;
pub use loader::ConfigLoader;
pub use models::*;

/// Default configuration file names that the system will look for
pub const DEFAULT_CONFIG_FILES: &[&str] = &[
    "moodmap.toml",
    "moodmap.yaml",
    "moodmap.yml",
    "moodmap.json",
    ".moodmap/config.toml",
    ".moodmap/config.yaml",
    ".moodmap/config.yml",
    ".moodmap/config.json",
];

/// Environment variable prefix for moodmap configuration
pub const ENV_PREFIX: &str = "MOODMAP_";

/// Configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error occurred during file loading
    #[error("Failed to load configuration file: {0}")]
    FileLoadError(String),

    /// Error occurred during validation
    #[error("Configuration validation error: {0}")]
    ValidationError(String),

    /// Error occurred during parsing
    #[error("Configuration parsing error: {0}")]
    ParseError(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
