//! Configuration models.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MoodmapConfig {
    /// Storage configuration
    pub storage: StorageConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Response cache for external API calls
    pub cache: CacheConfig,

    /// Places provider
    pub places: PlacesConfig,

    /// LLM provider
    pub llm: LlmConfig,

    /// Image uploads
    pub uploads: UploadConfig,

    /// Community rules (tag limits, paging)
    pub community: CommunityConfig,

    /// CSV files used to seed emotions and locations
    pub seed: SeedConfig,
}

/// Storage engine backing the embedded database.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageEngine {
    /// In-memory, lost on shutdown
    Memory,
    /// RocksDB files under `data_dir`
    RocksDb,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub engine: StorageEngine,

    /// Base directory for the database and uploads
    pub data_dir: PathBuf,

    pub namespace: String,

    pub database: String,
}

impl StorageConfig {
    /// Directory handed to the RocksDB engine.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("db")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            engine: StorageEngine::RocksDb,
            data_dir: PathBuf::from("./data"),
            namespace: "moodmap".to_string(),
            database: "main".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: LogLevel,

    /// Log format
    pub format: LogFormat,

    /// File to log to (if any)
    pub file: Option<PathBuf>,

    /// Whether to log to stdout
    pub stdout: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Default,
            file: None,
            stdout: true,
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Default,
    Json,
    Compact,
    Pretty,
}

/// Response cache for places and LLM calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,

    /// Maximum number of entries across all namespaces
    pub capacity: usize,

    #[serde(with = "humantime_serde")]
    pub places_search_ttl: Duration,

    #[serde(with = "humantime_serde")]
    pub place_details_ttl: Duration,

    #[serde(with = "humantime_serde")]
    pub llm_summary_ttl: Duration,

    #[serde(with = "humantime_serde")]
    pub llm_emotion_tags_ttl: Duration,

    #[serde(with = "humantime_serde")]
    pub llm_emotion_expansion_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: 2048,
            places_search_ttl: Duration::from_secs(3600),
            place_details_ttl: Duration::from_secs(7200),
            llm_summary_ttl: Duration::from_secs(86400),
            llm_emotion_tags_ttl: Duration::from_secs(86400),
            llm_emotion_expansion_ttl: Duration::from_secs(86400),
        }
    }
}

/// Places provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacesConfig {
    /// API key; the provider is disabled when absent
    pub api_key: Option<String>,

    pub base_url: String,

    /// Response language for names, addresses and reviews
    pub language: String,

    /// Region bias for text search
    pub region: String,

    /// District name used in search queries and neighbourhood extraction
    pub district: String,

    /// Place type passed to inference searches
    pub search_type: String,

    /// Minimum rating for inference candidates
    pub min_rating: f64,

    /// Types accepted for similar-place candidates
    pub allowed_types: Vec<String>,

    /// Total candidates kept per inference session
    pub search_max_results: usize,

    /// Candidates kept per similar-place request
    pub similar_max_results: usize,

    /// Number of inference candidates enriched with details
    pub detail_limit: usize,

    /// Reviews kept per place
    pub review_limit: usize,

    pub photo_max_width: u32,

    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://maps.googleapis.com/maps/api/place".to_string(),
            language: "ko".to_string(),
            region: "kr".to_string(),
            district: "용산구".to_string(),
            search_type: "restaurant".to_string(),
            min_rating: 4.0,
            allowed_types: vec![
                "restaurant".to_string(),
                "cafe".to_string(),
                "bakery".to_string(),
                "bar".to_string(),
                "food".to_string(),
            ],
            search_max_results: 10,
            similar_max_results: 8,
            detail_limit: 3,
            review_limit: 5,
            photo_max_width: 400,
            timeout: Duration::from_secs(10),
        }
    }
}

/// LLM provider settings (OpenAI-compatible chat completions).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API key; the provider is disabled when absent
    pub api_key: Option<String>,

    pub base_url: String,

    pub model: String,

    pub max_tokens: u32,

    pub temperature: f32,

    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 500,
            temperature: 0.7,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Image upload settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Directory blobs are written to
    pub dir: PathBuf,

    /// Prefix of the public URL for stored blobs
    pub public_base_url: String,

    pub max_bytes: usize,

    pub allowed_content_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./data/uploads"),
            public_base_url: "/media".to_string(),
            max_bytes: 5 * 1024 * 1024,
            allowed_content_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
        }
    }
}

/// Community rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunityConfig {
    pub max_emotions_per_memory: usize,

    pub default_page_size: usize,

    pub max_page_size: usize,

    pub min_password_length: usize,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            max_emotions_per_memory: 3,
            default_page_size: 20,
            max_page_size: 100,
            min_password_length: 8,
        }
    }
}

/// Seed files loaded at startup when present.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SeedConfig {
    pub emotions_csv: Option<PathBuf>,

    pub locations_csv: Option<PathBuf>,
}
