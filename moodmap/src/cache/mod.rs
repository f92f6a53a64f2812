//! Caching and call accounting for external API calls.

pub mod metrics;
pub mod response_cache;

pub use metrics::{ApiMetrics, ApiStatsSnapshot, CallOutcome};
pub use response_cache::{CacheNamespace, CacheStats, ResponseCache};
