//! Per-API call accounting for the external providers.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// How an external call was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    /// Answered from the response cache
    CacheHit,
    /// Went to the provider
    CacheMiss,
    /// The provider call failed
    Failed,
}

#[derive(Debug, Default, Clone)]
struct ApiStats {
    total_calls: u64,
    total_time: Duration,
    cache_hits: u64,
    cache_misses: u64,
    failures: u64,
}

/// Point-in-time view of one API's statistics.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ApiStatsSnapshot {
    pub api: String,
    pub total_calls: u64,
    pub total_time_ms: f64,
    pub avg_time_ms: f64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub failures: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ApiMetrics {
    stats: Arc<Mutex<HashMap<String, ApiStats>>>,
}

impl ApiMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, api: &str, elapsed: Duration, outcome: CallOutcome) {
        let mut stats = self.stats.lock().await;
        let entry = stats.entry(api.to_string()).or_default();
        entry.total_calls += 1;
        entry.total_time += elapsed;
        match outcome {
            CallOutcome::CacheHit => entry.cache_hits += 1,
            CallOutcome::CacheMiss => entry.cache_misses += 1,
            CallOutcome::Failed => entry.failures += 1,
        }

        match outcome {
            CallOutcome::Failed => tracing::warn!(
                api,
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                "External call failed"
            ),
            _ => tracing::debug!(
                api,
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                cached = outcome == CallOutcome::CacheHit,
                "External call finished"
            ),
        }
    }

    /// Snapshot of every API seen so far, sorted by name.
    pub async fn summary(&self) -> Vec<ApiStatsSnapshot> {
        let stats = self.stats.lock().await;
        let mut snapshots: Vec<ApiStatsSnapshot> = stats
            .iter()
            .map(|(api, s)| {
                let total_ms = s.total_time.as_secs_f64() * 1000.0;
                ApiStatsSnapshot {
                    api: api.clone(),
                    total_calls: s.total_calls,
                    total_time_ms: total_ms,
                    avg_time_ms: if s.total_calls == 0 {
                        0.0
                    } else {
                        total_ms / s.total_calls as f64
                    },
                    cache_hits: s.cache_hits,
                    cache_misses: s.cache_misses,
                    failures: s.failures,
                }
            })
            .collect();
        snapshots.sort_by(|a, b| a.api.cmp(&b.api));
        snapshots
    }

    pub async fn log_summary(&self) {
        for s in self.summary().await {
            tracing::info!(
                api = %s.api,
                calls = s.total_calls,
                avg_ms = format!("{:.1}", s.avg_time_ms),
                hits = s.cache_hits,
                misses = s.cache_misses,
                failures = s.failures,
                "External API statistics"
            );
        }
    }

    pub async fn reset(&self) {
        self.stats.lock().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn aggregates_per_api() {
        let metrics = ApiMetrics::new();
        metrics
            .record("places.text_search", Duration::from_millis(100), CallOutcome::CacheMiss)
            .await;
        metrics
            .record("places.text_search", Duration::from_millis(0), CallOutcome::CacheHit)
            .await;
        metrics
            .record("llm.summary", Duration::from_millis(300), CallOutcome::Failed)
            .await;

        let summary = metrics.summary().await;
        assert_eq!(summary.len(), 2);

        let llm = &summary[0];
        assert_eq!(llm.api, "llm.summary");
        assert_eq!(llm.failures, 1);

        let search = &summary[1];
        assert_eq!(search.total_calls, 2);
        assert_eq!(search.cache_hits, 1);
        assert_eq!(search.cache_misses, 1);
        assert!((search.avg_time_ms - 50.0).abs() < 1e-6);

        metrics.reset().await;
        assert!(metrics.summary().await.is_empty());
    }
}
