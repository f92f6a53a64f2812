//! TTL response cache for places and LLM calls.
//!
//! Entries live in an LRU map behind a tokio mutex. Keys are
//! `{prefix}:{sha256 of the canonical JSON of the call parameters}`, so the
//! same parameters hit the same entry regardless of field order. Anything
//! that goes wrong inside the cache is logged and treated as a miss.

use lru::LruCache;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::config::CacheConfig;

/// Kind of cached call. Each has its own key prefix and TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheNamespace {
    PlacesSearch,
    PlaceDetails,
    LlmSummary,
    LlmEmotionTags,
    LlmEmotionExpansion,
}

impl CacheNamespace {
    pub fn prefix(&self) -> &'static str {
        match self {
            CacheNamespace::PlacesSearch => "google_places_search",
            CacheNamespace::PlaceDetails => "google_place_details",
            CacheNamespace::LlmSummary => "gpt_summary",
            CacheNamespace::LlmEmotionTags => "gpt_emotion_tags",
            CacheNamespace::LlmEmotionExpansion => "gpt_emotion_expansion",
        }
    }

    pub fn ttl(&self, config: &CacheConfig) -> Duration {
        match self {
            CacheNamespace::PlacesSearch => config.places_search_ttl,
            CacheNamespace::PlaceDetails => config.place_details_ttl,
            CacheNamespace::LlmSummary => config.llm_summary_ttl,
            CacheNamespace::LlmEmotionTags => config.llm_emotion_tags_ttl,
            CacheNamespace::LlmEmotionExpansion => config.llm_emotion_expansion_ttl,
        }
    }
}

#[derive(Debug)]
struct Entry {
    value: Value,
    expires_at: Instant,
}

/// Cache statistics
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub enabled: bool,
    pub size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResponseCache {
    entries: Option<Arc<Mutex<LruCache<String, Entry>>>>,
    config: CacheConfig,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl ResponseCache {
    pub fn new(config: &CacheConfig) -> Self {
        let entries = NonZeroUsize::new(config.capacity)
            .filter(|_| config.enabled)
            .map(|capacity| Arc::new(Mutex::new(LruCache::new(capacity))));

        Self {
            entries,
            config: config.clone(),
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.entries.is_some()
    }

    /// Build the cache key for a call.
    pub fn key<P: Serialize + ?Sized>(namespace: CacheNamespace, params: &P) -> String {
        let canonical = match serde_json::to_value(params) {
            Ok(value) => canonical_json(&value),
            Err(e) => {
                tracing::warn!("Cache key parameters could not be serialized: {}", e);
                String::new()
            }
        };
        let digest = Sha256::digest(canonical.as_bytes());
        format!("{}:{:x}", namespace.prefix(), digest)
    }

    /// Look up a value. Expired entries are dropped and count as misses.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entries = self.entries.as_ref()?;

        let value = {
            let mut entries = entries.lock().await;
            match entries.get(key) {
                Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
                Some(_) => {
                    entries.pop(key);
                    None
                }
                None => None,
            }
        };

        let Some(value) = value else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(key, "Cache miss");
            return None;
        };

        match serde_json::from_value(value) {
            Ok(parsed) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(key, "Cache hit");
                Some(parsed)
            }
            Err(e) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(key, "Cached value has an unexpected shape: {}", e);
                None
            }
        }
    }

    /// Store a value for `ttl`. Returns false when nothing was stored.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl: Duration) -> bool {
        let Some(entries) = self.entries.as_ref() else {
            return false;
        };

        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, "Value could not be cached: {}", e);
                return false;
            }
        };

        entries.lock().await.put(
            key.to_string(),
            Entry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
        tracing::debug!(key, ttl_secs = ttl.as_secs(), "Cached response");
        true
    }

    /// Return the cached value for `params` or run `fetch` and cache its result.
    ///
    /// The lock is not held while `fetch` runs. Errors are not cached.
    /// The flag is true when the value came from the cache.
    pub async fn get_or_fetch<T, P, F, Fut, E>(
        &self,
        namespace: CacheNamespace,
        params: &P,
        fetch: F,
    ) -> Result<(T, bool), E>
    where
        T: Serialize + DeserializeOwned,
        P: Serialize + ?Sized,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let key = Self::key(namespace, params);
        if let Some(value) = self.get::<T>(&key).await {
            return Ok((value, true));
        }

        let value = fetch().await?;
        self.set(&key, &value, namespace.ttl(&self.config)).await;
        Ok((value, false))
    }

    /// Drop one entry. Returns false when nothing was cached under `key`.
    pub async fn invalidate(&self, key: &str) -> bool {
        match self.entries.as_ref() {
            Some(entries) => entries.lock().await.pop(key).is_some(),
            None => false,
        }
    }

    pub async fn clear(&self) {
        if let Some(entries) = self.entries.as_ref() {
            entries.lock().await.clear();
        }
    }

    pub async fn stats(&self) -> CacheStats {
        let size = match self.entries.as_ref() {
            Some(entries) => entries.lock().await.len(),
            None => 0,
        };

        CacheStats {
            enabled: self.is_enabled(),
            size,
            capacity: self.config.capacity,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// JSON text with object keys sorted at every level.
fn canonical_json(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let fields: Vec<String> = keys
                .into_iter()
                .map(|key| {
                    format!(
                        "{}:{}",
                        Value::String(key.clone()),
                        canonical_json(&map[key])
                    )
                })
                .collect();
            format!("{{{}}}", fields.join(","))
        }
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(canonical_json).collect();
            format!("[{}]", items.join(","))
        }
        other => other.to_string(),
    }
}
