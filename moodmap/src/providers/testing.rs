//! Deterministic in-memory providers.
//!
//! Used by the test suites and for offline runs of the CLI. Nothing here
//! talks to the network.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use super::llm::{CompletionOptions, LlmClient};
use super::places::{PlaceCandidate, PlaceDetails, PlacesClient, TextSearch};
use super::ProviderError;
use crate::models::Review;

/// Places provider answering from fixed data.
///
/// A text search returns the results registered for the first key that the
/// query contains.
#[derive(Debug, Default, Clone)]
pub struct StaticPlacesClient {
    searches: Vec<(String, Vec<PlaceCandidate>)>,
    details: HashMap<String, PlaceDetails>,
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl StaticPlacesClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A client whose every call fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_search(mut self, key: impl Into<String>, results: Vec<PlaceCandidate>) -> Self {
        self.searches.push((key.into(), results));
        self
    }

    pub fn with_details(mut self, details: PlaceDetails) -> Self {
        self.details.insert(details.place_id.clone(), details);
        self
    }

    /// Number of provider calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn call(&self) -> Result<(), ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ProviderError::Http("static provider set to fail".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PlacesClient for StaticPlacesClient {
    async fn text_search(&self, search: &TextSearch) -> Result<Vec<PlaceCandidate>, ProviderError> {
        self.call()?;
        Ok(self
            .searches
            .iter()
            .find(|(key, _)| search.query.contains(key.as_str()))
            .map(|(_, results)| results.clone())
            .unwrap_or_default())
    }

    async fn place_details(&self, place_id: &str) -> Result<Option<PlaceDetails>, ProviderError> {
        self.call()?;
        Ok(self.details.get(place_id).cloned())
    }

    async fn find_place_id(&self, query: &str) -> Result<Option<String>, ProviderError> {
        self.call()?;
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }
        let mut matches: Vec<&PlaceDetails> = self
            .details
            .values()
            .filter(|d| d.name.contains(query) || query.contains(d.name.as_str()))
            .collect();
        matches.sort_by(|a, b| a.place_id.cmp(&b.place_id));
        Ok(matches.first().map(|d| d.place_id.clone()))
    }

    fn photo_url(&self, photo_reference: &str) -> String {
        format!("https://photos.invalid/{}", photo_reference)
    }
}

/// LLM answering from scripted rules.
///
/// The reply of the first rule whose marker appears in the prompt is
/// returned, else the default reply.
#[derive(Debug, Clone)]
pub struct ScriptedLlmClient {
    rules: Arc<RwLock<Vec<(String, String)>>>,
    default_reply: Option<String>,
    prompts: Arc<RwLock<Vec<String>>>,
}

impl Default for ScriptedLlmClient {
    fn default() -> Self {
        Self::new("추천 요약")
    }
}

impl ScriptedLlmClient {
    pub fn new(default_reply: impl Into<String>) -> Self {
        Self {
            rules: Arc::new(RwLock::new(Vec::new())),
            default_reply: Some(default_reply.into()),
            prompts: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// A client whose every call fails.
    pub fn failing() -> Self {
        Self {
            default_reply: None,
            ..Self::new("")
        }
    }

    pub fn with_rule(self, marker: impl Into<String>, reply: impl Into<String>) -> Self {
        if let Ok(mut rules) = self.rules.write() {
            rules.push((marker.into(), reply.into()));
        }
        self
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.read().map(|p| p.clone()).unwrap_or_default()
    }

    pub fn calls(&self) -> usize {
        self.prompts.read().map(|p| p.len()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlmClient {
    async fn complete(
        &self,
        prompt: &str,
        _options: &CompletionOptions,
    ) -> Result<String, ProviderError> {
        if let Ok(mut prompts) = self.prompts.write() {
            prompts.push(prompt.to_string());
        }

        let scripted = self.rules.read().ok().and_then(|rules| {
            rules
                .iter()
                .find(|(marker, _)| prompt.contains(marker.as_str()))
                .map(|(_, reply)| reply.clone())
        });

        match scripted.or_else(|| self.default_reply.clone()) {
            Some(reply) => Ok(reply),
            None => Err(ProviderError::Http("scripted LLM set to fail".to_string())),
        }
    }
}

/// Shorthand for a search hit.
pub fn candidate(place_id: &str, name: &str, address: &str, rating: f64) -> PlaceCandidate {
    PlaceCandidate {
        place_id: place_id.to_string(),
        name: name.to_string(),
        address: address.to_string(),
        rating: Some(rating),
        user_ratings_total: Some(100),
        types: vec!["restaurant".to_string(), "food".to_string()],
        photo_reference: Some(format!("photo-{}", place_id)),
    }
}

/// Shorthand for details of an operating place with one review.
pub fn details(place_id: &str, name: &str, address: &str) -> PlaceDetails {
    PlaceDetails {
        place_id: place_id.to_string(),
        name: name.to_string(),
        address: address.to_string(),
        rating: Some(4.5),
        user_ratings_total: Some(100),
        types: vec!["restaurant".to_string()],
        business_status: Some("OPERATIONAL".to_string()),
        photo_reference: Some(format!("photo-{}", place_id)),
        reviews: vec![Review {
            text: format!("{} 정말 좋아요", name),
            rating: Some(5.0),
            time: Some(1_700_000_000),
            author: Some("tester".to_string()),
        }],
    }
}
