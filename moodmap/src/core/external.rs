//! Cached, measured calls to the external providers.

use serde_json::{Value, json};
use std::time::Instant;

use super::Moodmap;
use crate::cache::{CacheNamespace, CallOutcome, ResponseCache};
use crate::prompts;
use crate::providers::{
    CompletionOptions, PlaceCandidate, PlaceDetails, ProviderError, TextSearch,
};

/// Which LLM call is being made. Decides caching, sampling and the
/// metrics name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LlmTask {
    Summary,
    EmotionTags,
    EmotionExpansion,
    Overall,
    TasteProfile,
    Address,
    ClosedStore,
    Prompt,
}

impl LlmTask {
    fn api(&self) -> &'static str {
        match self {
            LlmTask::Summary => "gpt_summary",
            LlmTask::EmotionTags => "gpt_emotion_tags",
            LlmTask::EmotionExpansion => "gpt_emotion_expansion",
            LlmTask::Overall => "gpt_overall_recommendation",
            LlmTask::TasteProfile => "gpt_taste_profile",
            LlmTask::Address => "gpt_address",
            LlmTask::ClosedStore => "gpt_closed_store",
            LlmTask::Prompt => "gpt_prompt",
        }
    }

    fn namespace(&self) -> Option<CacheNamespace> {
        match self {
            LlmTask::Summary => Some(CacheNamespace::LlmSummary),
            LlmTask::EmotionTags => Some(CacheNamespace::LlmEmotionTags),
            LlmTask::EmotionExpansion => Some(CacheNamespace::LlmEmotionExpansion),
            _ => None,
        }
    }

    fn options(&self) -> CompletionOptions {
        match self {
            LlmTask::Summary => CompletionOptions::new(120, 0.2),
            LlmTask::EmotionTags => CompletionOptions::new(50, 0.7),
            LlmTask::EmotionExpansion => CompletionOptions::new(150, 0.2),
            LlmTask::TasteProfile => CompletionOptions::new(80, 0.7),
            LlmTask::Address => CompletionOptions::new(100, 0.0),
            LlmTask::Overall | LlmTask::ClosedStore => CompletionOptions::new(800, 0.7),
            LlmTask::Prompt => CompletionOptions::default(),
        }
    }
}

fn outcome<T, E>(result: &Result<(T, bool), E>) -> CallOutcome {
    match result {
        Ok((_, true)) => CallOutcome::CacheHit,
        Ok((_, false)) => CallOutcome::CacheMiss,
        Err(_) => CallOutcome::Failed,
    }
}

impl Moodmap {
    pub(crate) async fn search_places(
        &self,
        search: &TextSearch,
    ) -> Result<Vec<PlaceCandidate>, ProviderError> {
        let client = self
            .places_client
            .as_ref()
            .ok_or(ProviderError::NotConfigured("places"))?;

        let started = Instant::now();
        let result = self
            .cache
            .get_or_fetch(CacheNamespace::PlacesSearch, search, || {
                client.text_search(search)
            })
            .await;
        self.metrics
            .record("google_places_search", started.elapsed(), outcome(&result))
            .await;
        result.map(|(results, _)| results)
    }

    pub(crate) async fn fetch_place_details(
        &self,
        place_id: &str,
    ) -> Result<Option<PlaceDetails>, ProviderError> {
        let client = self
            .places_client
            .as_ref()
            .ok_or(ProviderError::NotConfigured("places"))?;

        let started = Instant::now();
        let result = self
            .cache
            .get_or_fetch(
                CacheNamespace::PlaceDetails,
                &json!({ "place_id": place_id }),
                || client.place_details(place_id),
            )
            .await;
        self.metrics
            .record("google_place_details", started.elapsed(), outcome(&result))
            .await;
        result.map(|(details, _)| details)
    }

    pub(crate) async fn find_place_id(&self, query: &str) -> Result<Option<String>, ProviderError> {
        let client = self
            .places_client
            .as_ref()
            .ok_or(ProviderError::NotConfigured("places"))?;

        let started = Instant::now();
        let result = client.find_place_id(query).await;
        let call = if result.is_ok() {
            CallOutcome::CacheMiss
        } else {
            CallOutcome::Failed
        };
        self.metrics
            .record("google_find_place", started.elapsed(), call)
            .await;
        result
    }

    pub(crate) fn photo_url(&self, photo_reference: Option<&str>) -> Option<String> {
        let client = self.places_client.as_ref()?;
        photo_reference.map(|reference| client.photo_url(reference))
    }

    /// Run one LLM call, through the cache when the task is cacheable.
    pub(crate) async fn ask_llm(&self, task: LlmTask, prompt: &str) -> Result<String, ProviderError> {
        let client = self
            .llm_client
            .as_ref()
            .ok_or(ProviderError::NotConfigured("llm"))?;

        let options = task.options();
        let started = Instant::now();
        let result = match task.namespace() {
            Some(namespace) => {
                self.cache
                    .get_or_fetch(namespace, &self.llm_params(prompt, &options), || {
                        client.complete(prompt, &options)
                    })
                    .await
            }
            None => client.complete(prompt, &options).await.map(|reply| (reply, false)),
        };
        self.metrics
            .record(task.api(), started.elapsed(), outcome(&result))
            .await;
        result.map(|(reply, _)| reply)
    }

    /// Like [`ask_llm`](Self::ask_llm) but any cached reply is dropped first.
    pub(crate) async fn ask_llm_fresh(&self, task: LlmTask, prompt: &str) -> Result<String, ProviderError> {
        if let Some(namespace) = task.namespace() {
            let key = ResponseCache::key(namespace, &self.llm_params(prompt, &task.options()));
            if self.cache.invalidate(&key).await {
                tracing::debug!(api = task.api(), "Dropped cached LLM reply");
            }
        }
        self.ask_llm(task, prompt).await
    }

    fn llm_params(&self, prompt: &str, options: &CompletionOptions) -> Value {
        json!({
            "model": self.config.llm.model,
            "prompt": prompt,
            "options": options,
        })
    }

    /// LLM call whose failure is logged and replaced by `fallback`.
    pub(crate) async fn ask_llm_or(&self, task: LlmTask, prompt: &str, fallback: &str) -> String {
        match self.ask_llm(task, prompt).await {
            Ok(reply) => reply,
            Err(ProviderError::NotConfigured(_)) => {
                tracing::debug!(api = task.api(), "LLM not configured, using fallback");
                fallback.to_string()
            }
            Err(e) => {
                tracing::warn!(api = task.api(), "LLM call failed, using fallback: {}", e);
                fallback.to_string()
            }
        }
    }

    /// Korean form of an address. Korean input is returned unchanged and
    /// failures return the input.
    pub(crate) async fn normalize_address(&self, address: &str) -> String {
        let address = address.trim();
        if address.is_empty() || prompts::is_korean_text(address) {
            return address.to_string();
        }
        let reply = self
            .ask_llm_or(LlmTask::Address, &prompts::address_prompt(address), address)
            .await;
        let normalized = prompts::parse_summary(&reply);
        if normalized.is_empty() {
            address.to_string()
        } else {
            normalized
        }
    }

    /// Summary card and emotion tags for a place. Never fails.
    pub(crate) async fn describe_place(
        &self,
        name: &str,
        rating: Option<f64>,
        reviews: &[String],
        types: &[String],
    ) -> (String, Vec<String>) {
        let reviews: Vec<String> = if reviews.is_empty() {
            vec![format!("평점: {}점", rating.unwrap_or(0.0))]
        } else {
            reviews.to_vec()
        };

        let summary = self
            .ask_llm_or(
                LlmTask::Summary,
                &prompts::summary_card_prompt(name, rating, &reviews, types),
                prompts::DEFAULT_SUMMARY,
            )
            .await;
        let tags = self
            .ask_llm_or(
                LlmTask::EmotionTags,
                &prompts::emotion_tags_prompt(name, &reviews, types),
                "",
            )
            .await;

        (prompts::parse_summary(&summary), prompts::parse_emotion_tags(&tags))
    }
}
