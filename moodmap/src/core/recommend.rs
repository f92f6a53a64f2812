//! The recommendation pipeline.
//!
//! Every stage is a sequential provider call. A failing stage is logged and
//! replaced by a fallback so one bad response does not sink the whole run.
//! Calls the user asked for directly (free prompts, closed-store advice) are
//! the exception and report provider errors.

use serde::Deserialize;

use super::community::dedup;
use super::external::LlmTask;
use super::{Moodmap, Pagination};
use crate::models::{
    AiSummary, Emotion, InferenceOutcome, InferenceSession, Location, NewPlace, Page, Place,
    PlaceStatus, RecKind, RecommendedPlace, Review, SessionDetail, SessionEntry, StoreCard, TagKind,
    TagOptions,
};
use crate::prompts;
use crate::providers::{PlaceCandidate, ProviderError, TextSearch};
use crate::{MoodmapError, Result};

const MAX_SESSION_EMOTIONS: usize = 3;

/// A closed store to find replacements for.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimilarRequest {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub emotions: Vec<String>,
}

/// Locations and emotions chosen for an inference session.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InferenceRequest {
    pub location_ids: Vec<String>,
    pub emotion_ids: Vec<String>,
}

/// A search hit together with the location it was searched for.
#[derive(Debug, Clone)]
struct Candidate {
    hit: PlaceCandidate,
    location_id: String,
}

/// A candidate after enrichment.
#[derive(Debug, Clone)]
struct Enriched {
    candidate: Candidate,
    address: String,
    status: PlaceStatus,
    reviews: Vec<Review>,
    summary: String,
    emotion_tags: Vec<String>,
}

/// Neighbourhood name from a Korean address.
///
/// The last token ending in 동, 가 or 촌 wins. Otherwise the token after the
/// district, otherwise the last token. Empty input gives an empty string.
pub fn extract_neighborhood(address: &str, district: &str) -> String {
    let parts: Vec<&str> = address
        .split_whitespace()
        .map(|p| p.trim_end_matches(|c: char| c.is_ascii_punctuation()))
        .filter(|p| !p.is_empty())
        .collect();

    if parts.is_empty() {
        return String::new();
    }

    if let Some(part) = parts
        .iter()
        .rev()
        .find(|p| p.ends_with('동') || p.ends_with('가') || p.ends_with('촌'))
    {
        return part.to_string();
    }

    if let Some(index) = parts.iter().position(|p| *p == district)
        && let Some(next) = parts.get(index + 1)
    {
        return next.to_string();
    }

    parts[parts.len() - 1].to_string()
}

pub struct Recommender<'a> {
    app: &'a Moodmap,
}

impl<'a> Recommender<'a> {
    pub(crate) fn new(app: &'a Moodmap) -> Self {
        Self { app }
    }

    fn require_places(&self) -> Result<()> {
        if self.app.places_configured() {
            Ok(())
        } else {
            Err(ProviderError::NotConfigured("places").into())
        }
    }

    pub async fn options(&self) -> Result<TagOptions> {
        self.app.community().tag_options().await
    }

    // Similar places for a closed store

    /// Places similar to a closed store (rec 1), persisted with summaries.
    pub async fn similar_places(&self, request: SimilarRequest) -> Result<Vec<RecommendedPlace>> {
        self.require_places()?;
        let name = request.name.trim().to_string();
        let address = request.address.trim().to_string();
        if name.is_empty() && address.is_empty() {
            return Err(MoodmapError::Validation(
                "name or address of the closed store is required".to_string(),
            ));
        }

        let mut emotions: Vec<Emotion> = Vec::new();
        for emotion_name in dedup(request.emotions) {
            match self
                .app
                .storage
                .find_tag_by_name(TagKind::Emotion, &emotion_name)
                .await?
            {
                Some(emotion) => emotions.push(emotion),
                None => tracing::debug!(emotion = %emotion_name, "Ignoring unknown emotion"),
            }
        }
        let emotion_names: Vec<String> = emotions.iter().map(|e| e.name.clone()).collect();

        let places_config = &self.app.config.places;
        let query = format!(
            "{} {} {}",
            places_config.district,
            address,
            emotion_names.join(" ")
        )
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

        let hits = match self.app.search_places(&TextSearch::new(query.clone())).await {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!(query = %query, "Similar place search failed: {}", e);
                Vec::new()
            }
        };

        let allowed = &places_config.allowed_types;
        let candidates: Vec<PlaceCandidate> = hits
            .into_iter()
            .filter(|hit| allowed.is_empty() || hit.types.iter().any(|t| allowed.contains(t)))
            .filter(|hit| hit.name != name)
            .take(places_config.similar_max_results)
            .collect();

        tracing::info!(
            query = %query,
            found = candidates.len(),
            "Similar place candidates"
        );

        let emotion_ids: Vec<String> = emotions.iter().map(|e| e.id.clone()).collect();
        let mut results = Vec::with_capacity(candidates.len());
        for hit in candidates {
            let summary = prompts::parse_summary(
                &self
                    .app
                    .ask_llm_or(
                        LlmTask::Summary,
                        &prompts::place_summary_prompt(&hit.name, &hit.address),
                        prompts::DEFAULT_SUMMARY,
                    )
                    .await,
            );

            let location_id = self.app.places().location_for_address(&hit.address).await?;
            let (place, _) = self
                .get_or_create_place(NewPlace {
                    google_place_id: hit.place_id.clone(),
                    name: hit.name.clone(),
                    address: hit.address.clone(),
                    location_id,
                    emotion_ids: emotion_ids.clone(),
                    image_url: self.app.photo_url(hit.photo_reference.as_deref()),
                    google_rating: hit.rating,
                    reviews: Vec::new(),
                    place_types: hit.types.clone(),
                    status: PlaceStatus::Operating,
                })
                .await?;

            let place = if !emotion_ids.is_empty() && place.emotion_ids != emotion_ids {
                self.app
                    .storage
                    .set_place_emotions(&place.id, emotion_ids.clone())
                    .await?
            } else {
                place
            };
            let summary = self.app.storage.add_summary(&place.id, &summary).await?;

            results.push(self.recommended(place, RecKind::Similar, Some(summary)).await?);
        }

        Ok(results)
    }

    // Inference sessions

    /// Run an inference session (rec 2) and store it.
    pub async fn run_inference(
        &self,
        user_id: Option<&str>,
        request: InferenceRequest,
    ) -> Result<InferenceOutcome> {
        let emotion_ids = dedup(request.emotion_ids);
        let location_ids = dedup(request.location_ids);
        if emotion_ids.is_empty() || emotion_ids.len() > MAX_SESSION_EMOTIONS {
            return Err(MoodmapError::Validation(format!(
                "between 1 and {} emotions must be selected",
                MAX_SESSION_EMOTIONS
            )));
        }
        if location_ids.is_empty() {
            return Err(MoodmapError::Validation(
                "at least one location must be selected".to_string(),
            ));
        }
        self.require_places()?;

        let community = self.app.community();
        let emotions = community.require_tags(TagKind::Emotion, &emotion_ids).await?;
        let locations = community.require_tags(TagKind::Location, &location_ids).await?;
        let emotion_names: Vec<String> = emotions.iter().map(|e| e.name.clone()).collect();
        let location_label = locations
            .iter()
            .map(|l| l.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let candidates = self.search_locations(&locations).await;
        if candidates.is_empty() {
            tracing::info!(locations = %location_label, "No places found");
            return Err(MoodmapError::NoPlacesFound);
        }

        let detail_limit = self.app.config.places.detail_limit;
        let mut enriched = Vec::new();
        for candidate in candidates.into_iter().take(detail_limit) {
            enriched.push(self.enrich(candidate).await);
        }

        let listing: Vec<(String, String)> = enriched
            .iter()
            .map(|e| (e.candidate.hit.name.clone(), e.summary.clone()))
            .collect();
        let overall = prompts::parse_summary(
            &self
                .app
                .ask_llm_or(
                    LlmTask::Overall,
                    &prompts::overall_recommendation_prompt(
                        &location_label,
                        &emotion_names,
                        &listing,
                    ),
                    &prompts::overall_recommendation_fallback(&location_label, &emotion_names),
                )
                .await,
        );

        let session = self
            .app
            .storage
            .create_session(user_id, location_ids, emotion_ids, &overall)
            .await?;

        let mut places = Vec::new();
        for (rank, item) in enriched.into_iter().enumerate() {
            let (place, summary) = self.persist_enriched(&item).await?;
            self.app
                .storage
                .add_recommendation(
                    &session.id,
                    &place.id,
                    &item.summary,
                    item.emotion_tags.clone(),
                    rank as u32 + 1,
                )
                .await?;

            if let Some(user_id) = user_id
                && self
                    .app
                    .storage
                    .find_saved_place(user_id, &place.id, RecKind::Inference)
                    .await?
                    .is_some()
            {
                tracing::debug!(place_id = %place.id, "Leaving out already saved place");
                continue;
            }
            places.push(self.recommended(place, RecKind::Inference, summary).await?);
        }

        tracing::info!(
            session_id = %session.id,
            recommended = places.len(),
            "Inference session finished"
        );
        Ok(InferenceOutcome { session, places })
    }

    /// Search every location, keeping well-rated hits best first.
    async fn search_locations(&self, locations: &[Location]) -> Vec<Candidate> {
        let config = &self.app.config.places;
        let per_location = (config.search_max_results / locations.len()).max(1);

        let mut candidates: Vec<Candidate> = Vec::new();
        for location in locations {
            let search = TextSearch::new(format!("{} 음식점 카페", location.name))
                .with_type(config.search_type.clone());
            let hits = match self.app.search_places(&search).await {
                Ok(hits) => hits,
                Err(e) => {
                    tracing::warn!(location = %location.name, "Place search failed: {}", e);
                    continue;
                }
            };

            let mut rated: Vec<PlaceCandidate> = hits
                .into_iter()
                .filter(|hit| hit.rating.is_some_and(|r| r >= config.min_rating))
                .collect();
            rated.sort_by(|a, b| {
                b.rating
                    .partial_cmp(&a.rating)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            tracing::debug!(
                location = %location.name,
                found = rated.len(),
                "Well-rated places"
            );

            for hit in rated.into_iter().take(per_location) {
                if candidates.iter().any(|c| c.hit.place_id == hit.place_id) {
                    continue;
                }
                candidates.push(Candidate {
                    hit,
                    location_id: location.id.clone(),
                });
            }
        }
        candidates
    }

    /// Fetch details, normalise the address and describe the place.
    async fn enrich(&self, candidate: Candidate) -> Enriched {
        let review_limit = self.app.config.places.review_limit;
        let details = match self.app.fetch_place_details(&candidate.hit.place_id).await {
            Ok(details) => details,
            Err(e) => {
                tracing::warn!(
                    place_id = %candidate.hit.place_id,
                    "Place details failed, using search data: {}",
                    e
                );
                None
            }
        };

        let (raw_address, status, reviews) = match &details {
            Some(details) => (
                if details.address.is_empty() {
                    candidate.hit.address.clone()
                } else {
                    details.address.clone()
                },
                PlaceStatus::from_business_status(details.business_status.as_deref()),
                details.reviews.iter().take(review_limit).cloned().collect(),
            ),
            None => (candidate.hit.address.clone(), PlaceStatus::Operating, Vec::new()),
        };

        let address = self.app.normalize_address(&raw_address).await;
        let review_texts = prompts::review_texts(&reviews, review_limit);
        let (summary, emotion_tags) = self
            .app
            .describe_place(
                &candidate.hit.name,
                candidate.hit.rating,
                &review_texts,
                &candidate.hit.types,
            )
            .await;

        Enriched {
            candidate,
            address,
            status,
            reviews,
            summary,
            emotion_tags,
        }
    }

    /// Store an enriched place. New places get the fresh summary, known
    /// places keep their latest one.
    async fn persist_enriched(&self, item: &Enriched) -> Result<(Place, Option<AiSummary>)> {
        let emotion_ids = self.emotion_ids_for_tags(&item.emotion_tags).await?;
        let hit = &item.candidate.hit;

        let (place, created) = self
            .get_or_create_place(NewPlace {
                google_place_id: hit.place_id.clone(),
                name: hit.name.clone(),
                address: item.address.clone(),
                location_id: item.candidate.location_id.clone(),
                emotion_ids,
                image_url: self.app.photo_url(hit.photo_reference.as_deref()),
                google_rating: hit.rating,
                reviews: item.reviews.clone(),
                place_types: hit.types.clone(),
                status: item.status,
            })
            .await?;

        let summary = if created {
            Some(self.app.storage.add_summary(&place.id, &item.summary).await?)
        } else {
            match self.app.storage.latest_summary(&place.id).await? {
                Some(summary) => Some(summary),
                None => Some(self.app.storage.add_summary(&place.id, &item.summary).await?),
            }
        };
        Ok((place, summary))
    }

    /// Ids of the known emotions among `tags`, else of the fallback set.
    async fn emotion_ids_for_tags(&self, tags: &[String]) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        for name in tags {
            if let Some(emotion) = self
                .app
                .storage
                .find_tag_by_name(TagKind::Emotion, name)
                .await?
            {
                ids.push(emotion.id);
            }
        }
        if !ids.is_empty() {
            return Ok(ids);
        }

        for name in prompts::FALLBACK_EMOTIONS {
            if let Some(emotion) = self
                .app
                .storage
                .find_tag_by_name(TagKind::Emotion, name)
                .await?
            {
                ids.push(emotion.id);
            }
        }
        Ok(ids)
    }

    async fn get_or_create_place(&self, place: NewPlace) -> Result<(Place, bool)> {
        if let Some(existing) = self
            .app
            .storage
            .get_place_by_google_id(&place.google_place_id)
            .await?
        {
            return Ok((existing, false));
        }
        Ok((self.app.storage.create_place(place).await?, true))
    }

    async fn recommended(
        &self,
        place: Place,
        rec: RecKind,
        summary: Option<AiSummary>,
    ) -> Result<RecommendedPlace> {
        let emotions = self
            .app
            .storage
            .get_tags(TagKind::Emotion, &place.emotion_ids)
            .await?;
        let location = self
            .app
            .storage
            .get_tag(TagKind::Location, &place.location_id)
            .await?;
        Ok(RecommendedPlace {
            place,
            rec,
            emotions,
            location,
            summary,
        })
    }

    pub async fn get_session(&self, id: &str) -> Result<SessionDetail> {
        let session = self
            .app
            .storage
            .get_session(id)
            .await?
            .ok_or_else(|| MoodmapError::NotFound(format!("session {}", id)))?;

        let locations = self
            .app
            .storage
            .get_tags(TagKind::Location, &session.location_ids)
            .await?;
        let emotions = self
            .app
            .storage
            .get_tags(TagKind::Emotion, &session.emotion_ids)
            .await?;

        let mut recommendations = Vec::new();
        for recommendation in self.app.storage.list_recommendations(&session.id).await? {
            if let Some(place) = self.app.storage.get_place(&recommendation.place_id).await? {
                recommendations.push(SessionEntry {
                    recommendation,
                    place,
                });
            }
        }

        Ok(SessionDetail {
            session,
            locations,
            emotions,
            recommendations,
        })
    }

    /// Sessions of a user, newest first.
    pub async fn history(
        &self,
        user_id: &str,
        pagination: Pagination,
    ) -> Result<Page<InferenceSession>> {
        let community = &self.app.config.community;
        let (page, size, offset) =
            pagination.resolve(community.default_page_size, community.max_page_size)?;
        let total = self.app.storage.count_sessions(user_id).await?;
        let items = self
            .app
            .storage
            .list_sessions(user_id, Some(size), Some(offset))
            .await?;
        Ok(Page {
            items,
            total,
            page,
            size,
        })
    }

    // Free-form LLM helpers

    /// Known emotions related to `tags`. Falls back to the known input tags
    /// when the LLM cannot help.
    pub async fn expand_emotions(&self, tags: Vec<String>) -> Result<Vec<Emotion>> {
        let tags = dedup(tags);
        if tags.is_empty() {
            return Err(MoodmapError::Validation("emotion tags are required".to_string()));
        }

        let all = self.app.storage.list_tags(TagKind::Emotion).await?;
        let known: Vec<String> = all.iter().map(|e| e.name.clone()).collect();

        let names = match self
            .app
            .ask_llm(
                LlmTask::EmotionExpansion,
                &prompts::emotion_expansion_prompt(&known, &tags),
            )
            .await
        {
            Ok(reply) => prompts::parse_emotion_expansion(&reply, &known),
            Err(e) => {
                tracing::warn!("Emotion expansion failed, using input tags: {}", e);
                Vec::new()
            }
        };
        let names = if names.is_empty() {
            tags.into_iter().filter(|t| known.contains(t)).collect()
        } else {
            names
        };

        Ok(names
            .iter()
            .filter_map(|name| all.iter().find(|e| &e.name == name).cloned())
            .collect())
    }

    /// LLM advice on where to go instead of a closed store.
    pub async fn closed_store_recommendation(
        &self,
        closed_store_info: &str,
        nearby_stores: &[String],
    ) -> Result<String> {
        if closed_store_info.trim().is_empty() {
            return Err(MoodmapError::Validation(
                "closed store information is required".to_string(),
            ));
        }
        let nearby: Vec<String> = nearby_stores
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if nearby.is_empty() {
            return Err(MoodmapError::Validation(
                "nearby stores are required".to_string(),
            ));
        }

        let prompt = prompts::closed_store_prompt(closed_store_info.trim(), &nearby);
        Ok(self.app.ask_llm(LlmTask::ClosedStore, &prompt).await?)
    }

    /// Send a raw prompt to the LLM.
    pub async fn prompt(&self, prompt: &str) -> Result<String> {
        if prompt.trim().is_empty() {
            return Err(MoodmapError::Validation("prompt is required".to_string()));
        }
        Ok(self.app.ask_llm(LlmTask::Prompt, prompt.trim()).await?)
    }

    // Store search

    /// Summary card for the store best matching `query`.
    pub async fn search_store(&self, query: &str) -> Result<StoreCard> {
        let query = query.trim();
        if query.is_empty() {
            return Err(MoodmapError::Validation("search query is required".to_string()));
        }
        self.require_places()?;

        let place_id = self
            .app
            .find_place_id(query)
            .await?
            .ok_or_else(|| MoodmapError::NotFound(format!("store matching '{}'", query)))?;
        let details = self
            .app
            .fetch_place_details(&place_id)
            .await?
            .ok_or_else(|| MoodmapError::NotFound(format!("store matching '{}'", query)))?;

        let review_limit = self.app.config.places.review_limit;
        let reviews = prompts::review_texts(&details.reviews, review_limit);
        let (summary_card, emotion_tags) = self
            .app
            .describe_place(&details.name, details.rating, &reviews, &details.types)
            .await;
        let status = PlaceStatus::from_business_status(details.business_status.as_deref());

        Ok(StoreCard {
            address: self.app.normalize_address(&details.address).await,
            photo_url: self.app.photo_url(details.photo_reference.as_deref()),
            google_place_id: details.place_id,
            name: details.name,
            status,
            status_label: status.label().to_string(),
            rating: details.rating,
            summary_card,
            emotion_tags,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighborhood_prefers_dong_ga_chon() {
        assert_eq!(
            extract_neighborhood("서울특별시 용산구 청파동 12-34, South Korea", "용산구"),
            "청파동"
        );
        assert_eq!(
            extract_neighborhood("서울특별시 용산구 한강로2가 10", "용산구"),
            "한강로2가"
        );
        assert_eq!(extract_neighborhood("용산구 후암동, 서울", "용산구"), "후암동");
    }

    #[test]
    fn neighborhood_falls_back_to_token_after_district() {
        assert_eq!(
            extract_neighborhood("서울특별시 용산구 이태원로 27", "용산구"),
            "이태원로"
        );
    }

    #[test]
    fn neighborhood_falls_back_to_last_token() {
        assert_eq!(extract_neighborhood("Seoul Itaewon", "용산구"), "Itaewon");
        assert_eq!(extract_neighborhood("", "용산구"), "");
        assert_eq!(extract_neighborhood("   ", "용산구"), "");
    }
}
