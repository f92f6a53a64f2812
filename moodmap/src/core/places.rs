//! Places, their summaries, saved places and the taste profile they feed.

use serde::Deserialize;

use super::community::{dedup, required};
use super::external::LlmTask;
use super::{Moodmap, Pagination, conflict, extract_neighborhood};
use crate::models::{
    AiSummary, NewPlace, Page, Place, PlaceStatus, PlaceView, RecKind, SavedPlace, SavedPlaceView,
    TagKind, UserUpdate, new_id,
};
use crate::prompts;
use crate::providers::ProviderError;
use crate::storage::PlaceFilter;
use crate::{MoodmapError, Result};

/// A place entered by hand.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceInput {
    pub name: String,
    pub address: String,
    pub google_place_id: Option<String>,
    /// Derived from the address when absent
    pub location_id: Option<String>,
    #[serde(default)]
    pub emotion_ids: Vec<String>,
    pub image_url: Option<String>,
    pub google_rating: Option<f64>,
    #[serde(default)]
    pub status: PlaceStatus,
}

pub struct Places<'a> {
    app: &'a Moodmap,
}

impl<'a> Places<'a> {
    pub(crate) fn new(app: &'a Moodmap) -> Self {
        Self { app }
    }

    pub async fn create_place(&self, input: PlaceInput) -> Result<PlaceView> {
        let name = required(&input.name, "name")?;
        let address = required(&input.address, "address")?;
        let emotion_ids = dedup(input.emotion_ids);
        self.app
            .community()
            .require_tags(TagKind::Emotion, &emotion_ids)
            .await?;

        let location_id = match input.location_id.filter(|id| !id.is_empty()) {
            Some(id) => self.app.community().get_tag(TagKind::Location, &id).await?.id,
            None => self.location_for_address(&address).await?,
        };

        let google_place_id = input
            .google_place_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("manual-{}", new_id()));

        let place = self
            .app
            .storage
            .create_place(NewPlace {
                google_place_id,
                name,
                address,
                location_id,
                emotion_ids,
                image_url: input.image_url,
                google_rating: input.google_rating,
                reviews: Vec::new(),
                place_types: Vec::new(),
                status: input.status,
            })
            .await
            .map_err(conflict)?;

        self.view(place).await
    }

    /// Location tag for the neighbourhood of an address, created on demand.
    pub(crate) async fn location_for_address(&self, address: &str) -> Result<String> {
        let district = &self.app.config.places.district;
        let mut neighborhood = extract_neighborhood(address, district);
        if neighborhood.is_empty() {
            neighborhood = district.clone();
        }
        let tag = self
            .app
            .community()
            .get_or_create_tag(TagKind::Location, &neighborhood)
            .await?;
        Ok(tag.id)
    }

    pub(crate) async fn place(&self, id: &str) -> Result<Place> {
        self.app
            .storage
            .get_place(id)
            .await?
            .ok_or_else(|| MoodmapError::NotFound(format!("place {}", id)))
    }

    pub async fn get_place(&self, id: &str) -> Result<PlaceView> {
        let place = self.place(id).await?;
        self.view(place).await
    }

    /// Newest first.
    pub async fn list_places(
        &self,
        filter: &PlaceFilter,
        pagination: Pagination,
    ) -> Result<Page<PlaceView>> {
        let community = &self.app.config.community;
        let (page, size, offset) =
            pagination.resolve(community.default_page_size, community.max_page_size)?;

        let total = self.app.storage.count_places(filter).await?;
        let places = self
            .app
            .storage
            .list_places(filter, Some(size), Some(offset))
            .await?;

        let mut items = Vec::with_capacity(places.len());
        for place in places {
            items.push(self.view(place).await?);
        }
        Ok(Page {
            items,
            total,
            page,
            size,
        })
    }

    pub async fn update_status(&self, id: &str, status: PlaceStatus) -> Result<PlaceView> {
        let place = self
            .app
            .storage
            .update_place_status(id, status)
            .await
            .map_err(conflict)?;
        tracing::info!(place_id = id, status = status.label(), "Updated place status");
        self.view(place).await
    }

    pub(crate) async fn view(&self, place: Place) -> Result<PlaceView> {
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
        let summary = self.app.storage.latest_summary(&place.id).await?;
        Ok(PlaceView {
            place,
            emotions,
            location,
            summary,
        })
    }

    // Summaries

    pub async fn latest_summary(&self, place_id: &str) -> Result<Option<AiSummary>> {
        self.place(place_id).await?;
        Ok(self.app.storage.latest_summary(place_id).await?)
    }

    /// Ask the LLM for a fresh summary and store it. Provider failures are
    /// returned to the caller.
    pub async fn regenerate_summary(&self, place_id: &str) -> Result<AiSummary> {
        let place = self.place(place_id).await?;

        let reviews = prompts::review_texts(&place.reviews, self.app.config.places.review_limit);
        let prompt = if reviews.is_empty() {
            prompts::place_summary_prompt(&place.name, &place.address)
        } else {
            prompts::summary_card_prompt(
                &place.name,
                place.google_rating,
                &reviews,
                &place.place_types,
            )
        };

        let reply = self.app.ask_llm_fresh(LlmTask::Summary, &prompt).await?;
        let summary = prompts::parse_summary(&reply);
        if summary.is_empty() {
            return Err(ProviderError::Empty("summary".to_string()).into());
        }
        Ok(self.app.storage.add_summary(place_id, &summary).await?)
    }

    // Saved places

    /// Save a place for a user and refresh their taste profile.
    pub async fn save_place(&self, user_id: &str, place_id: &str, rec: RecKind) -> Result<SavedPlace> {
        self.app.require_user(user_id).await?;
        self.place(place_id).await?;
        let snapshot = self
            .app
            .storage
            .latest_summary(place_id)
            .await?
            .map(|s| s.summary)
            .unwrap_or_default();

        let saved = self
            .app
            .storage
            .create_saved_place(user_id, place_id, rec, &snapshot)
            .await
            .map_err(conflict)?;

        self.refresh_after_change(user_id).await;
        Ok(saved)
    }

    /// Saved places of a user, newest first.
    pub async fn list_saved(&self, user_id: &str) -> Result<Vec<SavedPlaceView>> {
        let mut views = Vec::new();
        for saved in self.app.storage.list_saved_places(user_id).await? {
            if let Some(place) = self.app.storage.get_place(&saved.place_id).await? {
                views.push(SavedPlaceView { saved, place });
            }
        }
        Ok(views)
    }

    pub async fn delete_saved(&self, user_id: &str, id: &str) -> Result<()> {
        let saved = self
            .app
            .storage
            .get_saved_place(id)
            .await?
            .ok_or_else(|| MoodmapError::NotFound(format!("saved place {}", id)))?;
        if saved.user_id != user_id {
            return Err(MoodmapError::Forbidden(
                "only the owner may remove this saved place".to_string(),
            ));
        }

        self.app.storage.delete_saved_place(id).await?;
        self.refresh_after_change(user_id).await;
        Ok(())
    }

    async fn refresh_after_change(&self, user_id: &str) {
        if let Err(e) = self.refresh_taste_profile(user_id).await {
            tracing::warn!(user_id, "Failed to refresh taste profile: {}", e);
        }
    }

    /// Names of the three emotions seen most often over the user's saved
    /// places. Ties keep the order in which emotions were first seen.
    pub async fn top_saved_emotions(&self, user_id: &str) -> Result<Vec<String>> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for saved in self.app.storage.list_saved_places(user_id).await? {
            let Some(place) = self.app.storage.get_place(&saved.place_id).await? else {
                continue;
            };
            for emotion_id in place.emotion_ids {
                match counts.iter_mut().find(|(id, _)| *id == emotion_id) {
                    Some((_, count)) => *count += 1,
                    None => counts.push((emotion_id, 1)),
                }
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1));

        let top: Vec<String> = counts.into_iter().take(3).map(|(id, _)| id).collect();
        let emotions = self.app.storage.get_tags(TagKind::Emotion, &top).await?;
        Ok(emotions.into_iter().map(|e| e.name).collect())
    }

    /// Regenerate `User.detail` from the user's saved places.
    ///
    /// No saved emotions clears the detail. Without an LLM, or when the call
    /// fails, the previous detail stays.
    pub async fn refresh_taste_profile(&self, user_id: &str) -> Result<String> {
        let user = self.app.accounts().get_user(user_id).await?;
        let top = self.top_saved_emotions(user_id).await?;

        let detail = if top.is_empty() {
            String::new()
        } else {
            match self
                .app
                .ask_llm(LlmTask::TasteProfile, &prompts::taste_profile_prompt(&top))
                .await
            {
                Ok(reply) => prompts::parse_taste_profile(&reply),
                Err(ProviderError::NotConfigured(_)) => {
                    tracing::debug!(user_id, "LLM not configured, keeping taste profile");
                    return Ok(user.detail);
                }
                Err(e) => {
                    tracing::warn!(user_id, "Taste profile generation failed: {}", e);
                    return Ok(user.detail);
                }
            }
        };

        if detail != user.detail {
            let patch = UserUpdate {
                detail: Some(detail.clone()),
                ..UserUpdate::default()
            };
            self.app.storage.update_user(user_id, patch).await?;
            tracing::debug!(user_id, detail = %detail, "Updated taste profile");
        }
        Ok(detail)
    }
}
