//! Places, AI summaries and saved places

use async_trait::async_trait;
use serde_json::{Value, json};
use surrealdb::Connection;

use super::{Binds, PROJECTION, SurrealStore, paging};
use crate::models::{AiSummary, NewPlace, Place, PlaceStatus, RecKind, SavedPlace, new_id};
use crate::storage::errors::StorageError;
use crate::storage::filters::PlaceFilter;
use crate::storage::traits::{PlaceStore, SavedPlaceStore};

fn place_conditions(filter: &PlaceFilter) -> Result<(String, Binds), StorageError> {
    let mut conditions = Vec::new();
    let mut binds: Binds = Vec::new();

    if let Some(location_id) = &filter.location_id {
        conditions.push("location_id = $location_id");
        binds.push(("location_id", Value::from(location_id.as_str())));
    }
    if let Some(emotion_id) = &filter.emotion_id {
        conditions.push("emotion_ids CONTAINS $emotion_id");
        binds.push(("emotion_id", Value::from(emotion_id.as_str())));
    }
    if let Some(status) = &filter.status {
        conditions.push("status = $status");
        binds.push(("status", serde_json::to_value(status)?));
    }
    if let Some(name) = &filter.name_contains {
        conditions.push("string::contains(name, $name)");
        binds.push(("name", Value::from(name.as_str())));
    }

    Ok((conditions.join(" AND "), binds))
}

#[async_trait]
impl<C> PlaceStore for SurrealStore<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn create_place(&self, place: NewPlace) -> Result<Place, StorageError> {
        if self
            .get_place_by_google_id(&place.google_place_id)
            .await?
            .is_some()
        {
            return Err(StorageError::AlreadyExists(format!(
                "place {}",
                place.google_place_id
            )));
        }
        if !self.exists("location", &place.location_id).await? {
            return Err(StorageError::NotFound(format!(
                "location {}",
                place.location_id
            )));
        }

        let id = new_id();
        self.insert("place", &id, place).await
    }

    async fn get_place(&self, id: &str) -> Result<Option<Place>, StorageError> {
        self.fetch("place", id).await
    }

    async fn get_place_by_google_id(
        &self,
        google_place_id: &str,
    ) -> Result<Option<Place>, StorageError> {
        let rows: Vec<Place> = self
            .rows(
                format!("SELECT {PROJECTION} FROM place WHERE google_place_id = $gid LIMIT 1"),
                vec![("gid", Value::from(google_place_id))],
                "find place by google id",
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn update_place_status(&self, id: &str, status: PlaceStatus) -> Result<Place, StorageError> {
        self.merge("place", id, json!({ "status": status })).await
    }

    async fn set_place_emotions(
        &self,
        id: &str,
        emotion_ids: Vec<String>,
    ) -> Result<Place, StorageError> {
        self.merge("place", id, json!({ "emotion_ids": emotion_ids }))
            .await
    }

    async fn list_places(
        &self,
        filter: &PlaceFilter,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Place>, StorageError> {
        let (conditions, binds) = place_conditions(filter)?;
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions)
        };

        self.rows(
            format!(
                "SELECT {PROJECTION} FROM place{} ORDER BY created_at DESC{}",
                where_clause,
                paging(limit, offset)
            ),
            binds,
            "list places",
        )
        .await
    }

    async fn count_places(&self, filter: &PlaceFilter) -> Result<usize, StorageError> {
        let (conditions, binds) = place_conditions(filter)?;
        self.count("place", &conditions, binds).await
    }

    async fn delete_place(&self, id: &str) -> Result<bool, StorageError> {
        if !self.exists("place", id).await? {
            return Ok(false);
        }

        self.execute(
            r#"
            BEGIN TRANSACTION;
            DELETE ai_summary WHERE place_id = $id;
            DELETE saved_place WHERE place_id = $id;
            DELETE inference_recommendation WHERE place_id = $id;
            DELETE type::thing("place", $id);
            COMMIT TRANSACTION;
            "#,
            vec![("id", Value::from(id))],
            "delete place",
        )
        .await?;
        Ok(true)
    }

    async fn add_summary(&self, place_id: &str, summary: &str) -> Result<AiSummary, StorageError> {
        if !self.exists("place", place_id).await? {
            return Err(StorageError::NotFound(format!("place {}", place_id)));
        }

        let id = new_id();
        self.insert(
            "ai_summary",
            &id,
            json!({ "place_id": place_id, "summary": summary }),
        )
        .await
    }

    async fn latest_summary(&self, place_id: &str) -> Result<Option<AiSummary>, StorageError> {
        let rows: Vec<AiSummary> = self
            .rows(
                format!(
                    "SELECT {PROJECTION} FROM ai_summary WHERE place_id = $place_id ORDER BY created_at DESC LIMIT 1"
                ),
                vec![("place_id", Value::from(place_id))],
                "latest summary",
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn list_summaries(&self, place_id: &str) -> Result<Vec<AiSummary>, StorageError> {
        self.rows(
            format!(
                "SELECT {PROJECTION} FROM ai_summary WHERE place_id = $place_id ORDER BY created_at DESC"
            ),
            vec![("place_id", Value::from(place_id))],
            "list summaries",
        )
        .await
    }
}

#[async_trait]
impl<C> SavedPlaceStore for SurrealStore<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn create_saved_place(
        &self,
        user_id: &str,
        place_id: &str,
        rec: RecKind,
        summary_snapshot: &str,
    ) -> Result<SavedPlace, StorageError> {
        if self.find_saved_place(user_id, place_id, rec).await?.is_some() {
            return Err(StorageError::AlreadyExists(format!(
                "place {} is already saved",
                place_id
            )));
        }
        if !self.exists("place", place_id).await? {
            return Err(StorageError::NotFound(format!("place {}", place_id)));
        }

        let id = new_id();
        self.insert(
            "saved_place",
            &id,
            json!({
                "user_id": user_id,
                "place_id": place_id,
                "rec": rec,
                "summary_snapshot": summary_snapshot,
            }),
        )
        .await
    }

    async fn get_saved_place(&self, id: &str) -> Result<Option<SavedPlace>, StorageError> {
        self.fetch("saved_place", id).await
    }

    async fn find_saved_place(
        &self,
        user_id: &str,
        place_id: &str,
        rec: RecKind,
    ) -> Result<Option<SavedPlace>, StorageError> {
        let rows: Vec<SavedPlace> = self
            .rows(
                format!(
                    "SELECT {PROJECTION} FROM saved_place WHERE user_id = $user_id AND place_id = $place_id AND rec = $rec LIMIT 1"
                ),
                vec![
                    ("user_id", Value::from(user_id)),
                    ("place_id", Value::from(place_id)),
                    ("rec", json!(rec)),
                ],
                "find saved place",
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn list_saved_places(&self, user_id: &str) -> Result<Vec<SavedPlace>, StorageError> {
        self.rows(
            format!(
                "SELECT {PROJECTION} FROM saved_place WHERE user_id = $user_id ORDER BY created_at DESC"
            ),
            vec![("user_id", Value::from(user_id))],
            "list saved places",
        )
        .await
    }

    async fn delete_saved_place(&self, id: &str) -> Result<bool, StorageError> {
        self.remove("saved_place", id).await
    }
}
