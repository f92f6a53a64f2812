//! Inference sessions

use async_trait::async_trait;
use serde_json::{Value, json};
use surrealdb::Connection;

use super::{PROJECTION, SurrealStore, paging};
use crate::models::{InferenceRecommendation, InferenceSession, new_id};
use crate::storage::errors::StorageError;
use crate::storage::traits::InferenceStore;

#[async_trait]
impl<C> InferenceStore for SurrealStore<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn create_session(
        &self,
        user_id: Option<&str>,
        location_ids: Vec<String>,
        emotion_ids: Vec<String>,
        overall_recommendation: &str,
    ) -> Result<InferenceSession, StorageError> {
        let id = new_id();
        self.insert(
            "inference_session",
            &id,
            json!({
                "user_id": user_id,
                "location_ids": location_ids,
                "emotion_ids": emotion_ids,
                "overall_recommendation": overall_recommendation,
            }),
        )
        .await
    }

    async fn get_session(&self, id: &str) -> Result<Option<InferenceSession>, StorageError> {
        self.fetch("inference_session", id).await
    }

    async fn list_sessions(
        &self,
        user_id: &str,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<InferenceSession>, StorageError> {
        self.rows(
            format!(
                "SELECT {PROJECTION} FROM inference_session WHERE user_id = $user_id ORDER BY created_at DESC{}",
                paging(limit, offset)
            ),
            vec![("user_id", Value::from(user_id))],
            "list sessions",
        )
        .await
    }

    async fn count_sessions(&self, user_id: &str) -> Result<usize, StorageError> {
        self.count(
            "inference_session",
            "user_id = $user_id",
            vec![("user_id", Value::from(user_id))],
        )
        .await
    }

    async fn add_recommendation(
        &self,
        session_id: &str,
        place_id: &str,
        summary: &str,
        emotion_tags: Vec<String>,
        rank: u32,
    ) -> Result<InferenceRecommendation, StorageError> {
        if !self.exists("inference_session", session_id).await? {
            return Err(StorageError::NotFound(format!("session {}", session_id)));
        }

        let id = new_id();
        self.insert(
            "inference_recommendation",
            &id,
            json!({
                "session_id": session_id,
                "place_id": place_id,
                "summary": summary,
                "emotion_tags": emotion_tags,
                "rank": rank,
            }),
        )
        .await
    }

    async fn list_recommendations(
        &self,
        session_id: &str,
    ) -> Result<Vec<InferenceRecommendation>, StorageError> {
        self.rows(
            format!(
                "SELECT {PROJECTION} FROM inference_recommendation WHERE session_id = $session_id ORDER BY rank ASC"
            ),
            vec![("session_id", Value::from(session_id))],
            "list recommendations",
        )
        .await
    }
}
