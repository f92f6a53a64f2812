//! Emotion and location tags

use async_trait::async_trait;
use serde_json::{Value, json};
use surrealdb::Connection;

use super::{PROJECTION, SurrealStore};
use crate::models::{Tag, TagKind};
use crate::storage::errors::StorageError;
use crate::storage::traits::TagStore;

const TAG_ID_ATTEMPTS: usize = 3;

/// Numeric ids sort numerically and before anything else.
fn id_order(a: &Tag, b: &Tag) -> std::cmp::Ordering {
    match (a.id.parse::<u64>(), b.id.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => std::cmp::Ordering::Less,
        (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
        (Err(_), Err(_)) => a.id.cmp(&b.id),
    }
}

impl<C> SurrealStore<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn next_tag_id(&self, kind: TagKind) -> Result<String, StorageError> {
        let ids: Vec<String> = self
            .rows(
                format!("SELECT VALUE record::id(id) FROM {}", kind.table()),
                vec![],
                "read tag ids",
            )
            .await?;
        let max = ids
            .iter()
            .filter_map(|id| id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        max.checked_add(1)
            .map(|next| next.to_string())
            .ok_or_else(|| StorageError::Validation(format!("no numeric {} id after {}", kind, max)))
    }
}

#[async_trait]
impl<C> TagStore for SurrealStore<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn create_tag(
        &self,
        kind: TagKind,
        id: Option<String>,
        name: &str,
    ) -> Result<Tag, StorageError> {
        if self.find_tag_by_name(kind, name).await?.is_some() {
            return Err(StorageError::AlreadyExists(format!("{} {}", kind, name)));
        }

        if let Some(id) = id {
            if self.exists(kind.table(), &id).await? {
                return Err(StorageError::AlreadyExists(format!("{} id {}", kind, id)));
            }
            return self.insert(kind.table(), &id, json!({ "name": name })).await;
        }

        // A concurrent create may take the same id first.
        let mut attempt = 1;
        loop {
            let id = self.next_tag_id(kind).await?;
            match self.insert(kind.table(), &id, json!({ "name": name })).await {
                Err(StorageError::AlreadyExists(message)) => {
                    if attempt >= TAG_ID_ATTEMPTS
                        || self.find_tag_by_name(kind, name).await?.is_some()
                    {
                        return Err(StorageError::AlreadyExists(message));
                    }
                    tracing::debug!(%kind, id = %id, "Tag id taken concurrently, retrying");
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    async fn get_tag(&self, kind: TagKind, id: &str) -> Result<Option<Tag>, StorageError> {
        self.fetch(kind.table(), id).await
    }

    async fn get_tags(&self, kind: TagKind, ids: &[String]) -> Result<Vec<Tag>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let found: Vec<Tag> = self
            .rows(
                format!(
                    "SELECT {PROJECTION} FROM {} WHERE record::id(id) INSIDE $ids",
                    kind.table()
                ),
                vec![("ids", json!(ids))],
                "get tags",
            )
            .await?;

        Ok(ids
            .iter()
            .filter_map(|id| found.iter().find(|tag| &tag.id == id).cloned())
            .collect())
    }

    async fn find_tag_by_name(&self, kind: TagKind, name: &str) -> Result<Option<Tag>, StorageError> {
        let tags: Vec<Tag> = self
            .rows(
                format!(
                    "SELECT {PROJECTION} FROM {} WHERE name = $name LIMIT 1",
                    kind.table()
                ),
                vec![("name", Value::from(name))],
                "find tag by name",
            )
            .await?;
        Ok(tags.into_iter().next())
    }

    async fn list_tags(&self, kind: TagKind) -> Result<Vec<Tag>, StorageError> {
        let mut tags: Vec<Tag> = self
            .rows(
                format!("SELECT {PROJECTION} FROM {}", kind.table()),
                vec![],
                "list tags",
            )
            .await?;
        tags.sort_by(id_order);
        Ok(tags)
    }

    async fn rename_tag(&self, kind: TagKind, id: &str, name: &str) -> Result<Tag, StorageError> {
        if let Some(existing) = self.find_tag_by_name(kind, name).await?
            && existing.id != id
        {
            return Err(StorageError::AlreadyExists(format!("{} {}", kind, name)));
        }
        self.merge(kind.table(), id, json!({ "name": name })).await
    }

    async fn delete_tag(&self, kind: TagKind, id: &str) -> Result<bool, StorageError> {
        if !self.exists(kind.table(), id).await? {
            return Ok(false);
        }

        match kind {
            TagKind::Emotion => {
                self.execute(
                    r#"
                    BEGIN TRANSACTION;
                    UPDATE memory SET emotion_ids -= $id WHERE emotion_ids CONTAINS $id;
                    UPDATE place SET emotion_ids -= $id WHERE emotion_ids CONTAINS $id;
                    UPDATE inference_session SET emotion_ids -= $id WHERE emotion_ids CONTAINS $id;
                    DELETE type::thing("emotion", $id);
                    COMMIT TRANSACTION;
                    "#,
                    vec![("id", Value::from(id))],
                    "delete emotion",
                )
                .await?;
            }
            TagKind::Location => {
                let places = self
                    .count("place", "location_id = $id", vec![("id", Value::from(id))])
                    .await?;
                if places > 0 {
                    return Err(StorageError::Constraint(format!(
                        "location {} is still used by {} place(s)",
                        id, places
                    )));
                }

                self.execute(
                    r#"
                    BEGIN TRANSACTION;
                    UPDATE memory SET location_id = NONE WHERE location_id = $id;
                    LET $sessions = (SELECT VALUE record::id(id) FROM inference_session WHERE location_ids CONTAINS $id);
                    DELETE inference_recommendation WHERE session_id INSIDE $sessions;
                    DELETE inference_session WHERE location_ids CONTAINS $id;
                    DELETE type::thing("location", $id);
                    COMMIT TRANSACTION;
                    "#,
                    vec![("id", Value::from(id))],
                    "delete location",
                )
                .await?;
            }
        }

        tracing::debug!("Deleted {} {}", kind, id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::surreal::EmbeddedStore;

    async fn store() -> EmbeddedStore {
        let client = surrealdb::Surreal::new::<surrealdb::engine::local::Mem>(())
            .await
            .unwrap();
        SurrealStore::new(client, "test", "tags").await.unwrap()
    }

    fn tag(id: &str) -> Tag {
        Tag {
            id: id.to_string(),
            name: id.to_string(),
        }
    }

    #[test]
    fn numeric_ids_sort_numerically() {
        let mut tags = vec![tag("10"), tag("abc"), tag("2"), tag("1")];
        tags.sort_by(id_order);
        let ids: Vec<_> = tags.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "10", "abc"]);
    }

    #[tokio::test]
    async fn next_id_follows_the_largest_numeric_id() {
        let store = store().await;
        store.create_tag(TagKind::Emotion, Some("9".into()), "정겨움").await.unwrap();
        store.create_tag(TagKind::Emotion, Some("abc".into()), "편안함").await.unwrap();

        let tag = store.create_tag(TagKind::Emotion, None, "조용함").await.unwrap();
        assert_eq!(tag.id, "10");
    }

    #[tokio::test]
    async fn exhausted_numeric_ids_are_an_error() {
        let store = store().await;
        store
            .create_tag(TagKind::Location, Some(u64::MAX.to_string()), "끝동")
            .await
            .unwrap();

        let err = store
            .create_tag(TagKind::Location, None, "다음동")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Validation(_)));
    }

    #[tokio::test]
    async fn duplicate_record_ids_are_already_exists() {
        let store = store().await;
        let first: Tag = store
            .insert("emotion", "7", json!({ "name": "정겨움" }))
            .await
            .unwrap();
        assert_eq!(first.id, "7");

        let err = store
            .insert::<Tag, _>("emotion", "7", json!({ "name": "소박함" }))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists(_)));
    }
}
