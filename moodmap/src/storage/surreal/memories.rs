//! Memory (post) and image storage

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use surrealdb::Connection;

use super::{Binds, PROJECTION, SurrealStore, paging};
use crate::models::{Image, Memory, MemoryUpdate, NewMemory, new_id};
use crate::storage::errors::StorageError;
use crate::storage::filters::MemoryFilter;
use crate::storage::traits::MemoryStore;

fn memory_conditions(filter: &MemoryFilter) -> (String, Binds) {
    let mut conditions = Vec::new();
    let mut binds: Binds = Vec::new();

    if let Some(user_id) = &filter.user_id {
        conditions.push("user_id = $user_id");
        binds.push(("user_id", Value::from(user_id.as_str())));
    }
    if let Some(emotion_id) = &filter.emotion_id {
        conditions.push("emotion_ids CONTAINS $emotion_id");
        binds.push(("emotion_id", Value::from(emotion_id.as_str())));
    }
    if let Some(location_id) = &filter.location_id {
        conditions.push("location_id = $location_id");
        binds.push(("location_id", Value::from(location_id.as_str())));
    }

    (conditions.join(" AND "), binds)
}

#[async_trait]
impl<C> MemoryStore for SurrealStore<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn create_memory(&self, memory: NewMemory) -> Result<Memory, StorageError> {
        let id = new_id();
        self.insert("memory", &id, memory).await
    }

    async fn get_memory(&self, id: &str) -> Result<Option<Memory>, StorageError> {
        self.fetch("memory", id).await
    }

    async fn update_memory(&self, id: &str, update: MemoryUpdate) -> Result<Memory, StorageError> {
        let mut patch = Map::new();
        if let Some(content) = update.content {
            patch.insert("content".to_string(), Value::from(content));
        }
        if let Some(emotion_ids) = update.emotion_ids {
            patch.insert("emotion_ids".to_string(), json!(emotion_ids));
        }
        if let Some(location_id) = update.location_id {
            patch.insert("location_id".to_string(), json!(location_id));
        }

        self.merge("memory", id, Value::Object(patch)).await
    }

    async fn delete_memory(&self, id: &str) -> Result<bool, StorageError> {
        if !self.exists("memory", id).await? {
            return Ok(false);
        }

        self.execute(
            r#"
            BEGIN TRANSACTION;
            DELETE image WHERE memory_id = $id;
            DELETE comment WHERE memory_id = $id;
            DELETE bookmark WHERE memory_id = $id;
            DELETE type::thing("memory", $id);
            COMMIT TRANSACTION;
            "#,
            vec![("id", Value::from(id))],
            "delete memory",
        )
        .await?;
        Ok(true)
    }

    async fn list_memories(
        &self,
        filter: &MemoryFilter,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Memory>, StorageError> {
        let (conditions, binds) = memory_conditions(filter);
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions)
        };

        self.rows(
            format!(
                "SELECT {PROJECTION} FROM memory{} ORDER BY created_at DESC{}",
                where_clause,
                paging(limit, offset)
            ),
            binds,
            "list memories",
        )
        .await
    }

    async fn count_memories(&self, filter: &MemoryFilter) -> Result<usize, StorageError> {
        let (conditions, binds) = memory_conditions(filter);
        self.count("memory", &conditions, binds).await
    }

    async fn add_image(
        &self,
        memory_id: &str,
        image_url: &str,
        image_key: &str,
        image_name: &str,
    ) -> Result<Image, StorageError> {
        if !self.exists("memory", memory_id).await? {
            return Err(StorageError::NotFound(format!("memory {}", memory_id)));
        }

        let id = new_id();
        self.insert(
            "image",
            &id,
            json!({
                "memory_id": memory_id,
                "image_url": image_url,
                "image_key": image_key,
                "image_name": image_name,
            }),
        )
        .await
    }

    async fn get_image(&self, id: &str) -> Result<Option<Image>, StorageError> {
        self.fetch("image", id).await
    }

    async fn list_images(&self, memory_id: &str) -> Result<Vec<Image>, StorageError> {
        self.rows(
            format!("SELECT {PROJECTION} FROM image WHERE memory_id = $memory_id ORDER BY created_at ASC"),
            vec![("memory_id", Value::from(memory_id))],
            "list images",
        )
        .await
    }

    async fn delete_image(&self, id: &str) -> Result<bool, StorageError> {
        self.remove("image", id).await
    }
}
