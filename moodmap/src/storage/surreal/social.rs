//! Bookmarks and comments

use async_trait::async_trait;
use serde_json::{Value, json};
use surrealdb::Connection;

use super::{PROJECTION, SurrealStore};
use crate::models::{Bookmark, Comment, new_id};
use crate::storage::errors::StorageError;
use crate::storage::traits::{BookmarkStore, CommentStore};

#[async_trait]
impl<C> BookmarkStore for SurrealStore<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn create_bookmark(&self, user_id: &str, memory_id: &str) -> Result<Bookmark, StorageError> {
        if self.find_bookmark(user_id, memory_id).await?.is_some() {
            return Err(StorageError::AlreadyExists(format!(
                "memory {} is already bookmarked",
                memory_id
            )));
        }
        if !self.exists("memory", memory_id).await? {
            return Err(StorageError::NotFound(format!("memory {}", memory_id)));
        }

        let id = new_id();
        self.insert(
            "bookmark",
            &id,
            json!({ "user_id": user_id, "memory_id": memory_id }),
        )
        .await
    }

    async fn get_bookmark(&self, id: &str) -> Result<Option<Bookmark>, StorageError> {
        self.fetch("bookmark", id).await
    }

    async fn find_bookmark(
        &self,
        user_id: &str,
        memory_id: &str,
    ) -> Result<Option<Bookmark>, StorageError> {
        let rows: Vec<Bookmark> = self
            .rows(
                format!(
                    "SELECT {PROJECTION} FROM bookmark WHERE user_id = $user_id AND memory_id = $memory_id LIMIT 1"
                ),
                vec![
                    ("user_id", Value::from(user_id)),
                    ("memory_id", Value::from(memory_id)),
                ],
                "find bookmark",
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn list_bookmarks(&self, user_id: &str) -> Result<Vec<Bookmark>, StorageError> {
        self.rows(
            format!("SELECT {PROJECTION} FROM bookmark WHERE user_id = $user_id ORDER BY created_at DESC"),
            vec![("user_id", Value::from(user_id))],
            "list bookmarks",
        )
        .await
    }

    async fn delete_bookmark(&self, id: &str) -> Result<bool, StorageError> {
        self.remove("bookmark", id).await
    }
}

#[async_trait]
impl<C> CommentStore for SurrealStore<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn create_comment(
        &self,
        memory_id: &str,
        user_id: &str,
        nickname: &str,
        content: &str,
    ) -> Result<Comment, StorageError> {
        if !self.exists("memory", memory_id).await? {
            return Err(StorageError::NotFound(format!("memory {}", memory_id)));
        }

        let id = new_id();
        self.insert(
            "comment",
            &id,
            json!({
                "memory_id": memory_id,
                "user_id": user_id,
                "nickname": nickname,
                "content": content,
            }),
        )
        .await
    }

    async fn get_comment(&self, id: &str) -> Result<Option<Comment>, StorageError> {
        self.fetch("comment", id).await
    }

    async fn update_comment(&self, id: &str, content: &str) -> Result<Comment, StorageError> {
        self.merge("comment", id, json!({ "content": content })).await
    }

    async fn delete_comment(&self, id: &str) -> Result<bool, StorageError> {
        self.remove("comment", id).await
    }

    async fn list_comments(&self, memory_id: &str) -> Result<Vec<Comment>, StorageError> {
        self.rows(
            format!("SELECT {PROJECTION} FROM comment WHERE memory_id = $memory_id ORDER BY created_at ASC"),
            vec![("memory_id", Value::from(memory_id))],
            "list comments",
        )
        .await
    }

    async fn count_comments(&self, memory_id: &str) -> Result<usize, StorageError> {
        self.count(
            "comment",
            "memory_id = $memory_id",
            vec![("memory_id", Value::from(memory_id))],
        )
        .await
    }
}
