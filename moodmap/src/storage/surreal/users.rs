//! User storage

use async_trait::async_trait;
use serde_json::Value;
use surrealdb::Connection;

use super::{PROJECTION, SurrealStore};
use crate::models::{NewUser, User, UserUpdate, new_id};
use crate::storage::errors::StorageError;
use crate::storage::traits::UserStore;

#[async_trait]
impl<C> UserStore for SurrealStore<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn create_user(&self, user: NewUser) -> Result<User, StorageError> {
        if self.get_user_by_email(&user.email).await?.is_some() {
            return Err(StorageError::AlreadyExists(format!(
                "email {} is already registered",
                user.email
            )));
        }
        if self.get_user_by_nickname(&user.nickname).await?.is_some() {
            return Err(StorageError::AlreadyExists(format!(
                "nickname {} is already taken",
                user.nickname
            )));
        }

        let id = new_id();
        let created: User = self.insert("user", &id, user).await?;
        tracing::debug!("Created user {}", created.id);
        Ok(created)
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, StorageError> {
        self.fetch("user", id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let users: Vec<User> = self
            .rows(
                format!("SELECT {PROJECTION} FROM user WHERE email = $email LIMIT 1"),
                vec![("email", Value::from(email))],
                "find user by email",
            )
            .await?;
        Ok(users.into_iter().next())
    }

    async fn get_user_by_nickname(&self, nickname: &str) -> Result<Option<User>, StorageError> {
        let users: Vec<User> = self
            .rows(
                format!("SELECT {PROJECTION} FROM user WHERE nickname = $nickname LIMIT 1"),
                vec![("nickname", Value::from(nickname))],
                "find user by nickname",
            )
            .await?;
        Ok(users.into_iter().next())
    }

    async fn update_user(&self, id: &str, update: UserUpdate) -> Result<User, StorageError> {
        if let Some(nickname) = &update.nickname
            && let Some(existing) = self.get_user_by_nickname(nickname).await?
            && existing.id != id
        {
            return Err(StorageError::AlreadyExists(format!(
                "nickname {} is already taken",
                nickname
            )));
        }

        let patch = serde_json::to_value(&update)?;
        self.merge("user", id, patch).await
    }

    async fn delete_user(&self, id: &str) -> Result<bool, StorageError> {
        if !self.exists("user", id).await? {
            return Ok(false);
        }

        self.execute(
            r#"
            BEGIN TRANSACTION;
            LET $memories = (SELECT VALUE record::id(id) FROM memory WHERE user_id = $id);
            DELETE image WHERE memory_id INSIDE $memories;
            DELETE comment WHERE memory_id INSIDE $memories OR user_id = $id;
            DELETE bookmark WHERE memory_id INSIDE $memories OR user_id = $id;
            DELETE memory WHERE user_id = $id;
            DELETE saved_place WHERE user_id = $id;
            LET $sessions = (SELECT VALUE record::id(id) FROM inference_session WHERE user_id = $id);
            DELETE inference_recommendation WHERE session_id INSIDE $sessions;
            DELETE inference_session WHERE user_id = $id;
            DELETE type::thing("user", $id);
            COMMIT TRANSACTION;
            "#,
            vec![("id", Value::from(id))],
            "delete user",
        )
        .await?;

        tracing::debug!("Deleted user {} and owned records", id);
        Ok(true)
    }
}
