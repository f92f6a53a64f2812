//! Tags, memories, images, bookmarks and comments.

use serde::Deserialize;

use super::{Moodmap, conflict};
use crate::blob::{self, Upload};
use crate::models::{
    Bookmark, BookmarkView, Comment, Image, Memory, MemoryUpdate, MemoryView, NewMemory, Page, Tag,
    TagKind, TagOptions,
};
use crate::storage::MemoryFilter;
use crate::{MoodmapError, Result};

/// Requested page, 1-based. Missing values fall back to the configured
/// defaults.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Pagination {
    pub page: Option<usize>,
    pub size: Option<usize>,
}

impl Pagination {
    pub fn new(page: usize, size: usize) -> Self {
        Self {
            page: Some(page),
            size: Some(size),
        }
    }

    /// `(page, size, offset)` clamped to the configured limits.
    ///
    /// Pages whose offset does not fit an `i64` are rejected.
    pub(crate) fn resolve(
        &self,
        default_size: usize,
        max_size: usize,
    ) -> Result<(usize, usize, usize)> {
        let page = self.page.unwrap_or(1).max(1);
        let size = self.size.unwrap_or(default_size).clamp(1, max_size);
        let offset = (page - 1)
            .checked_mul(size)
            .filter(|offset| i64::try_from(*offset).is_ok())
            .ok_or_else(|| MoodmapError::Validation(format!("page {} is out of range", page)))?;
        Ok((page, size, offset))
    }
}

/// Content and tags of a memory being written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemoryInput {
    pub content: String,
    #[serde(default)]
    pub emotion_ids: Vec<String>,
    pub location_id: Option<String>,
}

pub struct Community<'a> {
    app: &'a Moodmap,
}

impl<'a> Community<'a> {
    pub(crate) fn new(app: &'a Moodmap) -> Self {
        Self { app }
    }

    // Tags

    pub async fn create_tag(&self, kind: TagKind, name: &str) -> Result<Tag> {
        let name = required(name, "name")?;
        self.app
            .storage
            .create_tag(kind, None, &name)
            .await
            .map_err(conflict)
    }

    /// Existing tag with this name, or a new one.
    pub async fn get_or_create_tag(&self, kind: TagKind, name: &str) -> Result<Tag> {
        let name = required(name, "name")?;
        if let Some(tag) = self.app.storage.find_tag_by_name(kind, &name).await? {
            return Ok(tag);
        }
        match self.app.storage.create_tag(kind, None, &name).await {
            Ok(tag) => Ok(tag),
            // lost a race with another writer
            Err(crate::storage::StorageError::AlreadyExists(_)) => self
                .app
                .storage
                .find_tag_by_name(kind, &name)
                .await?
                .ok_or_else(|| MoodmapError::NotFound(format!("{} {}", kind, name))),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_tag(&self, kind: TagKind, id: &str) -> Result<Tag> {
        self.app
            .storage
            .get_tag(kind, id)
            .await?
            .ok_or_else(|| MoodmapError::NotFound(format!("{} {}", kind, id)))
    }

    pub async fn list_tags(&self, kind: TagKind) -> Result<Vec<Tag>> {
        Ok(self.app.storage.list_tags(kind).await?)
    }

    pub async fn rename_tag(&self, kind: TagKind, id: &str, name: &str) -> Result<Tag> {
        let name = required(name, "name")?;
        self.app
            .storage
            .rename_tag(kind, id, &name)
            .await
            .map_err(conflict)
    }

    /// Delete a tag. Locations still used by places cannot be deleted.
    pub async fn delete_tag(&self, kind: TagKind, id: &str) -> Result<()> {
        if !self.app.storage.delete_tag(kind, id).await.map_err(conflict)? {
            return Err(MoodmapError::NotFound(format!("{} {}", kind, id)));
        }
        Ok(())
    }

    pub async fn tag_options(&self) -> Result<TagOptions> {
        Ok(TagOptions {
            emotions: self.app.storage.list_tags(TagKind::Emotion).await?,
            locations: self.app.storage.list_tags(TagKind::Location).await?,
        })
    }

    /// Resolve tag ids, failing on the first unknown one.
    pub(crate) async fn require_tags(&self, kind: TagKind, ids: &[String]) -> Result<Vec<Tag>> {
        let tags = self.app.storage.get_tags(kind, ids).await?;
        if let Some(missing) = ids.iter().find(|id| !tags.iter().any(|t| &t.id == *id)) {
            return Err(MoodmapError::Validation(format!("unknown {} {}", kind, missing)));
        }
        Ok(tags)
    }

    // Memories

    fn check_emotion_count(&self, emotion_ids: &[String]) -> Result<()> {
        let max = self.app.config.community.max_emotions_per_memory;
        if emotion_ids.len() > max {
            return Err(MoodmapError::Validation(format!(
                "at most {} emotions may be selected",
                max
            )));
        }
        Ok(())
    }

    async fn check_location(&self, location_id: Option<&str>) -> Result<()> {
        if let Some(id) = location_id
            && self.app.storage.get_tag(TagKind::Location, id).await?.is_none()
        {
            return Err(MoodmapError::Validation(format!("unknown location {}", id)));
        }
        Ok(())
    }

    pub async fn create_memory(&self, user_id: &str, input: MemoryInput) -> Result<MemoryView> {
        let content = required(&input.content, "content")?;
        self.app.require_user(user_id).await?;
        self.check_emotion_count(&input.emotion_ids)?;
        let emotion_ids = dedup(input.emotion_ids);
        self.require_tags(TagKind::Emotion, &emotion_ids).await?;
        let location_id = input.location_id.filter(|id| !id.is_empty());
        self.check_location(location_id.as_deref()).await?;

        let memory = self
            .app
            .storage
            .create_memory(NewMemory {
                user_id: user_id.to_string(),
                content,
                emotion_ids,
                location_id,
            })
            .await?;

        tracing::debug!(memory_id = %memory.id, user_id, "Created memory");
        self.view(memory).await
    }

    async fn memory(&self, id: &str) -> Result<Memory> {
        self.app
            .storage
            .get_memory(id)
            .await?
            .ok_or_else(|| MoodmapError::NotFound(format!("memory {}", id)))
    }

    async fn owned_memory(&self, user_id: &str, id: &str) -> Result<Memory> {
        let memory = self.memory(id).await?;
        if memory.user_id != user_id {
            return Err(MoodmapError::Forbidden(
                "only the author may change this memory".to_string(),
            ));
        }
        Ok(memory)
    }

    pub async fn get_memory(&self, id: &str) -> Result<MemoryView> {
        let memory = self.memory(id).await?;
        self.view(memory).await
    }

    /// Newest first.
    pub async fn list_memories(
        &self,
        filter: &MemoryFilter,
        pagination: Pagination,
    ) -> Result<Page<MemoryView>> {
        let community = &self.app.config.community;
        let (page, size, offset) =
            pagination.resolve(community.default_page_size, community.max_page_size)?;

        let total = self.app.storage.count_memories(filter).await?;
        let memories = self
            .app
            .storage
            .list_memories(filter, Some(size), Some(offset))
            .await?;

        let mut items = Vec::with_capacity(memories.len());
        for memory in memories {
            items.push(self.view(memory).await?);
        }

        Ok(Page {
            items,
            total,
            page,
            size,
        })
    }

    pub async fn update_memory(
        &self,
        user_id: &str,
        id: &str,
        update: MemoryUpdate,
    ) -> Result<MemoryView> {
        self.owned_memory(user_id, id).await?;

        let mut update = update;
        if let Some(content) = update.content.take() {
            update.content = Some(required(&content, "content")?);
        }
        if let Some(emotion_ids) = update.emotion_ids.take() {
            self.check_emotion_count(&emotion_ids)?;
            let emotion_ids = dedup(emotion_ids);
            self.require_tags(TagKind::Emotion, &emotion_ids).await?;
            update.emotion_ids = Some(emotion_ids);
        }
        if let Some(location_id) = update.location_id.take() {
            let location_id = location_id.filter(|id| !id.is_empty());
            self.check_location(location_id.as_deref()).await?;
            update.location_id = Some(location_id);
        }

        let memory = self.app.storage.update_memory(id, update).await?;
        self.view(memory).await
    }

    /// Delete a memory with its images, comments and bookmarks.
    pub async fn delete_memory(&self, user_id: &str, id: &str) -> Result<()> {
        self.owned_memory(user_id, id).await?;
        let images = self.app.storage.list_images(id).await?;

        self.app.storage.delete_memory(id).await?;
        for image in images {
            self.remove_blob(&image.image_key).await;
        }
        Ok(())
    }

    async fn view(&self, memory: Memory) -> Result<MemoryView> {
        let nickname = self
            .app
            .storage
            .get_user(&memory.user_id)
            .await?
            .map(|user| user.nickname)
            .unwrap_or_default();
        let emotions = self
            .app
            .storage
            .get_tags(TagKind::Emotion, &memory.emotion_ids)
            .await?;
        let location = match memory.location_id.as_deref() {
            Some(id) => self.app.storage.get_tag(TagKind::Location, id).await?,
            None => None,
        };
        let images = self.app.storage.list_images(&memory.id).await?;

        Ok(MemoryView {
            memory,
            nickname,
            emotions,
            location,
            images,
        })
    }

    // Images

    pub async fn add_image(&self, user_id: &str, memory_id: &str, upload: Upload) -> Result<Image> {
        self.owned_memory(user_id, memory_id).await?;

        let stored = self.app.blobs.put(blob::COMMUNITY_IMAGES, upload).await?;
        match self
            .app
            .storage
            .add_image(memory_id, &stored.url, &stored.key, &stored.name)
            .await
        {
            Ok(image) => Ok(image),
            Err(e) => {
                self.remove_blob(&stored.key).await;
                Err(e.into())
            }
        }
    }

    /// Delete an image record and its blob. Only the memory's author may.
    pub async fn delete_image(&self, user_id: &str, image_id: &str) -> Result<()> {
        let image = self
            .app
            .storage
            .get_image(image_id)
            .await?
            .ok_or_else(|| MoodmapError::NotFound(format!("image {}", image_id)))?;
        self.owned_memory(user_id, &image.memory_id).await?;

        self.app.storage.delete_image(image_id).await?;
        self.remove_blob(&image.image_key).await;
        Ok(())
    }

    // Bookmarks

    pub async fn bookmark(&self, user_id: &str, memory_id: &str) -> Result<Bookmark> {
        self.app.require_user(user_id).await?;
        self.memory(memory_id).await?;
        self.app
            .storage
            .create_bookmark(user_id, memory_id)
            .await
            .map_err(conflict)
    }

    /// Bookmarks of a user with a preview of each memory, newest first.
    pub async fn list_bookmarks(&self, user_id: &str) -> Result<Vec<BookmarkView>> {
        let mut views = Vec::new();
        for bookmark in self.app.storage.list_bookmarks(user_id).await? {
            let Some(memory) = self.app.storage.get_memory(&bookmark.memory_id).await? else {
                continue;
            };
            let images = self.app.storage.list_images(&memory.id).await?;
            views.push(BookmarkView {
                bookmark,
                memory_content: memory.content,
                images,
            });
        }
        Ok(views)
    }

    pub async fn delete_bookmark(&self, user_id: &str, id: &str) -> Result<()> {
        let bookmark = self
            .app
            .storage
            .get_bookmark(id)
            .await?
            .ok_or_else(|| MoodmapError::NotFound(format!("bookmark {}", id)))?;
        if bookmark.user_id != user_id {
            return Err(MoodmapError::Forbidden(
                "only the owner may remove this bookmark".to_string(),
            ));
        }
        self.app.storage.delete_bookmark(id).await?;
        Ok(())
    }

    // Comments

    pub async fn add_comment(&self, user_id: &str, memory_id: &str, content: &str) -> Result<Comment> {
        let content = required(content, "content")?;
        self.memory(memory_id).await?;
        let user = self.app.require_user(user_id).await?;

        Ok(self
            .app
            .storage
            .create_comment(memory_id, user_id, &user.nickname, &content)
            .await?)
    }

    /// Comments on a memory, oldest first.
    pub async fn list_comments(&self, memory_id: &str) -> Result<Vec<Comment>> {
        self.memory(memory_id).await?;
        Ok(self.app.storage.list_comments(memory_id).await?)
    }

    async fn owned_comment(&self, user_id: &str, id: &str) -> Result<Comment> {
        let comment = self
            .app
            .storage
            .get_comment(id)
            .await?
            .ok_or_else(|| MoodmapError::NotFound(format!("comment {}", id)))?;
        if comment.user_id != user_id {
            return Err(MoodmapError::Forbidden(
                "only the author may change this comment".to_string(),
            ));
        }
        Ok(comment)
    }

    pub async fn update_comment(&self, user_id: &str, id: &str, content: &str) -> Result<Comment> {
        let content = required(content, "content")?;
        self.owned_comment(user_id, id).await?;
        Ok(self.app.storage.update_comment(id, &content).await?)
    }

    pub async fn delete_comment(&self, user_id: &str, id: &str) -> Result<()> {
        self.owned_comment(user_id, id).await?;
        self.app.storage.delete_comment(id).await?;
        Ok(())
    }

    async fn remove_blob(&self, key: &str) {
        if let Err(e) = self.app.blobs.delete(key).await {
            tracing::warn!(key, "Failed to delete blob: {}", e);
        }
    }
}

pub(super) fn required(value: &str, field: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(MoodmapError::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

/// Drop empty and repeated ids, keeping the first occurrence.
pub(super) fn dedup(ids: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        let id = id.trim().to_string();
        if !id.is_empty() && !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_is_clamped() {
        assert_eq!(Pagination::default().resolve(20, 100).unwrap(), (1, 20, 0));
        assert_eq!(Pagination::new(3, 10).resolve(20, 100).unwrap(), (3, 10, 20));
        assert_eq!(Pagination::new(0, 1000).resolve(20, 100).unwrap(), (1, 100, 0));
        assert_eq!(Pagination::new(2, 0).resolve(20, 100).unwrap(), (2, 1, 1));
    }

    #[test]
    fn pagination_rejects_offsets_out_of_range() {
        assert!(matches!(
            Pagination::new(usize::MAX, 20).resolve(20, 100),
            Err(MoodmapError::Validation(_))
        ));
        assert!(matches!(
            Pagination::new(usize::MAX / 2 + 2, 1).resolve(20, 100),
            Err(MoodmapError::Validation(_))
        ));
    }

    #[test]
    fn dedup_keeps_order() {
        let ids = vec!["2".into(), "1".into(), "2".into(), " ".into()];
        assert_eq!(dedup(ids), vec!["2".to_string(), "1".to_string()]);
    }
}
