//! Memories, tags, images, bookmarks and comments through the public API.

mod common;

use common::{png, seeded_app, user};
use moodmap::blob::BlobStore;
use moodmap::models::MemoryUpdate;
use moodmap::prelude::*;
use moodmap::storage::MemoryFilter;

fn memory(content: &str, emotions: &[&str], location: Option<&str>) -> MemoryInput {
    MemoryInput {
        content: content.to_string(),
        emotion_ids: emotions.iter().map(|e| e.to_string()).collect(),
        location_id: location.map(str::to_string),
    }
}

#[tokio::test]
async fn test_tag_options_are_ordered_by_id() {
    let test = seeded_app().await;
    let options = test
        .app
        .community()
        .tag_options()
        .await
        .expect("Failed to list tag options");

    let ids: Vec<&str> = options.emotions.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6"]);
    assert_eq!(options.locations.len(), 3);
    assert_eq!(options.locations[0].name, "이태원동");
}

#[tokio::test]
async fn test_tag_names_are_unique() {
    let test = seeded_app().await;
    let community = test.app.community();

    let err = community
        .create_tag(TagKind::Emotion, "정겨움")
        .await
        .expect_err("Duplicate emotion should fail");
    assert!(matches!(err, MoodmapError::Conflict(_)), "got {:?}", err);

    let tag = community
        .get_or_create_tag(TagKind::Emotion, "정겨움")
        .await
        .expect("get_or_create should return the existing tag");
    assert_eq!(tag.id, "1");

    let err = community
        .rename_tag(TagKind::Location, "2", "이태원동")
        .await
        .expect_err("Renaming onto an existing name should fail");
    assert!(matches!(err, MoodmapError::Conflict(_)));
}

#[tokio::test]
async fn test_memory_validation() {
    let test = seeded_app().await;
    let author = user(&test.app, "writer").await;
    let community = test.app.community();

    let err = community
        .create_memory(&author.id, memory("  ", &["1"], None))
        .await
        .expect_err("Empty content should fail");
    assert!(matches!(err, MoodmapError::Validation(_)));

    let err = community
        .create_memory(&author.id, memory("too many", &["1", "2", "3", "4"], None))
        .await
        .expect_err("Four emotions should fail");
    assert!(matches!(err, MoodmapError::Validation(_)));

    let err = community
        .create_memory(&author.id, memory("unknown", &["99"], None))
        .await
        .expect_err("Unknown emotion should fail");
    assert!(matches!(err, MoodmapError::Validation(_)));

    let err = community
        .create_memory(&author.id, memory("unknown place", &["1"], Some("99")))
        .await
        .expect_err("Unknown location should fail");
    assert!(matches!(err, MoodmapError::Validation(_)));

    // repeats count toward the limit
    let err = community
        .create_memory(&author.id, memory("repeats", &["1", "1", "1", "2"], None))
        .await
        .expect_err("Four submitted emotions should fail");
    assert!(matches!(err, MoodmapError::Validation(_)));

    // repeated ids collapse to one
    let view = community
        .create_memory(&author.id, memory("ok", &["1", "1", "2"], Some("1")))
        .await
        .expect("Three submitted emotions are allowed");
    assert_eq!(view.memory.emotion_ids, vec!["1", "2"]);
    assert_eq!(view.nickname, "writer");
    assert_eq!(view.location.map(|l| l.name), Some("이태원동".to_string()));
    assert_eq!(view.emotions.len(), 2);
}

#[tokio::test]
async fn test_only_author_updates_and_deletes() {
    let test = seeded_app().await;
    let author = user(&test.app, "author").await;
    let other = user(&test.app, "other").await;
    let community = test.app.community();

    let view = community
        .create_memory(&author.id, memory("첫 기억", &["1"], Some("1")))
        .await
        .expect("Failed to create memory");
    let id = view.memory.id.clone();

    let update = MemoryUpdate {
        content: Some("고친 기억".to_string()),
        ..MemoryUpdate::default()
    };
    let err = community
        .update_memory(&other.id, &id, update.clone())
        .await
        .expect_err("Other users may not update");
    assert!(matches!(err, MoodmapError::Forbidden(_)));

    let updated = community
        .update_memory(
            &author.id,
            &id,
            MemoryUpdate {
                location_id: Some(None),
                ..update
            },
        )
        .await
        .expect("Author may update");
    assert_eq!(updated.memory.content, "고친 기억");
    assert!(updated.memory.location_id.is_none());

    let err = community
        .delete_memory(&other.id, &id)
        .await
        .expect_err("Other users may not delete");
    assert!(matches!(err, MoodmapError::Forbidden(_)));

    community
        .delete_memory(&author.id, &id)
        .await
        .expect("Author may delete");
    let err = community.get_memory(&id).await.expect_err("Memory is gone");
    assert!(matches!(err, MoodmapError::NotFound(_)));
}

#[tokio::test]
async fn test_listing_filters_and_paginates_newest_first() {
    let test = seeded_app().await;
    let alice = user(&test.app, "alice").await;
    let bob = user(&test.app, "bob").await;
    let community = test.app.community();

    for i in 0..5 {
        community
            .create_memory(&alice.id, memory(&format!("alice {}", i), &["1"], Some("1")))
            .await
            .expect("Failed to create memory");
    }
    community
        .create_memory(&bob.id, memory("bob", &["2"], Some("2")))
        .await
        .expect("Failed to create memory");

    let all = community
        .list_memories(&MemoryFilter::default(), Pagination::new(1, 4))
        .await
        .expect("Failed to list memories");
    assert_eq!(all.total, 6);
    assert_eq!(all.items.len(), 4);
    assert_eq!(all.items[0].memory.content, "bob");

    let second = community
        .list_memories(&MemoryFilter::default(), Pagination::new(2, 4))
        .await
        .expect("Failed to list memories");
    assert_eq!(second.items.len(), 2);
    assert_eq!(second.items[1].memory.content, "alice 0");

    let filter = MemoryFilter {
        emotion_id: Some("2".to_string()),
        ..MemoryFilter::default()
    };
    let by_emotion = community
        .list_memories(&filter, Pagination::default())
        .await
        .expect("Failed to filter memories");
    assert_eq!(by_emotion.total, 1);
    assert_eq!(by_emotion.items[0].nickname, "bob");

    let filter = MemoryFilter {
        user_id: Some(alice.id.clone()),
        location_id: Some("1".to_string()),
        ..MemoryFilter::default()
    };
    let mine = community
        .list_memories(&filter, Pagination::default())
        .await
        .expect("Failed to filter memories");
    assert_eq!(mine.total, 5);
}

#[tokio::test]
async fn test_images_are_stored_and_removed_with_their_blob() {
    let test = seeded_app().await;
    let author = user(&test.app, "photographer").await;
    let other = user(&test.app, "stranger").await;
    let community = test.app.community();

    let view = community
        .create_memory(&author.id, memory("사진", &[], None))
        .await
        .expect("Failed to create memory");

    let err = community
        .add_image(&other.id, &view.memory.id, png("a.png"))
        .await
        .expect_err("Only the author may attach images");
    assert!(matches!(err, MoodmapError::Forbidden(_)));

    let image = community
        .add_image(&author.id, &view.memory.id, png("a.png"))
        .await
        .expect("Failed to add image");
    assert!(image.image_key.starts_with("community/images/"));
    assert!(image.image_url.starts_with("/media/community/images/"));
    assert!(test.app.blobs().exists(&image.image_key).await.unwrap());

    let view = community.get_memory(&view.memory.id).await.unwrap();
    assert_eq!(view.images.len(), 1);

    community
        .delete_image(&author.id, &image.id)
        .await
        .expect("Failed to delete image");
    assert!(!test.app.blobs().exists(&image.image_key).await.unwrap());
}

#[tokio::test]
async fn test_rejects_unsupported_uploads() {
    let test = seeded_app().await;
    let author = user(&test.app, "uploader").await;
    let community = test.app.community();
    let view = community
        .create_memory(&author.id, memory("파일", &[], None))
        .await
        .unwrap();

    let upload = moodmap::blob::Upload {
        file_name: "notes.txt".to_string(),
        content_type: "text/plain".to_string(),
        bytes: b"hello".to_vec(),
    };
    let err = community
        .add_image(&author.id, &view.memory.id, upload)
        .await
        .expect_err("Text files are not images");
    assert!(matches!(err, MoodmapError::Blob(_)));
}

#[tokio::test]
async fn test_bookmarks_are_unique_and_owned() {
    let test = seeded_app().await;
    let author = user(&test.app, "poster").await;
    let reader = user(&test.app, "reader").await;
    let community = test.app.community();

    let view = community
        .create_memory(&author.id, memory("북마크할 글", &["1"], None))
        .await
        .unwrap();
    let bookmark = community
        .bookmark(&reader.id, &view.memory.id)
        .await
        .expect("Failed to bookmark");

    let err = community
        .bookmark(&reader.id, &view.memory.id)
        .await
        .expect_err("Second bookmark should conflict");
    assert!(matches!(err, MoodmapError::Conflict(_)));

    let mine = community.list_bookmarks(&reader.id).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].memory_content, "북마크할 글");

    let err = community
        .delete_bookmark(&author.id, &bookmark.id)
        .await
        .expect_err("Only the owner may delete");
    assert!(matches!(err, MoodmapError::Forbidden(_)));

    community
        .delete_bookmark(&reader.id, &bookmark.id)
        .await
        .expect("Owner may delete");
    assert!(community.list_bookmarks(&reader.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_comments_copy_nickname_and_list_oldest_first() {
    let test = seeded_app().await;
    let author = user(&test.app, "host").await;
    let guest = user(&test.app, "guest").await;
    let community = test.app.community();

    let view = community
        .create_memory(&author.id, memory("댓글 달린 글", &[], None))
        .await
        .unwrap();
    let first = community
        .add_comment(&guest.id, &view.memory.id, "첫 댓글")
        .await
        .expect("Failed to comment");
    community
        .add_comment(&author.id, &view.memory.id, "답글")
        .await
        .expect("Failed to comment");
    assert_eq!(first.nickname, "guest");

    let comments = community.list_comments(&view.memory.id).await.unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].content, "첫 댓글");

    let err = community
        .update_comment(&author.id, &first.id, "남의 댓글")
        .await
        .expect_err("Only the author may edit");
    assert!(matches!(err, MoodmapError::Forbidden(_)));

    let edited = community
        .update_comment(&guest.id, &first.id, "고친 댓글")
        .await
        .expect("Author may edit");
    assert_eq!(edited.content, "고친 댓글");

    community.delete_comment(&guest.id, &first.id).await.unwrap();
    assert_eq!(community.list_comments(&view.memory.id).await.unwrap().len(), 1);
}
