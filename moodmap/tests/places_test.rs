//! Places, summaries, saved places, the taste profile and the user page.

mod common;

use common::{pipeline_llm, png, seeded_app, user, with_providers};
use moodmap::blob::BlobStore;
use moodmap::core::{PlaceInput, ProfileUpdate};
use moodmap::prelude::*;
use moodmap::prompts::TASTE_PROFILE_FALLBACK;
use moodmap::providers::testing::{ScriptedLlmClient, StaticPlacesClient};
use moodmap::storage::{PlaceFilter, PlaceStore};

async fn place(app: &Moodmap, name: &str, emotions: &[&str]) -> Place {
    app.places()
        .create_place(PlaceInput {
            name: name.to_string(),
            address: "서울특별시 용산구 후암동 10".to_string(),
            emotion_ids: emotions.iter().map(|e| e.to_string()).collect(),
            ..PlaceInput::default()
        })
        .await
        .expect("Failed to create place")
        .place
}

fn taste_llm(reply: &str) -> ScriptedLlmClient {
    ScriptedLlmClient::new("기본 응답").with_rule("자주 저장한 감정", reply)
}

#[tokio::test]
async fn test_manual_places_derive_location_and_id() {
    let test = seeded_app().await;
    let created = test
        .app
        .places()
        .create_place(PlaceInput {
            name: "후암 식당".to_string(),
            address: "서울특별시 용산구 후암동 10".to_string(),
            emotion_ids: vec!["1".to_string()],
            ..PlaceInput::default()
        })
        .await
        .unwrap();

    assert!(created.place.google_place_id.starts_with("manual-"));
    assert_eq!(created.location.map(|l| l.name), Some("후암동".to_string()));
    assert_eq!(created.place.status, PlaceStatus::Operating);
    assert!(created.summary.is_none());

    let err = test
        .app
        .places()
        .create_place(PlaceInput {
            name: "이상한 곳".to_string(),
            address: "용산구".to_string(),
            emotion_ids: vec!["42".to_string()],
            ..PlaceInput::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, MoodmapError::Validation(_)));
}

#[tokio::test]
async fn test_list_and_status_update() {
    let test = seeded_app().await;
    let first = place(&test.app, "첫집", &["1"]).await;
    place(&test.app, "둘째집", &["2"]).await;

    let closed = test
        .app
        .places()
        .update_status(&first.id, PlaceStatus::Closed)
        .await
        .unwrap();
    assert_eq!(closed.place.status, PlaceStatus::Closed);

    let filter = PlaceFilter {
        status: Some(PlaceStatus::Operating),
        ..PlaceFilter::default()
    };
    let open = test
        .app
        .places()
        .list_places(&filter, Pagination::default())
        .await
        .unwrap();
    assert_eq!(open.total, 1);
    assert_eq!(open.items[0].place.name, "둘째집");

    let all = test
        .app
        .places()
        .list_places(&PlaceFilter::default(), Pagination::new(1, 1))
        .await
        .unwrap();
    assert_eq!(all.total, 2);
    assert_eq!(all.items.len(), 1);

    let err = test
        .app
        .places()
        .update_status("missing", PlaceStatus::Moved)
        .await
        .unwrap_err();
    assert!(matches!(err, MoodmapError::NotFound(_)));
}

#[tokio::test]
async fn test_summary_regeneration() {
    let test = seeded_app().await;
    let target = place(&test.app, "국수집", &[]).await;

    let err = test
        .app
        .places()
        .regenerate_summary(&target.id)
        .await
        .unwrap_err();
    assert!(matches!(err, MoodmapError::Provider(_)));

    let llm = pipeline_llm();
    let app = with_providers(test.app.clone(), StaticPlacesClient::new(), llm.clone());
    let summary = app.places().regenerate_summary(&target.id).await.unwrap();
    assert_eq!(summary.summary, "골목의 작은 식당");
    assert_eq!(llm.calls(), 1);

    let latest = app.places().latest_summary(&target.id).await.unwrap();
    assert_eq!(latest.map(|s| s.id), Some(summary.id.clone()));

    // the same prompt again still reaches the LLM
    let again = app.places().regenerate_summary(&target.id).await.unwrap();
    assert_eq!(llm.calls(), 2);
    assert_ne!(again.id, summary.id);
}

#[tokio::test]
async fn test_saving_snapshots_the_latest_summary() {
    let test = seeded_app().await;
    let saver = user(&test.app, "snap").await;
    let target = place(&test.app, "빵집", &["5"]).await;
    test.app
        .storage()
        .add_summary(&target.id, "갓 구운 빵")
        .await
        .unwrap();

    let saved = test
        .app
        .places()
        .save_place(&saver.id, &target.id, RecKind::Similar)
        .await
        .unwrap();
    assert_eq!(saved.summary_snapshot, "갓 구운 빵");
    assert_eq!(saved.rec, RecKind::Similar);

    let other = user(&test.app, "other").await;
    let err = test
        .app
        .places()
        .delete_saved(&other.id, &saved.id)
        .await
        .unwrap_err();
    assert!(matches!(err, MoodmapError::Forbidden(_)));

    test.app.places().delete_saved(&saver.id, &saved.id).await.unwrap();
    assert!(test.app.places().list_saved(&saver.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_taste_profile_follows_saved_places() {
    let test = seeded_app().await;
    let app = with_providers(
        test.app.clone(),
        StaticPlacesClient::new(),
        taste_llm("정겨움을 좋아하는 골목탐험가"),
    );
    let saver = user(&app, "taster").await;
    let a = place(&app, "가", &["1", "2"]).await;
    let b = place(&app, "나", &["1", "3"]).await;
    let c = place(&app, "다", &["1", "2", "4"]).await;

    let places = app.places();
    places.save_place(&saver.id, &a.id, RecKind::Inference).await.unwrap();
    places.save_place(&saver.id, &b.id, RecKind::Inference).await.unwrap();
    places.save_place(&saver.id, &c.id, RecKind::Similar).await.unwrap();

    let top = places.top_saved_emotions(&saver.id).await.unwrap();
    assert_eq!(top.len(), 3);
    assert_eq!(&top[..2], &["정겨움".to_string(), "편안함".to_string()]);

    let user = app.accounts().get_user(&saver.id).await.unwrap();
    assert_eq!(user.detail, "정겨움을 좋아하는 골목탐험가");

    // removing everything clears the profile
    for saved in places.list_saved(&saver.id).await.unwrap() {
        places.delete_saved(&saver.id, &saved.saved.id).await.unwrap();
    }
    let user = app.accounts().get_user(&saver.id).await.unwrap();
    assert_eq!(user.detail, "");
}

#[tokio::test]
async fn test_taste_profile_replaces_place_like_replies() {
    let test = seeded_app().await;
    let app = with_providers(
        test.app.clone(),
        StaticPlacesClient::new(),
        taste_llm("조용한 분위기의 공간"),
    );
    let saver = user(&app, "placey").await;
    let target = place(&app, "조용한 찻집", &["3"]).await;

    app.places()
        .save_place(&saver.id, &target.id, RecKind::Inference)
        .await
        .unwrap();
    let user = app.accounts().get_user(&saver.id).await.unwrap();
    assert_eq!(user.detail, TASTE_PROFILE_FALLBACK);
}

#[tokio::test]
async fn test_taste_profile_survives_llm_failure() {
    let test = seeded_app().await;
    let saver = user(&test.app, "steady").await;
    test.app
        .accounts()
        .update_profile(
            &saver.id,
            ProfileUpdate {
                detail: Some("소박함을 즐기는 산책가".to_string()),
                ..ProfileUpdate::default()
            },
        )
        .await
        .unwrap();
    let app = with_providers(
        test.app.clone(),
        StaticPlacesClient::new(),
        ScriptedLlmClient::failing(),
    );
    let target = place(&app, "시장", &["5"]).await;

    app.places()
        .save_place(&saver.id, &target.id, RecKind::Inference)
        .await
        .expect("Saving must not fail on LLM errors");
    let user = app.accounts().get_user(&saver.id).await.unwrap();
    assert_eq!(user.detail, "소박함을 즐기는 산책가");
}

#[tokio::test]
async fn test_profile_updates_and_images() {
    let test = seeded_app().await;
    let me = user(&test.app, "pictured").await;
    user(&test.app, "occupied").await;
    let accounts = test.app.accounts();

    let err = accounts
        .update_profile(
            &me.id,
            ProfileUpdate {
                nickname: Some("occupied".to_string()),
                ..ProfileUpdate::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, MoodmapError::Conflict(_)));

    let first = accounts.set_profile_image(&me.id, png("me.png")).await.unwrap();
    let first_url = first.profile_image_url.clone().expect("url is set");
    assert!(first_url.starts_with("/media/users/profiles/"));
    let first_key = test.app.blobs().key_from_url(&first_url).unwrap();
    assert!(test.app.blobs().exists(&first_key).await.unwrap());

    let second = accounts.set_profile_image(&me.id, png("me2.png")).await.unwrap();
    assert_ne!(second.profile_image_url, first.profile_image_url);
    assert!(!test.app.blobs().exists(&first_key).await.unwrap());
}

#[tokio::test]
async fn test_mypage_collects_bookmarks_and_saved_places() {
    let test = seeded_app().await;
    let me = user(&test.app, "collector").await;
    let author = user(&test.app, "writer").await;

    let memory = test
        .app
        .community()
        .create_memory(
            &author.id,
            MemoryInput {
                content: "좋은 동네".to_string(),
                ..MemoryInput::default()
            },
        )
        .await
        .unwrap();
    test.app
        .community()
        .add_image(&author.id, &memory.memory.id, png("p.png"))
        .await
        .unwrap();
    test.app
        .community()
        .bookmark(&me.id, &memory.memory.id)
        .await
        .unwrap();
    let target = place(&test.app, "찜한 곳", &["1"]).await;
    test.app
        .places()
        .save_place(&me.id, &target.id, RecKind::Inference)
        .await
        .unwrap();

    let page = test.app.accounts().mypage(&me.id).await.unwrap();
    assert_eq!(page.user.nickname, "collector");
    assert_eq!(page.bookmarks.len(), 1);
    assert_eq!(page.bookmarks[0].memory_content, "좋은 동네");
    assert_eq!(page.bookmarks[0].images.len(), 1);
    assert_eq!(page.saved_places.len(), 1);
    assert_eq!(page.saved_places[0].place.name, "찜한 곳");

    let err = test.app.accounts().mypage("nobody").await.unwrap_err();
    assert!(matches!(err, MoodmapError::NotFound(_)));
}
