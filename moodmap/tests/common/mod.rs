//! Shared setup for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use moodmap::prelude::*;
use moodmap::providers::testing::{ScriptedLlmClient, StaticPlacesClient};
use moodmap::seed;
use tempfile::TempDir;

pub const EMOTIONS_CSV: &str = "emotion_id,name\n1,정겨움\n2,편안함\n3,조용함\n4,활기참\n5,소박함\n6,세심함\n";
pub const LOCATIONS_CSV: &str = "location_id,name\n1,이태원동\n2,한남동\n3,후암동\n";

/// A moodmap over in-memory storage with uploads in a temp dir.
pub struct TestApp {
    pub app: Moodmap,
    pub uploads: TempDir,
}

pub async fn app() -> TestApp {
    let uploads = TempDir::new().expect("Failed to create upload dir");
    let mut config = ConfigBuilder::testing()
        .build()
        .expect("Failed to build config");
    config.uploads.dir = uploads.path().to_path_buf();

    let app = moodmap::init(config)
        .await
        .expect("Failed to initialize moodmap");
    TestApp { app, uploads }
}

/// Same as [`app`] with seeded tags.
pub async fn seeded_app() -> TestApp {
    let test = app().await;
    seed_tags(&test.app).await;
    test
}

pub async fn seed_tags(app: &Moodmap) {
    seed::seed_tags(app.storage().as_ref(), TagKind::Emotion, EMOTIONS_CSV.as_bytes())
        .await
        .expect("Failed to seed emotions");
    seed::seed_tags(app.storage().as_ref(), TagKind::Location, LOCATIONS_CSV.as_bytes())
        .await
        .expect("Failed to seed locations");
}

pub async fn user(app: &Moodmap, nickname: &str) -> User {
    app.accounts()
        .register(
            &format!("{}@example.com", nickname),
            nickname,
            "$2b$12$hash",
            None,
        )
        .await
        .expect("Failed to register user")
}

pub fn with_providers(app: Moodmap, places: StaticPlacesClient, llm: ScriptedLlmClient) -> Moodmap {
    app.with_places_client(Arc::new(places))
        .with_llm_client(Arc::new(llm))
}

/// LLM answering every pipeline prompt with something recognisable.
pub fn pipeline_llm() -> ScriptedLlmClient {
    ScriptedLlmClient::new("기본 응답")
        .with_rule("요약카드를", "리뷰가 따뜻한 동네 맛집")
        .with_rule("감정 태그를 생성해줘", "정겨움, 소박함")
        .with_rule("추천된 가게들:", "정겨운 가게들을 골랐습니다.")
        .with_rule("한줄 요약", "골목의 작은 식당")
        .with_rule("자주 저장한 감정", "정겨움을 좋아하는 골목탐험가")
        .with_rule("감정 분류 전문가", "[\"편안함\", \"조용함\", \"없는감정\"]")
}

pub fn png(name: &str) -> moodmap::blob::Upload {
    moodmap::blob::Upload {
        file_name: name.to_string(),
        content_type: "image/png".to_string(),
        bytes: vec![0x89, b'P', b'N', b'G', 1, 2, 3, 4],
    }
}
