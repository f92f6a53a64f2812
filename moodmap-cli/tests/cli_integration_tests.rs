//! Integration tests for the moodmap CLI handlers
//!
//! Handlers run against in-memory storage with deterministic providers, so
//! no API keys are needed.

use std::fs;
use std::sync::Arc;

use moodmap::MoodmapError;
use moodmap::config::ConfigBuilder;
use moodmap::models::TagKind;
use moodmap::providers::ProviderError;
use moodmap::providers::testing::{ScriptedLlmClient, StaticPlacesClient, candidate, details};
use moodmap_cli::args::{InferArgs, SearchArgs, SeedArgs, SimilarArgs, TagsArgs};
use moodmap_cli::context::MoodmapCliContext;
use moodmap_cli::handlers::*;
use moodmap_cli::utils::resolve_tag_ids;
use tempfile::TempDir;

const ITAEWON: &str = "서울특별시 용산구 이태원동";

/// Helper to create an isolated CLI context with seed files in a temp dir
async fn create_test_context() -> (MoodmapCliContext, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let emotions = temp_dir.path().join("emotions.csv");
    let locations = temp_dir.path().join("locations.csv");
    fs::write(&emotions, "emotion_id,name\n1,정겨움\n2,편안함\n3,조용함\n5,소박함\n")
        .expect("Failed to write emotions");
    fs::write(&locations, "location_id,name\n1,이태원동\n2,한남동\n")
        .expect("Failed to write locations");

    let mut config = ConfigBuilder::testing()
        .with_seed_files(&emotions, &locations)
        .build()
        .expect("Failed to build config");
    config.uploads.dir = temp_dir.path().join("uploads");

    let moodmap = moodmap::init(config)
        .await
        .expect("Failed to initialize moodmap");

    (MoodmapCliContext::from_moodmap(moodmap), temp_dir)
}

async fn seeded_context() -> (MoodmapCliContext, TempDir) {
    let (ctx, dir) = create_test_context().await;
    handle_seed_command(
        SeedArgs {
            emotions: None,
            locations: None,
        },
        &ctx,
        "json",
    )
    .await
    .expect("Seeding should succeed");
    (ctx, dir)
}

fn with_providers(ctx: MoodmapCliContext) -> MoodmapCliContext {
    let places = StaticPlacesClient::new()
        .with_search(
            "이태원동",
            vec![
                candidate("p1", "연탄불고기", &format!("{} 11", ITAEWON), 4.8),
                candidate("p3", "평범식당", &format!("{} 33", ITAEWON), 3.5),
            ],
        )
        .with_details(details("p1", "연탄불고기", &format!("{} 11", ITAEWON)));
    let llm = ScriptedLlmClient::new("기본 응답")
        .with_rule("요약카드를", "리뷰가 따뜻한 동네 맛집")
        .with_rule("감정 태그를 생성해줘", "정겨움, 소박함")
        .with_rule("추천된 가게들:", "정겨운 가게들을 골랐습니다.");

    MoodmapCliContext::from_moodmap(
        ctx.moodmap
            .with_places_client(Arc::new(places))
            .with_llm_client(Arc::new(llm)),
    )
}

#[tokio::test]
async fn test_seed_uses_configured_files_and_is_idempotent() {
    let (ctx, _dir) = create_test_context().await;
    let args = || SeedArgs {
        emotions: None,
        locations: None,
    };

    let report = handle_seed_command(args(), &ctx, "json")
        .await
        .expect("First seed should succeed");
    assert_eq!(report.created, 6);
    assert_eq!(report.existing, 0);

    let again = handle_seed_command(args(), &ctx, "text")
        .await
        .expect("Second seed should succeed");
    assert_eq!(again.created, 0);
    assert_eq!(again.existing, 6);
}

#[tokio::test]
async fn test_seed_with_explicit_file() {
    let (ctx, dir) = create_test_context().await;
    let extra = dir.path().join("more.csv");
    fs::write(&extra, "location_id,name\n9,후암동\n").expect("Failed to write csv");

    let report = handle_seed_command(
        SeedArgs {
            emotions: None,
            locations: Some(extra),
        },
        &ctx,
        "text",
    )
    .await
    .expect("Seeding should succeed");
    assert_eq!(report.created, 1);

    let locations = ctx
        .moodmap
        .community()
        .list_tags(TagKind::Location)
        .await
        .expect("Failed to list locations");
    assert_eq!(locations.len(), 1);
    assert_eq!(locations[0].name, "후암동");
}

#[tokio::test]
async fn test_diagnose_reports_storage_and_providers() {
    let (ctx, _dir) = seeded_context().await;

    let report = handle_diagnose_command(&ctx, "text")
        .await
        .expect("Diagnose should succeed");
    assert_eq!(report["storage"]["healthy"], true);
    assert_eq!(report["providers"]["places"], false);

    let metadata = &report["storage"]["metadata"];
    assert_eq!(metadata["type"], "surrealdb");
    assert_eq!(
        metadata["namespace"],
        ctx.moodmap.config().storage.namespace.as_str()
    );
    assert_eq!(metadata["records"]["emotion"], 4);
    assert_eq!(metadata["records"]["location"], 2);
    assert_eq!(metadata["records"]["user"], 0);

    let ctx = with_providers(ctx);
    let report = handle_diagnose_command(&ctx, "json")
        .await
        .expect("Diagnose should succeed");
    assert_eq!(report["providers"]["places"], true);
    assert_eq!(report["providers"]["llm"], true);
}

#[tokio::test]
async fn test_tags_lists_by_kind() {
    let (ctx, _dir) = seeded_context().await;

    let all = handle_tags_command(TagsArgs { kind: None }, &ctx, "json")
        .await
        .expect("Listing should succeed");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].0, TagKind::Emotion);
    assert_eq!(all[0].1.len(), 4);
    assert_eq!(all[1].1.len(), 2);

    let locations = handle_tags_command(
        TagsArgs {
            kind: Some("location".to_string()),
        },
        &ctx,
        "text",
    )
    .await
    .expect("Listing should succeed");
    assert_eq!(locations.len(), 1);
    assert_eq!(locations[0].1[0].name, "이태원동");
}

#[tokio::test]
async fn test_resolve_tag_ids_by_id_or_name() {
    let (ctx, _dir) = seeded_context().await;

    let ids = resolve_tag_ids(
        &ctx,
        TagKind::Emotion,
        &["정겨움".to_string(), "2".to_string(), " 조용함 ".to_string()],
    )
    .await
    .expect("Tags should resolve");
    assert_eq!(ids, vec!["1", "2", "3"]);

    let err = resolve_tag_ids(&ctx, TagKind::Location, &["없는동".to_string()])
        .await
        .expect_err("Unknown tag should fail");
    assert!(matches!(err, MoodmapError::Validation(_)));
}

#[tokio::test]
async fn test_infer_with_names() {
    let (ctx, _dir) = seeded_context().await;
    let ctx = with_providers(ctx);

    let outcome = handle_infer_command(
        InferArgs {
            locations: vec!["이태원동".to_string()],
            emotions: vec!["정겨움".to_string(), "편안함".to_string()],
        },
        &ctx,
        "json",
    )
    .await
    .expect("Inference should succeed");

    assert!(outcome.session.user_id.is_none());
    assert_eq!(outcome.session.location_ids, vec!["1"]);
    assert_eq!(outcome.session.emotion_ids, vec!["1", "2"]);
    assert_eq!(outcome.places.len(), 1);
    assert_eq!(outcome.places[0].place.name, "연탄불고기");
    assert_eq!(
        outcome.session.overall_recommendation,
        "정겨운 가게들을 골랐습니다."
    );
}

#[tokio::test]
async fn test_infer_rejects_too_many_emotions() {
    let (ctx, _dir) = seeded_context().await;
    let ctx = with_providers(ctx);

    let err = handle_infer_command(
        InferArgs {
            locations: vec!["1".to_string()],
            emotions: vec![
                "1".to_string(),
                "2".to_string(),
                "3".to_string(),
                "5".to_string(),
            ],
        },
        &ctx,
        "text",
    )
    .await
    .expect_err("Four emotions should be rejected");
    assert!(matches!(err, MoodmapError::Validation(_)));
}

#[tokio::test]
async fn test_search_prints_store_card() {
    let (ctx, _dir) = seeded_context().await;
    let ctx = with_providers(ctx);

    let card = handle_search_command(
        SearchArgs {
            query: "연탄불고기".to_string(),
        },
        &ctx,
        "text",
    )
    .await
    .expect("Search should succeed");
    assert_eq!(card.google_place_id, "p1");
    assert_eq!(card.status_label, "운영중");

    let err = handle_search_command(
        SearchArgs {
            query: "없는가게".to_string(),
        },
        &ctx,
        "json",
    )
    .await
    .expect_err("Unknown store should fail");
    assert!(matches!(err, MoodmapError::NotFound(_)));
}

#[tokio::test]
async fn test_similar_without_places_provider() {
    let (ctx, _dir) = seeded_context().await;

    let err = handle_similar_command(
        SimilarArgs {
            name: "한남분식".to_string(),
            address: format!("{} 22", ITAEWON),
            emotions: vec![],
        },
        &ctx,
        "text",
    )
    .await
    .expect_err("Similar places need a provider");
    assert!(matches!(
        err,
        MoodmapError::Provider(ProviderError::NotConfigured("places"))
    ));
}
