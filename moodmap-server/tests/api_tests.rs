//! HTTP-level tests for the moodmap API

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::{
    TestServer,
    multipart::{MultipartForm, Part},
};
use moodmap::{
    config::ConfigBuilder,
    models::TagKind,
    providers::testing::{ScriptedLlmClient, StaticPlacesClient, candidate, details},
    seed,
};
use moodmap_server::{
    api::auth_service::AuthService, config::ServerConfig, create_router, state::AppState,
};
use serde_json::{Value, json};
use tempfile::TempDir;

const EMOTIONS_CSV: &str = "emotion_id,name\n1,정겨움\n2,편안함\n3,조용함\n4,활기참\n5,소박함\n";
const LOCATIONS_CSV: &str = "location_id,name\n1,이태원동\n2,한남동\n";
const JWT_SECRET: &str = "test-secret-key-for-jwt-token-generation";

struct TestApp {
    server: TestServer,
    state: Arc<AppState>,
    _uploads: TempDir,
}

async fn create_test_app(
    places: Option<StaticPlacesClient>,
    llm: Option<ScriptedLlmClient>,
) -> TestApp {
    let uploads = tempfile::tempdir().unwrap();
    let mut config = ConfigBuilder::testing()
        .build()
        .expect("Failed to create config");
    config.uploads.dir = uploads.path().to_path_buf();

    let mut moodmap = moodmap::init(config)
        .await
        .expect("Failed to initialize moodmap");
    seed::seed_tags(moodmap.storage().as_ref(), TagKind::Emotion, EMOTIONS_CSV.as_bytes())
        .await
        .unwrap();
    seed::seed_tags(moodmap.storage().as_ref(), TagKind::Location, LOCATIONS_CSV.as_bytes())
        .await
        .unwrap();

    if let Some(places) = places {
        moodmap = moodmap.with_places_client(Arc::new(places));
    }
    if let Some(llm) = llm {
        moodmap = moodmap.with_llm_client(Arc::new(llm));
    }

    let server_config = ServerConfig {
        jwt_secret: JWT_SECRET.to_string(),
        ..ServerConfig::default()
    };
    let auth = AuthService::new(JWT_SECRET.to_string(), 24).with_bcrypt_cost(4);
    let state = Arc::new(AppState::new(moodmap, server_config).with_auth_service(auth));

    let server = TestServer::new(create_router(state.clone())).unwrap();
    TestApp {
        server,
        state,
        _uploads: uploads,
    }
}

async fn create_test_server() -> TestApp {
    create_test_app(None, None).await
}

/// Sign up a user and return their token and id
async fn signup(server: &TestServer, nickname: &str) -> (String, String) {
    let response = server
        .post("/api/auth/signup")
        .json(&json!({
            "email": format!("{}@example.com", nickname),
            "nickname": nickname,
            "password": "password123",
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    (
        body["token"].as_str().unwrap().to_string(),
        body["user"]["id"].as_str().unwrap().to_string(),
    )
}

async fn create_memory(server: &TestServer, token: &str, content: &str) -> Value {
    let response = server
        .post("/api/memories")
        .authorization_bearer(token)
        .json(&json!({
            "content": content,
            "emotion_ids": ["1", "2"],
            "location_id": "1",
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

fn png_form() -> MultipartForm {
    let part = Part::bytes(vec![0x89, b'P', b'N', b'G', 1, 2, 3, 4])
        .file_name("photo.png")
        .mime_type("image/png");
    MultipartForm::new().add_part("image", part)
}

const ITAEWON: &str = "서울특별시 용산구 이태원동";

fn itaewon_places() -> StaticPlacesClient {
    StaticPlacesClient::new()
        .with_search(
            "이태원동",
            vec![
                candidate("p1", "연탄불고기", &format!("{} 11", ITAEWON), 4.8),
                candidate("p2", "골목카페", &format!("{} 22", ITAEWON), 4.6),
            ],
        )
        .with_details(details("p1", "연탄불고기", &format!("{} 11", ITAEWON)))
}

fn pipeline_llm() -> ScriptedLlmClient {
    ScriptedLlmClient::new("기본 응답")
        .with_rule("요약카드를", "리뷰가 따뜻한 동네 맛집")
        .with_rule("감정 태그를 생성해줘", "정겨움, 소박함")
        .with_rule("추천된 가게들:", "정겨운 가게들을 골랐습니다.")
        .with_rule("한줄 요약", "골목의 작은 식당")
}

#[tokio::test]
async fn test_health_reports_providers() {
    let app = create_test_server().await;

    let response = app.server.get("/api/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "OK");
    assert_eq!(body["version"], moodmap::VERSION);
    assert_eq!(body["providers"]["places"], false);
    assert_eq!(body["providers"]["llm"], false);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = create_test_server().await;

    let response = app.server.get("/api-docs/openapi.json").await;
    response.assert_status_ok();

    let doc: Value = response.json();
    assert!(doc["paths"]["/api/memories"].is_object());
    assert!(doc["paths"]["/api/infer/sessions"].is_object());
    assert!(doc["components"]["securitySchemes"]["bearer"].is_object());
}

// Accounts

#[tokio::test]
async fn test_signup_login_and_me() {
    let app = create_test_server().await;
    let (token, user_id) = signup(&app.server, "walker").await;

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({"email": "walker@example.com", "password": "password123"}))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["id"], user_id.as_str());

    let response = app
        .server
        .get("/api/auth/me")
        .authorization_bearer(&token)
        .await;
    response.assert_status_ok();
    let me: Value = response.json();
    assert_eq!(me["nickname"], "walker");
    assert_eq!(me["email"], "walker@example.com");
}

#[tokio::test]
async fn test_signup_rejects_duplicates_and_short_passwords() {
    let app = create_test_server().await;
    signup(&app.server, "walker").await;

    let duplicate = app
        .server
        .post("/api/auth/signup")
        .json(&json!({
            "email": "walker@example.com",
            "nickname": "someone-else",
            "password": "password123",
        }))
        .await;
    duplicate.assert_status(StatusCode::CONFLICT);

    let short = app
        .server
        .post("/api/auth/signup")
        .json(&json!({
            "email": "short@example.com",
            "nickname": "short",
            "password": "abc",
        }))
        .await;
    short.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = short.json();
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_availability_checks() {
    let app = create_test_server().await;
    signup(&app.server, "walker").await;

    let taken: Value = app
        .server
        .get("/api/auth/check-nickname")
        .add_query_param("nickname", "walker")
        .await
        .json();
    assert_eq!(taken["available"], false);

    let free: Value = app
        .server
        .get("/api/auth/check-email")
        .add_query_param("email", "nobody@example.com")
        .await
        .json();
    assert_eq!(free["available"], true);
}

#[tokio::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let app = create_test_server().await;
    signup(&app.server, "walker").await;

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({"email": "walker@example.com", "password": "wrong-password"}))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_revokes_the_token() {
    let app = create_test_server().await;
    let (token, _) = signup(&app.server, "walker").await;

    app.server
        .post("/api/auth/logout")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    assert_eq!(app.state.auth.revoked_count(), 1);

    app.server
        .get("/api/auth/me")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_deleted_account_tokens_stop_working() {
    let app = create_test_server().await;
    let (first, _) = signup(&app.server, "walker").await;

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({"email": "walker@example.com", "password": "password123"}))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    let second = body["token"].as_str().unwrap().to_string();

    app.server
        .delete("/api/auth/me")
        .authorization_bearer(&first)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    app.server
        .post("/api/memories")
        .authorization_bearer(&second)
        .json(&json!({"content": "탈퇴 후 글", "emotion_ids": ["1"]}))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    app.server
        .get("/api/auth/me")
        .authorization_bearer(&second)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let memories: Value = app.server.get("/api/memories").await.json();
    assert_eq!(memories["total"], 0);
}

#[tokio::test]
async fn test_invalid_token_is_rejected_even_on_public_routes() {
    let app = create_test_server().await;

    app.server
        .get("/api/emotions")
        .authorization_bearer("not-a-jwt")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_me_changes_password() {
    let app = create_test_server().await;
    let (token, _) = signup(&app.server, "walker").await;

    let response = app
        .server
        .put("/api/auth/me")
        .authorization_bearer(&token)
        .json(&json!({"detail": "골목을 걷는 사람", "password": "new-password-1"}))
        .await;
    response.assert_status_ok();
    let me: Value = response.json();
    assert_eq!(me["detail"], "골목을 걷는 사람");

    app.server
        .post("/api/auth/login")
        .json(&json!({"email": "walker@example.com", "password": "new-password-1"}))
        .await
        .assert_status_ok();
}

// Tags

#[tokio::test]
async fn test_tags_are_public_to_read_and_need_a_token_to_write() {
    let app = create_test_server().await;

    let emotions: Value = app.server.get("/api/emotions").await.json();
    assert_eq!(emotions.as_array().unwrap().len(), 5);
    assert_eq!(emotions[0]["name"], "정겨움");

    app.server
        .post("/api/emotions")
        .json(&json!({"name": "설렘"}))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let (token, _) = signup(&app.server, "walker").await;
    let created = app
        .server
        .post("/api/emotions")
        .authorization_bearer(&token)
        .json(&json!({"name": "설렘"}))
        .await;
    created.assert_status(StatusCode::CREATED);

    app.server
        .post("/api/emotions")
        .authorization_bearer(&token)
        .json(&json!({"name": "설렘"}))
        .await
        .assert_status(StatusCode::CONFLICT);

    let options: Value = app.server.get("/api/tag-options").await.json();
    assert_eq!(options["emotions"].as_array().unwrap().len(), 6);
    assert_eq!(options["locations"].as_array().unwrap().len(), 2);

    app.server
        .get("/api/locations/99")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

// Memories

#[tokio::test]
async fn test_memory_crud_and_ownership() {
    let app = create_test_server().await;
    let (author, author_id) = signup(&app.server, "author").await;
    let (other, _) = signup(&app.server, "other").await;

    let memory = create_memory(&app.server, &author, "골목 끝의 작은 식당").await;
    let id = memory["id"].as_str().unwrap().to_string();
    assert_eq!(memory["nickname"], "author");
    assert_eq!(memory["emotions"].as_array().unwrap().len(), 2);

    let list: Value = app
        .server
        .get("/api/memories")
        .add_query_param("user_id", &author_id)
        .await
        .json();
    assert_eq!(list["total"], 1);

    app.server
        .put(&format!("/api/memories/{}", id))
        .authorization_bearer(&other)
        .json(&json!({"content": "hijacked"}))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let updated = app
        .server
        .put(&format!("/api/memories/{}", id))
        .authorization_bearer(&author)
        .json(&json!({"content": "다시 가고 싶은 곳", "location_id": ""}))
        .await;
    updated.assert_status_ok();
    let updated: Value = updated.json();
    assert_eq!(updated["content"], "다시 가고 싶은 곳");
    assert!(updated["location"].is_null());

    app.server
        .delete(&format!("/api/memories/{}", id))
        .authorization_bearer(&author)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    app.server
        .get(&format!("/api/memories/{}", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_memory_validation() {
    let app = create_test_server().await;
    let (token, _) = signup(&app.server, "author").await;

    app.server
        .post("/api/memories")
        .json(&json!({"content": "no token", "emotion_ids": []}))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    app.server
        .post("/api/memories")
        .authorization_bearer(&token)
        .json(&json!({"content": "too many", "emotion_ids": ["1", "2", "3", "4"]}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    app.server
        .post("/api/memories")
        .authorization_bearer(&token)
        .json(&json!({"content": "unknown tag", "emotion_ids": ["42"]}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    // repeats count toward the limit
    app.server
        .post("/api/memories")
        .authorization_bearer(&token)
        .json(&json!({"content": "repeats", "emotion_ids": ["1", "1", "1", "2"]}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_rejects_page_out_of_range() {
    let app = create_test_server().await;

    let response = app
        .server
        .get("/api/memories")
        .add_query_param("page", usize::MAX)
        .add_query_param("size", 20)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "validation_error");

    let response = app
        .server
        .get("/api/memories")
        .add_query_param("page", 99)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_image_upload_is_served_and_checked() {
    let app = create_test_server().await;
    let (token, _) = signup(&app.server, "author").await;
    let memory = create_memory(&app.server, &token, "사진 있는 기억").await;
    let id = memory["id"].as_str().unwrap();

    let response = app
        .server
        .post(&format!("/api/memories/{}/images", id))
        .authorization_bearer(&token)
        .multipart(png_form())
        .await;
    response.assert_status(StatusCode::CREATED);
    let image: Value = response.json();
    let url = image["image_url"].as_str().unwrap();
    assert!(url.starts_with("/media/community/images/"));

    let media = app.server.get(url).await;
    media.assert_status_ok();
    assert_eq!(media.as_bytes().len(), 8);

    let text = Part::bytes(b"hello".to_vec())
        .file_name("notes.txt")
        .mime_type("text/plain");
    app.server
        .post(&format!("/api/memories/{}/images", id))
        .authorization_bearer(&token)
        .multipart(MultipartForm::new().add_part("image", text))
        .await
        .assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);

    // the stored extension follows the checked content type, not the name
    let disguised = Part::bytes(b"<script>alert(1)</script>".to_vec())
        .file_name("page.html")
        .mime_type("image/png");
    let response = app
        .server
        .post(&format!("/api/memories/{}/images", id))
        .authorization_bearer(&token)
        .multipart(MultipartForm::new().add_part("image", disguised))
        .await;
    response.assert_status(StatusCode::CREATED);
    let disguised: Value = response.json();
    let disguised_url = disguised["image_url"].as_str().unwrap();
    assert!(disguised_url.ends_with(".png"));
    let media = app.server.get(disguised_url).await;
    media.assert_status_ok();
    assert_eq!(media.header("content-type"), "image/png");

    app.server
        .delete(&format!("/api/images/{}", image["image_id"].as_str().unwrap()))
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    app.server.get(url).await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comments_and_bookmarks() {
    let app = create_test_server().await;
    let (author, _) = signup(&app.server, "author").await;
    let (reader, reader_id) = signup(&app.server, "reader").await;
    let memory = create_memory(&app.server, &author, "북마크할 기억").await;
    let memory_id = memory["id"].as_str().unwrap();

    let comment = app
        .server
        .post(&format!("/api/memories/{}/comments", memory_id))
        .authorization_bearer(&reader)
        .json(&json!({"content": "저도 가봤어요"}))
        .await;
    comment.assert_status(StatusCode::CREATED);
    let comment: Value = comment.json();
    assert_eq!(comment["nickname"], "reader");

    app.server
        .put(&format!("/api/comments/{}", comment["id"].as_str().unwrap()))
        .authorization_bearer(&author)
        .json(&json!({"content": "edited"}))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let comments: Value = app
        .server
        .get(&format!("/api/memories/{}/comments", memory_id))
        .await
        .json();
    assert_eq!(comments.as_array().unwrap().len(), 1);

    let bookmark = app
        .server
        .post("/api/bookmarks")
        .authorization_bearer(&reader)
        .json(&json!({"memory_id": memory_id}))
        .await;
    bookmark.assert_status(StatusCode::CREATED);
    let bookmark: Value = bookmark.json();
    assert_eq!(bookmark["memory_content"], "북마크할 기억");

    app.server
        .post("/api/bookmarks")
        .authorization_bearer(&reader)
        .json(&json!({"memory_id": memory_id}))
        .await
        .assert_status(StatusCode::CONFLICT);

    let mypage: Value = app
        .server
        .get(&format!("/api/mypage/{}", reader_id))
        .await
        .json();
    assert_eq!(mypage["user"]["nickname"], "reader");
    assert_eq!(mypage["bookmarks"].as_array().unwrap().len(), 1);

    app.server
        .delete(&format!("/api/bookmarks/{}", bookmark["id"].as_str().unwrap()))
        .authorization_bearer(&author)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    app.server
        .get("/api/bookmarks")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

// Places

#[tokio::test]
async fn test_manual_place_status_and_saved_places() {
    let app = create_test_server().await;
    let (token, _) = signup(&app.server, "saver").await;

    let response = app
        .server
        .post("/api/places")
        .authorization_bearer(&token)
        .json(&json!({
            "name": "연탄불고기",
            "address": format!("{} 11", ITAEWON),
            "emotion_ids": ["1"],
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let place: Value = response.json();
    let place_id = place["place"]["id"].as_str().unwrap().to_string();
    assert!(
        place["place"]["google_place_id"]
            .as_str()
            .unwrap()
            .starts_with("manual-")
    );
    assert_eq!(place["location"]["name"], "이태원동");
    assert_eq!(place["place"]["status"], "operating");

    let closed = app
        .server
        .put(&format!("/api/places/{}/status", place_id))
        .authorization_bearer(&token)
        .json(&json!({"status": "폐업함"}))
        .await;
    closed.assert_status_ok();
    let closed: Value = closed.json();
    assert_eq!(closed["place"]["status"], "closed");

    app.server
        .put(&format!("/api/places/{}/status", place_id))
        .authorization_bearer(&token)
        .json(&json!({"status": "vanished"}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let listed: Value = app
        .server
        .get("/api/places")
        .add_query_param("status", "closed")
        .await
        .json();
    assert_eq!(listed["total"], 1);

    app.server
        .get(&format!("/api/places/{}/summary", place_id))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    app.server
        .post("/api/saved-places")
        .authorization_bearer(&token)
        .json(&json!({"place_id": place_id, "rec": 3}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let saved = app
        .server
        .post("/api/saved-places")
        .authorization_bearer(&token)
        .json(&json!({"place_id": place_id, "rec": 1}))
        .await;
    saved.assert_status(StatusCode::CREATED);

    let saved_list: Value = app
        .server
        .get("/api/saved-places")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(saved_list.as_array().unwrap().len(), 1);
    assert_eq!(saved_list[0]["place"]["name"], "연탄불고기");
}

#[tokio::test]
async fn test_summary_regeneration_needs_an_llm() {
    let app = create_test_server().await;
    let (token, _) = signup(&app.server, "saver").await;
    let place: Value = app
        .server
        .post("/api/places")
        .authorization_bearer(&token)
        .json(&json!({"name": "골목카페", "address": ITAEWON, "location_id": "1"}))
        .await
        .json();

    app.server
        .post(&format!(
            "/api/places/{}/summary",
            place["place"]["id"].as_str().unwrap()
        ))
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

// Recommendations and inference

#[tokio::test]
async fn test_provider_endpoints_without_configuration() {
    let app = create_test_server().await;

    let response = app
        .server
        .get("/api/search/store")
        .add_query_param("q", "연탄불고기")
        .await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["error"], "provider_not_configured");

    app.server
        .post("/api/recommendations/prompt")
        .json(&json!({"prompt": "안녕"}))
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_inference_session_round_trip() {
    let app = create_test_app(Some(itaewon_places()), Some(pipeline_llm())).await;
    let (token, _) = signup(&app.server, "explorer").await;

    let options: Value = app.server.get("/api/infer/options").await.json();
    assert_eq!(options["locations"][0]["name"], "이태원동");

    app.server
        .post("/api/infer/sessions")
        .json(&json!({"location_ids": ["1"], "emotion_ids": ["1", "2", "3", "4"]}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post("/api/infer/sessions")
        .authorization_bearer(&token)
        .json(&json!({"location_ids": ["1"], "emotion_ids": ["1"]}))
        .await;
    response.assert_status(StatusCode::CREATED);
    let outcome: Value = response.json();
    assert_eq!(
        outcome["session"]["overall_recommendation"],
        "정겨운 가게들을 골랐습니다."
    );
    assert_eq!(outcome["places"][0]["place"]["name"], "연탄불고기");
    assert_eq!(outcome["places"][0]["rec"], 2);

    let session_id = outcome["session"]["id"].as_str().unwrap();
    let detail: Value = app
        .server
        .get(&format!("/api/infer/sessions/{}", session_id))
        .await
        .json();
    assert_eq!(detail["recommendations"][0]["rank"], 1);

    let history: Value = app
        .server
        .get("/api/infer/history")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(history["total"], 1);

    // anonymous sessions are not recorded in anyone's history
    app.server
        .post("/api/infer/sessions")
        .json(&json!({"location_ids": ["1"], "emotion_ids": ["1"]}))
        .await
        .assert_status(StatusCode::CREATED);
    let history: Value = app
        .server
        .get("/api/infer/history")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(history["total"], 1);

    let metrics: Value = app.server.get("/api/metrics/external").await.json();
    assert!(metrics["apis"].as_array().unwrap().len() > 0);
    assert!(metrics["cache"]["size"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_search_store_card() {
    let app = create_test_app(Some(itaewon_places()), Some(pipeline_llm())).await;

    let response = app
        .server
        .get("/api/search/store")
        .add_query_param("q", "연탄불고기")
        .await;
    response.assert_status_ok();
    let card: Value = response.json();
    assert_eq!(card["google_place_id"], "p1");
    assert_eq!(card["status"], "operating");
    assert_eq!(card["status_label"], "운영중");

    app.server
        .get("/api/search/store")
        .add_query_param("q", "없는가게")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
