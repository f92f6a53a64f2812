//! API implementation for the Moodmap HTTP server

use std::sync::Arc;

use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    middleware,
    response::Json,
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

pub mod auth;
pub mod auth_endpoints;
pub mod auth_service;
pub mod bookmarks;
pub mod dto;
pub mod infer;
pub mod memories;
pub mod metrics;
pub mod mypage;
pub mod places;
pub mod recommendations;
pub mod tags;
pub mod uploads;

use auth::auth_middleware;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        auth_endpoints::signup,
        auth_endpoints::login,
        auth_endpoints::logout,
        auth_endpoints::check_nickname,
        auth_endpoints::check_email,
        auth_endpoints::get_me,
        auth_endpoints::update_me,
        auth_endpoints::delete_me,
        auth_endpoints::upload_profile_image,
        tags::list_emotions,
        tags::create_emotion,
        tags::get_emotion,
        tags::update_emotion,
        tags::delete_emotion,
        tags::list_locations,
        tags::create_location,
        tags::get_location,
        tags::update_location,
        tags::delete_location,
        tags::tag_options,
        memories::create_memory,
        memories::get_memory,
        memories::list_memories,
        memories::update_memory,
        memories::delete_memory,
        memories::upload_image,
        memories::delete_image,
        memories::list_comments,
        memories::create_comment,
        memories::update_comment,
        memories::delete_comment,
        bookmarks::list_bookmarks,
        bookmarks::create_bookmark,
        bookmarks::delete_bookmark,
        places::list_places,
        places::create_place,
        places::get_place,
        places::update_place_status,
        places::get_summary,
        places::regenerate_summary,
        places::list_saved_places,
        places::save_place,
        places::delete_saved_place,
        recommendations::similar_places,
        recommendations::closed_store,
        recommendations::expand_emotions,
        recommendations::prompt,
        recommendations::search_store,
        infer::options,
        infer::create_session,
        infer::get_session,
        infer::history,
        mypage::mypage,
        metrics::external_metrics,
    ),
    components(
        schemas(
            auth_endpoints::SignupRequest,
            auth_endpoints::LoginRequest,
            auth_endpoints::AuthResponse,
            auth_endpoints::UpdateMeRequest,
            auth_endpoints::AvailabilityResponse,
            dto::TagDto,
            dto::TagRequest,
            dto::TagOptionsDto,
            dto::UserDto,
            dto::ProfileDto,
            dto::ImageDto,
            dto::MemoryDto,
            dto::CreateMemoryRequest,
            dto::UpdateMemoryRequest,
            dto::MemoryListResponse,
            dto::CommentDto,
            dto::CommentRequest,
            dto::BookmarkDto,
            dto::BookmarkRequest,
            dto::ReviewDto,
            dto::PlaceDto,
            dto::SummaryDto,
            dto::PlaceDetailDto,
            dto::PlaceListResponse,
            dto::CreatePlaceRequest,
            dto::PlaceStatusRequest,
            dto::SavedPlaceDto,
            dto::SavePlaceRequest,
            dto::RecommendedPlaceDto,
            dto::SimilarPlacesRequest,
            dto::ClosedStoreRequest,
            dto::ExpandEmotionsRequest,
            dto::PromptRequest,
            dto::TextResponse,
            dto::InferenceSessionRequest,
            dto::SessionDto,
            dto::InferenceResponse,
            dto::SessionEntryDto,
            dto::SessionDetailDto,
            dto::SessionListResponse,
            dto::StoreCardDto,
            dto::MyPageDto,
            dto::CacheStatsDto,
            dto::ApiStatsDto,
            dto::ExternalMetricsDto,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Signup, login and the caller's own account"),
        (name = "community", description = "Emotion and location tags, profile pages"),
        (name = "memories", description = "Memories with their images, comments and bookmarks"),
        (name = "places", description = "Places, AI summaries and saved places"),
        (name = "recommendations", description = "Closed-store replacements, LLM helpers and store search"),
        (name = "inference", description = "Recommendation sessions from locations and emotions"),
        (name = "system", description = "Health and external API statistics"),
    ),
    info(
        title = "Moodmap API",
        version = "1.0.0",
        description = "REST API for sharing place memories tagged with emotions and neighbourhoods, and for venue recommendations built from a places provider and an LLM.",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;

/// Registers the bearer JWT scheme referenced by `security(("bearer" = []))`.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Create the main router with all API endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        // Account endpoints
        .route("/auth/signup", post(auth_endpoints::signup))
        .route("/auth/login", post(auth_endpoints::login))
        .route("/auth/logout", post(auth_endpoints::logout))
        .route("/auth/check-nickname", get(auth_endpoints::check_nickname))
        .route("/auth/check-email", get(auth_endpoints::check_email))
        .route(
            "/auth/me",
            get(auth_endpoints::get_me)
                .put(auth_endpoints::update_me)
                .delete(auth_endpoints::delete_me),
        )
        .route(
            "/auth/me/profile-image",
            post(auth_endpoints::upload_profile_image),
        )
        // Tag endpoints
        .route(
            "/emotions",
            get(tags::list_emotions).post(tags::create_emotion),
        )
        .route(
            "/emotions/{id}",
            get(tags::get_emotion)
                .put(tags::update_emotion)
                .delete(tags::delete_emotion),
        )
        .route(
            "/locations",
            get(tags::list_locations).post(tags::create_location),
        )
        .route(
            "/locations/{id}",
            get(tags::get_location)
                .put(tags::update_location)
                .delete(tags::delete_location),
        )
        .route("/tag-options", get(tags::tag_options))
        // Memory endpoints
        .route(
            "/memories",
            get(memories::list_memories).post(memories::create_memory),
        )
        .route(
            "/memories/{id}",
            get(memories::get_memory)
                .put(memories::update_memory)
                .delete(memories::delete_memory),
        )
        .route("/memories/{id}/images", post(memories::upload_image))
        .route("/images/{id}", delete(memories::delete_image))
        .route(
            "/memories/{id}/comments",
            get(memories::list_comments).post(memories::create_comment),
        )
        .route(
            "/comments/{id}",
            put(memories::update_comment).delete(memories::delete_comment),
        )
        .route(
            "/bookmarks",
            get(bookmarks::list_bookmarks).post(bookmarks::create_bookmark),
        )
        .route("/bookmarks/{id}", delete(bookmarks::delete_bookmark))
        // Place endpoints
        .route(
            "/places",
            get(places::list_places).post(places::create_place),
        )
        .route("/places/{id}", get(places::get_place))
        .route("/places/{id}/status", put(places::update_place_status))
        .route(
            "/places/{id}/summary",
            get(places::get_summary).post(places::regenerate_summary),
        )
        .route(
            "/saved-places",
            get(places::list_saved_places).post(places::save_place),
        )
        .route(
            "/saved-places/{id}",
            delete(places::delete_saved_place),
        )
        // Recommendation endpoints
        .route(
            "/recommendations/similar",
            post(recommendations::similar_places),
        )
        .route(
            "/recommendations/closed-store",
            post(recommendations::closed_store),
        )
        .route(
            "/recommendations/expand-emotions",
            post(recommendations::expand_emotions),
        )
        .route("/recommendations/prompt", post(recommendations::prompt))
        .route("/search/store", get(recommendations::search_store))
        // Inference endpoints
        .route("/infer/options", get(infer::options))
        .route("/infer/sessions", post(infer::create_session))
        .route("/infer/sessions/{id}", get(infer::get_session))
        .route("/infer/history", get(infer::history))
        .route("/mypage/{user_id}", get(mypage::mypage))
        .route("/metrics/external", get(metrics::external_metrics))
        .route("/health", get(health_check))
        // Bearer tokens are decoded for every route; handlers decide whether one is required
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .with_state(state.clone());

    let swagger_router = SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi());
    let media = ServeDir::new(&state.moodmap.config().uploads.dir);

    Router::new()
        .nest("/api", api_router)
        .nest_service("/media", media)
        .merge(swagger_router)
}

/// Health check endpoint with provider reporting
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "system",
    responses(
        (status = 200, description = "Service health and configured providers", body = serde_json::Value)
    )
)]
async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "OK",
        "version": moodmap::VERSION,
        "providers": {
            "places": state.moodmap.places_configured(),
            "llm": state.moodmap.llm_configured(),
        },
        "signup": state.config.allow_signup,
    }))
}
