//! Recommendation and store search endpoints.
//!
//! These are public. They call the places provider and the LLM, so they
//! answer 503 when the provider they need is not configured.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};

use moodmap::core::SimilarRequest;

use crate::{
    api::dto::{
        ClosedStoreRequest, ExpandEmotionsRequest, PromptRequest, RecommendedPlaceDto,
        SimilarPlacesRequest, StoreCardDto, StoreSearchParams, TagDto, TextResponse,
    },
    error::ServerResult,
    state::AppState,
};

/// Places similar to a store that closed
#[utoipa::path(
    post,
    path = "/api/recommendations/similar",
    tag = "recommendations",
    request_body = SimilarPlacesRequest,
    responses(
        (status = 200, description = "Operating places near the closed store", body = Vec<RecommendedPlaceDto>),
        (status = 400, description = "Missing name or address, or nothing found"),
        (status = 503, description = "Places provider not configured"),
    )
)]
pub async fn similar_places(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SimilarPlacesRequest>,
) -> ServerResult<Json<Vec<RecommendedPlaceDto>>> {
    let places = state
        .moodmap
        .recommender()
        .similar_places(SimilarRequest {
            name: request.name,
            address: request.address,
            emotions: request.emotions,
        })
        .await?;
    Ok(Json(
        places.into_iter().map(RecommendedPlaceDto::from).collect(),
    ))
}

/// LLM advice on where to go instead of a closed store
#[utoipa::path(
    post,
    path = "/api/recommendations/closed-store",
    tag = "recommendations",
    request_body = ClosedStoreRequest,
    responses(
        (status = 200, description = "Free-form advice", body = TextResponse),
        (status = 400, description = "Missing store info or nearby stores"),
        (status = 502, description = "LLM call failed"),
        (status = 503, description = "LLM not configured"),
    )
)]
pub async fn closed_store(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ClosedStoreRequest>,
) -> ServerResult<Json<TextResponse>> {
    let response = state
        .moodmap
        .recommender()
        .closed_store_recommendation(&request.closed_store_info, &request.nearby_stores)
        .await?;
    Ok(Json(TextResponse { response }))
}

/// Known emotions related to the given ones
#[utoipa::path(
    post,
    path = "/api/recommendations/expand-emotions",
    tag = "recommendations",
    request_body = ExpandEmotionsRequest,
    responses(
        (status = 200, description = "Related known emotions", body = Vec<TagDto>),
        (status = 400, description = "No tags given"),
    )
)]
pub async fn expand_emotions(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExpandEmotionsRequest>,
) -> ServerResult<Json<Vec<TagDto>>> {
    let emotions = state
        .moodmap
        .recommender()
        .expand_emotions(request.tags)
        .await?;
    Ok(Json(emotions.into_iter().map(TagDto::from).collect()))
}

/// Send a raw prompt to the LLM
#[utoipa::path(
    post,
    path = "/api/recommendations/prompt",
    tag = "recommendations",
    request_body = PromptRequest,
    responses(
        (status = 200, description = "LLM reply", body = TextResponse),
        (status = 400, description = "Empty prompt"),
        (status = 502, description = "LLM call failed"),
        (status = 503, description = "LLM not configured"),
    )
)]
pub async fn prompt(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PromptRequest>,
) -> ServerResult<Json<TextResponse>> {
    let response = state.moodmap.recommender().prompt(&request.prompt).await?;
    Ok(Json(TextResponse { response }))
}

/// Summary card for the store best matching a free-text query
#[utoipa::path(
    get,
    path = "/api/search/store",
    tag = "recommendations",
    params(StoreSearchParams),
    responses(
        (status = 200, description = "Store card", body = StoreCardDto),
        (status = 400, description = "Empty query"),
        (status = 404, description = "No matching store"),
        (status = 503, description = "Places provider not configured"),
    )
)]
pub async fn search_store(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StoreSearchParams>,
) -> ServerResult<Json<StoreCardDto>> {
    let card = state.moodmap.recommender().search_store(&params.q).await?;
    Ok(Json(card.into()))
}
