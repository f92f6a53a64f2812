//! Place, summary and saved-place endpoints

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use moodmap::{
    MoodmapError,
    core::{Pagination, PlaceInput},
    models::{PlaceStatus, RecKind},
    storage::PlaceFilter,
};

use crate::{
    api::{
        auth::AuthUser,
        dto::{
            CreatePlaceRequest, PlaceDetailDto, PlaceListParams, PlaceListResponse,
            PlaceStatusRequest, SavePlaceRequest, SavedPlaceDto, SummaryDto,
        },
    },
    error::{ServerResult, bad_request},
    state::AppState,
};

fn parse_status(value: &str) -> ServerResult<PlaceStatus> {
    PlaceStatus::from_str(value.trim()).map_err(|e| bad_request(&e))
}

#[utoipa::path(
    get,
    path = "/api/places",
    tag = "places",
    params(PlaceListParams),
    responses(
        (status = 200, description = "Page of places, newest first", body = PlaceListResponse),
        (status = 400, description = "Invalid status filter"),
    )
)]
pub async fn list_places(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PlaceListParams>,
) -> ServerResult<Json<PlaceListResponse>> {
    let status = match params.status.as_deref().filter(|s| !s.is_empty()) {
        Some(value) => Some(parse_status(value)?),
        None => None,
    };
    let filter = PlaceFilter {
        location_id: params.location_id.filter(|s| !s.is_empty()),
        emotion_id: params.emotion_id.filter(|s| !s.is_empty()),
        status,
        name_contains: params.q.filter(|s| !s.trim().is_empty()),
    };

    let page = state
        .moodmap
        .places()
        .list_places(
            &filter,
            Pagination {
                page: params.page,
                size: params.size,
            },
        )
        .await?;
    Ok(Json(page.into()))
}

#[utoipa::path(
    post,
    path = "/api/places",
    tag = "places",
    request_body = CreatePlaceRequest,
    responses(
        (status = 201, description = "Place created", body = PlaceDetailDto),
        (status = 400, description = "Missing name or address, or unknown tags"),
        (status = 409, description = "Place id already stored"),
    ),
    security(("bearer" = []))
)]
pub async fn create_place(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Json(request): Json<CreatePlaceRequest>,
) -> ServerResult<(StatusCode, Json<PlaceDetailDto>)> {
    let status = match request.status.as_deref() {
        Some(value) => parse_status(value)?,
        None => PlaceStatus::default(),
    };
    let view = state
        .moodmap
        .places()
        .create_place(PlaceInput {
            name: request.name,
            address: request.address,
            google_place_id: request.google_place_id,
            location_id: request.location_id,
            emotion_ids: request.emotion_ids,
            image_url: request.image_url,
            google_rating: request.google_rating,
            status,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(view.into())))
}

#[utoipa::path(
    get,
    path = "/api/places/{id}",
    tag = "places",
    params(("id" = String, Path, description = "Place ID")),
    responses(
        (status = 200, description = "Place with tags and summary", body = PlaceDetailDto),
        (status = 404, description = "Place not found"),
    )
)]
pub async fn get_place(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ServerResult<Json<PlaceDetailDto>> {
    let view = state.moodmap.places().get_place(&id).await?;
    Ok(Json(view.into()))
}

#[utoipa::path(
    put,
    path = "/api/places/{id}/status",
    tag = "places",
    params(("id" = String, Path, description = "Place ID")),
    request_body = PlaceStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = PlaceDetailDto),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Place not found"),
    ),
    security(("bearer" = []))
)]
pub async fn update_place_status(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<PlaceStatusRequest>,
) -> ServerResult<Json<PlaceDetailDto>> {
    let status = parse_status(&request.status)?;
    let view = state.moodmap.places().update_status(&id, status).await?;
    Ok(Json(view.into()))
}

// Summaries

#[utoipa::path(
    get,
    path = "/api/places/{id}/summary",
    tag = "places",
    params(("id" = String, Path, description = "Place ID")),
    responses(
        (status = 200, description = "Latest summary", body = SummaryDto),
        (status = 404, description = "Place not found or never summarized"),
    )
)]
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ServerResult<Json<SummaryDto>> {
    let summary = state
        .moodmap
        .places()
        .latest_summary(&id)
        .await?
        .ok_or_else(|| MoodmapError::NotFound(format!("summary for place {}", id)))?;
    Ok(Json(summary.into()))
}

#[utoipa::path(
    post,
    path = "/api/places/{id}/summary",
    tag = "places",
    params(("id" = String, Path, description = "Place ID")),
    responses(
        (status = 201, description = "Fresh summary stored", body = SummaryDto),
        (status = 404, description = "Place not found"),
        (status = 502, description = "LLM call failed"),
        (status = 503, description = "LLM not configured"),
    ),
    security(("bearer" = []))
)]
pub async fn regenerate_summary(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> ServerResult<(StatusCode, Json<SummaryDto>)> {
    let summary = state.moodmap.places().regenerate_summary(&id).await?;
    Ok((StatusCode::CREATED, Json(summary.into())))
}

// Saved places

#[utoipa::path(
    get,
    path = "/api/saved-places",
    tag = "places",
    responses(
        (status = 200, description = "Saved places of the caller, newest first", body = Vec<SavedPlaceDto>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = []))
)]
pub async fn list_saved_places(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ServerResult<Json<Vec<SavedPlaceDto>>> {
    let saved = state.moodmap.places().list_saved(user.id()).await?;
    Ok(Json(saved.into_iter().map(SavedPlaceDto::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/saved-places",
    tag = "places",
    request_body = SavePlaceRequest,
    responses(
        (status = 201, description = "Place saved and taste profile refreshed", body = SavedPlaceDto),
        (status = 400, description = "rec is not 1 or 2"),
        (status = 404, description = "Place not found"),
        (status = 409, description = "Already saved with this rec"),
    ),
    security(("bearer" = []))
)]
pub async fn save_place(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(request): Json<SavePlaceRequest>,
) -> ServerResult<(StatusCode, Json<SavedPlaceDto>)> {
    let rec = RecKind::try_from(request.rec).map_err(|e| bad_request(&e))?;
    let saved = state
        .moodmap
        .places()
        .save_place(user.id(), &request.place_id, rec)
        .await?;
    Ok((StatusCode::CREATED, Json(saved.into())))
}

#[utoipa::path(
    delete,
    path = "/api/saved-places/{id}",
    tag = "places",
    params(("id" = String, Path, description = "Saved place ID")),
    responses(
        (status = 204, description = "Saved place removed"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Saved place not found"),
    ),
    security(("bearer" = []))
)]
pub async fn delete_saved_place(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ServerResult<StatusCode> {
    state
        .moodmap
        .places()
        .delete_saved(user.id(), &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
