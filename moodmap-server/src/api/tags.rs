//! Emotion and location tag endpoints

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use moodmap::models::TagKind;

use crate::{
    api::{
        auth::AuthUser,
        dto::{TagDto, TagOptionsDto, TagRequest},
    },
    error::ServerResult,
    state::AppState,
};

async fn list(state: &AppState, kind: TagKind) -> ServerResult<Json<Vec<TagDto>>> {
    let tags = state.moodmap.community().list_tags(kind).await?;
    Ok(Json(tags.into_iter().map(TagDto::from).collect()))
}

async fn create(
    state: &AppState,
    kind: TagKind,
    request: TagRequest,
) -> ServerResult<(StatusCode, Json<TagDto>)> {
    let tag = state
        .moodmap
        .community()
        .create_tag(kind, &request.name)
        .await?;
    Ok((StatusCode::CREATED, Json(tag.into())))
}

async fn get(state: &AppState, kind: TagKind, id: &str) -> ServerResult<Json<TagDto>> {
    let tag = state.moodmap.community().get_tag(kind, id).await?;
    Ok(Json(tag.into()))
}

async fn rename(
    state: &AppState,
    kind: TagKind,
    id: &str,
    request: TagRequest,
) -> ServerResult<Json<TagDto>> {
    let tag = state
        .moodmap
        .community()
        .rename_tag(kind, id, &request.name)
        .await?;
    Ok(Json(tag.into()))
}

async fn delete(state: &AppState, kind: TagKind, id: &str) -> ServerResult<StatusCode> {
    state.moodmap.community().delete_tag(kind, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Emotions

#[utoipa::path(
    get,
    path = "/api/emotions",
    tag = "community",
    responses((status = 200, description = "Emotions ordered by id", body = Vec<TagDto>))
)]
pub async fn list_emotions(State(state): State<Arc<AppState>>) -> ServerResult<Json<Vec<TagDto>>> {
    list(&state, TagKind::Emotion).await
}

#[utoipa::path(
    post,
    path = "/api/emotions",
    tag = "community",
    request_body = TagRequest,
    responses(
        (status = 201, description = "Emotion created", body = TagDto),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Name already exists"),
    ),
    security(("bearer" = []))
)]
pub async fn create_emotion(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Json(request): Json<TagRequest>,
) -> ServerResult<(StatusCode, Json<TagDto>)> {
    create(&state, TagKind::Emotion, request).await
}

#[utoipa::path(
    get,
    path = "/api/emotions/{id}",
    tag = "community",
    params(("id" = String, Path, description = "Emotion ID")),
    responses(
        (status = 200, description = "Emotion", body = TagDto),
        (status = 404, description = "Not found"),
    )
)]
pub async fn get_emotion(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ServerResult<Json<TagDto>> {
    get(&state, TagKind::Emotion, &id).await
}

#[utoipa::path(
    put,
    path = "/api/emotions/{id}",
    tag = "community",
    params(("id" = String, Path, description = "Emotion ID")),
    request_body = TagRequest,
    responses(
        (status = 200, description = "Emotion renamed", body = TagDto),
        (status = 404, description = "Not found"),
        (status = 409, description = "Name already exists"),
    ),
    security(("bearer" = []))
)]
pub async fn update_emotion(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<TagRequest>,
) -> ServerResult<Json<TagDto>> {
    rename(&state, TagKind::Emotion, &id, request).await
}

#[utoipa::path(
    delete,
    path = "/api/emotions/{id}",
    tag = "community",
    params(("id" = String, Path, description = "Emotion ID")),
    responses(
        (status = 204, description = "Emotion deleted and removed from tagged records"),
        (status = 404, description = "Not found"),
    ),
    security(("bearer" = []))
)]
pub async fn delete_emotion(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> ServerResult<StatusCode> {
    delete(&state, TagKind::Emotion, &id).await
}

// Locations

#[utoipa::path(
    get,
    path = "/api/locations",
    tag = "community",
    responses((status = 200, description = "Locations ordered by id", body = Vec<TagDto>))
)]
pub async fn list_locations(
    State(state): State<Arc<AppState>>,
) -> ServerResult<Json<Vec<TagDto>>> {
    list(&state, TagKind::Location).await
}

#[utoipa::path(
    post,
    path = "/api/locations",
    tag = "community",
    request_body = TagRequest,
    responses(
        (status = 201, description = "Location created", body = TagDto),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Name already exists"),
    ),
    security(("bearer" = []))
)]
pub async fn create_location(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Json(request): Json<TagRequest>,
) -> ServerResult<(StatusCode, Json<TagDto>)> {
    create(&state, TagKind::Location, request).await
}

#[utoipa::path(
    get,
    path = "/api/locations/{id}",
    tag = "community",
    params(("id" = String, Path, description = "Location ID")),
    responses(
        (status = 200, description = "Location", body = TagDto),
        (status = 404, description = "Not found"),
    )
)]
pub async fn get_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ServerResult<Json<TagDto>> {
    get(&state, TagKind::Location, &id).await
}

#[utoipa::path(
    put,
    path = "/api/locations/{id}",
    tag = "community",
    params(("id" = String, Path, description = "Location ID")),
    request_body = TagRequest,
    responses(
        (status = 200, description = "Location renamed", body = TagDto),
        (status = 404, description = "Not found"),
        (status = 409, description = "Name already exists"),
    ),
    security(("bearer" = []))
)]
pub async fn update_location(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<TagRequest>,
) -> ServerResult<Json<TagDto>> {
    rename(&state, TagKind::Location, &id, request).await
}

#[utoipa::path(
    delete,
    path = "/api/locations/{id}",
    tag = "community",
    params(("id" = String, Path, description = "Location ID")),
    responses(
        (status = 204, description = "Location deleted"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Still referenced by a place"),
    ),
    security(("bearer" = []))
)]
pub async fn delete_location(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> ServerResult<StatusCode> {
    delete(&state, TagKind::Location, &id).await
}

#[utoipa::path(
    get,
    path = "/api/tag-options",
    tag = "community",
    responses((status = 200, description = "Emotions and locations", body = TagOptionsDto))
)]
pub async fn tag_options(State(state): State<Arc<AppState>>) -> ServerResult<Json<TagOptionsDto>> {
    let options = state.moodmap.community().tag_options().await?;
    Ok(Json(options.into()))
}
