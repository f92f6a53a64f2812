//! Bookmark endpoints. All of them act on the caller's own bookmarks.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use moodmap::models::BookmarkView;

use crate::{
    api::{
        auth::AuthUser,
        dto::{BookmarkDto, BookmarkRequest},
    },
    error::ServerResult,
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/api/bookmarks",
    tag = "memories",
    responses(
        (status = 200, description = "Bookmarks of the caller, newest first", body = Vec<BookmarkDto>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = []))
)]
pub async fn list_bookmarks(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ServerResult<Json<Vec<BookmarkDto>>> {
    let bookmarks = state.moodmap.community().list_bookmarks(user.id()).await?;
    Ok(Json(bookmarks.into_iter().map(BookmarkDto::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/bookmarks",
    tag = "memories",
    request_body = BookmarkRequest,
    responses(
        (status = 201, description = "Bookmark created", body = BookmarkDto),
        (status = 404, description = "Memory not found"),
        (status = 409, description = "Already bookmarked"),
    ),
    security(("bearer" = []))
)]
pub async fn create_bookmark(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(request): Json<BookmarkRequest>,
) -> ServerResult<(StatusCode, Json<BookmarkDto>)> {
    let community = state.moodmap.community();
    let bookmark = community.bookmark(user.id(), &request.memory_id).await?;
    let memory = community.get_memory(&bookmark.memory_id).await?;

    let view = BookmarkView {
        bookmark,
        memory_content: memory.memory.content,
        images: memory.images,
    };
    Ok((StatusCode::CREATED, Json(view.into())))
}

#[utoipa::path(
    delete,
    path = "/api/bookmarks/{id}",
    tag = "memories",
    params(("id" = String, Path, description = "Bookmark ID")),
    responses(
        (status = 204, description = "Bookmark removed"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Bookmark not found"),
    ),
    security(("bearer" = []))
)]
pub async fn delete_bookmark(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ServerResult<StatusCode> {
    state
        .moodmap
        .community()
        .delete_bookmark(user.id(), &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
