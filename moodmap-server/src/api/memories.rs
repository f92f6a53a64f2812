//! Memory (post) endpoints with their images and comments

use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};

use moodmap::{
    core::{MemoryInput, Pagination},
    models::MemoryUpdate,
    storage::MemoryFilter,
};

use crate::{
    api::{
        auth::AuthUser,
        dto::{
            CommentDto, CommentRequest, CreateMemoryRequest, ImageDto, MemoryDto,
            MemoryListParams, MemoryListResponse, UpdateMemoryRequest,
        },
        uploads::read_image,
    },
    error::ServerResult,
    state::AppState,
};

/// Create a new memory
#[utoipa::path(
    post,
    path = "/api/memories",
    tag = "memories",
    request_body = CreateMemoryRequest,
    responses(
        (status = 201, description = "Memory created successfully", body = MemoryDto),
        (status = 400, description = "Missing content, too many or unknown tags"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = []))
)]
pub async fn create_memory(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(request): Json<CreateMemoryRequest>,
) -> ServerResult<(StatusCode, Json<MemoryDto>)> {
    let view = state
        .moodmap
        .community()
        .create_memory(
            user.id(),
            MemoryInput {
                content: request.content,
                emotion_ids: request.emotion_ids,
                location_id: request.location_id,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(view.into())))
}

/// Get a memory by ID
#[utoipa::path(
    get,
    path = "/api/memories/{id}",
    tag = "memories",
    params(("id" = String, Path, description = "Memory ID")),
    responses(
        (status = 200, description = "Memory found", body = MemoryDto),
        (status = 404, description = "Memory not found"),
    )
)]
pub async fn get_memory(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ServerResult<Json<MemoryDto>> {
    let view = state.moodmap.community().get_memory(&id).await?;
    Ok(Json(view.into()))
}

/// List memories, newest first
#[utoipa::path(
    get,
    path = "/api/memories",
    tag = "memories",
    params(MemoryListParams),
    responses((status = 200, description = "Page of memories", body = MemoryListResponse))
)]
pub async fn list_memories(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MemoryListParams>,
) -> ServerResult<Json<MemoryListResponse>> {
    let filter = MemoryFilter {
        user_id: params.user_id.filter(|s| !s.is_empty()),
        emotion_id: params.emotion_id.filter(|s| !s.is_empty()),
        location_id: params.location_id.filter(|s| !s.is_empty()),
    };
    let page = state
        .moodmap
        .community()
        .list_memories(
            &filter,
            Pagination {
                page: params.page,
                size: params.size,
            },
        )
        .await?;
    Ok(Json(page.into()))
}

/// Update a memory (author only)
#[utoipa::path(
    put,
    path = "/api/memories/{id}",
    tag = "memories",
    params(("id" = String, Path, description = "Memory ID")),
    request_body = UpdateMemoryRequest,
    responses(
        (status = 200, description = "Memory updated", body = MemoryDto),
        (status = 400, description = "Invalid content or tags"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Memory not found"),
    ),
    security(("bearer" = []))
)]
pub async fn update_memory(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateMemoryRequest>,
) -> ServerResult<Json<MemoryDto>> {
    let update = MemoryUpdate {
        content: request.content,
        emotion_ids: request.emotion_ids,
        location_id: request
            .location_id
            .map(|id| if id.is_empty() { None } else { Some(id) }),
    };
    let view = state
        .moodmap
        .community()
        .update_memory(user.id(), &id, update)
        .await?;
    Ok(Json(view.into()))
}

/// Delete a memory with its images, comments and bookmarks (author only)
#[utoipa::path(
    delete,
    path = "/api/memories/{id}",
    tag = "memories",
    params(("id" = String, Path, description = "Memory ID")),
    responses(
        (status = 204, description = "Memory deleted"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Memory not found"),
    ),
    security(("bearer" = []))
)]
pub async fn delete_memory(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ServerResult<StatusCode> {
    state
        .moodmap
        .community()
        .delete_memory(user.id(), &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// Images

/// Attach an image to a memory (author only, multipart)
#[utoipa::path(
    post,
    path = "/api/memories/{id}/images",
    tag = "memories",
    params(("id" = String, Path, description = "Memory ID")),
    responses(
        (status = 201, description = "Image stored", body = ImageDto),
        (status = 403, description = "Not the author"),
        (status = 413, description = "Image too large"),
        (status = 415, description = "Unsupported image type"),
    ),
    security(("bearer" = []))
)]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> ServerResult<(StatusCode, Json<ImageDto>)> {
    let upload = read_image(&mut multipart).await?;
    let image = state
        .moodmap
        .community()
        .add_image(user.id(), &id, upload)
        .await?;
    Ok((StatusCode::CREATED, Json(image.into())))
}

/// Delete an image and its blob (memory author only)
#[utoipa::path(
    delete,
    path = "/api/images/{id}",
    tag = "memories",
    params(("id" = String, Path, description = "Image ID")),
    responses(
        (status = 204, description = "Image deleted"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Image not found"),
    ),
    security(("bearer" = []))
)]
pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ServerResult<StatusCode> {
    state
        .moodmap
        .community()
        .delete_image(user.id(), &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// Comments

/// Comments on a memory, oldest first
#[utoipa::path(
    get,
    path = "/api/memories/{id}/comments",
    tag = "memories",
    params(("id" = String, Path, description = "Memory ID")),
    responses(
        (status = 200, description = "Comments", body = Vec<CommentDto>),
        (status = 404, description = "Memory not found"),
    )
)]
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ServerResult<Json<Vec<CommentDto>>> {
    let comments = state.moodmap.community().list_comments(&id).await?;
    Ok(Json(comments.into_iter().map(CommentDto::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/memories/{id}/comments",
    tag = "memories",
    params(("id" = String, Path, description = "Memory ID")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentDto),
        (status = 400, description = "Empty comment"),
        (status = 404, description = "Memory not found"),
    ),
    security(("bearer" = []))
)]
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<CommentRequest>,
) -> ServerResult<(StatusCode, Json<CommentDto>)> {
    let comment = state
        .moodmap
        .community()
        .add_comment(user.id(), &id, &request.content)
        .await?;
    Ok((StatusCode::CREATED, Json(comment.into())))
}

#[utoipa::path(
    put,
    path = "/api/comments/{id}",
    tag = "memories",
    params(("id" = String, Path, description = "Comment ID")),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Comment updated", body = CommentDto),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Comment not found"),
    ),
    security(("bearer" = []))
)]
pub async fn update_comment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<CommentRequest>,
) -> ServerResult<Json<CommentDto>> {
    let comment = state
        .moodmap
        .community()
        .update_comment(user.id(), &id, &request.content)
        .await?;
    Ok(Json(comment.into()))
}

#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    tag = "memories",
    params(("id" = String, Path, description = "Comment ID")),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Comment not found"),
    ),
    security(("bearer" = []))
)]
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ServerResult<StatusCode> {
    state
        .moodmap
        .community()
        .delete_comment(user.id(), &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
