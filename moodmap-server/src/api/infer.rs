//! Inference sessions: pick locations and emotions, get ranked places back

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use moodmap::core::InferenceRequest;

use crate::{
    api::{
        auth::{AuthUser, MaybeUser},
        dto::{
            InferenceResponse, InferenceSessionRequest, PageParams, SessionDetailDto,
            SessionListResponse, TagOptionsDto,
        },
    },
    error::ServerResult,
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/api/infer/options",
    tag = "inference",
    responses((status = 200, description = "Selectable emotions and locations", body = TagOptionsDto))
)]
pub async fn options(State(state): State<Arc<AppState>>) -> ServerResult<Json<TagOptionsDto>> {
    let options = state.moodmap.recommender().options().await?;
    Ok(Json(options.into()))
}

/// Run a session. Signed-in callers get it recorded in their history and
/// their saved places left out of the result.
#[utoipa::path(
    post,
    path = "/api/infer/sessions",
    tag = "inference",
    request_body = InferenceSessionRequest,
    responses(
        (status = 201, description = "Session stored with its places", body = InferenceResponse),
        (status = 400, description = "Bad selection, or no places found"),
        (status = 503, description = "Places provider not configured"),
    ),
    security((), ("bearer" = []))
)]
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    user: MaybeUser,
    Json(request): Json<InferenceSessionRequest>,
) -> ServerResult<(StatusCode, Json<InferenceResponse>)> {
    let outcome = state
        .moodmap
        .recommender()
        .run_inference(
            user.id(),
            InferenceRequest {
                location_ids: request.location_ids,
                emotion_ids: request.emotion_ids,
            },
        )
        .await?;
    tracing::info!(
        session_id = %outcome.session.id,
        places = outcome.places.len(),
        "Inference session completed"
    );
    Ok((StatusCode::CREATED, Json(outcome.into())))
}

#[utoipa::path(
    get,
    path = "/api/infer/sessions/{id}",
    tag = "inference",
    params(("id" = String, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session with its ranked places", body = SessionDetailDto),
        (status = 404, description = "Session not found"),
    )
)]
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ServerResult<Json<SessionDetailDto>> {
    let detail = state.moodmap.recommender().get_session(&id).await?;
    Ok(Json(detail.into()))
}

#[utoipa::path(
    get,
    path = "/api/infer/history",
    tag = "inference",
    params(PageParams),
    responses(
        (status = 200, description = "Sessions of the caller, newest first", body = SessionListResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = []))
)]
pub async fn history(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(params): Query<PageParams>,
) -> ServerResult<Json<SessionListResponse>> {
    let page = state
        .moodmap
        .recommender()
        .history(user.id(), (&params).into())
        .await?;
    Ok(Json(page.into()))
}
