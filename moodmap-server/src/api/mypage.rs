//! Public profile page

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{api::dto::MyPageDto, error::ServerResult, state::AppState};

#[utoipa::path(
    get,
    path = "/api/mypage/{user_id}",
    tag = "community",
    params(("user_id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Profile with bookmarks and saved places", body = MyPageDto),
        (status = 404, description = "User not found"),
    )
)]
pub async fn mypage(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> ServerResult<Json<MyPageDto>> {
    let page = state.moodmap.accounts().mypage(&user_id).await?;
    Ok(Json(page.into()))
}
