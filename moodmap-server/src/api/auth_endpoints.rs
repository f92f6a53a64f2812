//! Account endpoints: signup, login, logout and the caller's own profile

use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use moodmap::core::ProfileUpdate;

use crate::{
    api::{auth::AuthUser, dto::UserDto, uploads::read_image},
    error::{ServerError, ServerResult},
    state::AppState,
};

/// User signup request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SignupRequest {
    /// Email (must be unique)
    pub email: String,
    /// Nickname (must be unique)
    pub nickname: String,
    /// Password, at least 8 characters
    pub password: String,
    /// Optional taste profile text
    pub detail: Option<String>,
}

/// User login request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Authentication response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    /// JWT token
    pub token: String,
    /// Always "Bearer"
    pub token_type: String,
    /// Token expiration timestamp
    pub expires_at: i64,
    pub user: UserDto,
}

/// Profile update. Absent fields are left alone.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateMeRequest {
    pub nickname: Option<String>,
    pub detail: Option<String>,
    /// New password, at least 8 characters
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct NicknameParams {
    pub nickname: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct EmailParams {
    pub email: String,
}

/// Availability of a nickname or email
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AvailabilityResponse {
    pub available: bool,
}

/// User signup endpoint
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "auth",
    summary = "Register a new user account",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created successfully", body = AuthResponse),
        (status = 400, description = "Invalid request data"),
        (status = 403, description = "Signup disabled"),
        (status = 409, description = "Email or nickname already taken"),
    )
)]
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignupRequest>,
) -> ServerResult<(StatusCode, Json<AuthResponse>)> {
    if !state.config.allow_signup {
        return Err(ServerError::Forbidden("User signup is disabled".to_string()));
    }

    let user = state
        .auth
        .signup(
            &state.moodmap,
            &request.email,
            &request.nickname,
            &request.password,
            request.detail.as_deref(),
        )
        .await?;
    let (token, expires_at) = state.auth.issue_token(&user)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_at,
            user: user.into(),
        }),
    ))
}

/// User login endpoint
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    summary = "Authenticate user and get JWT token",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> ServerResult<Json<AuthResponse>> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(ServerError::Auth(
            "Email and password are required".to_string(),
        ));
    }

    let (token, user, expires_at) = state
        .auth
        .authenticate(&state.moodmap, &request.email, &request.password)
        .await?;

    Ok(Json(AuthResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_at,
        user: user.into(),
    }))
}

/// Logout endpoint
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    summary = "Revoke the current token",
    responses(
        (status = 204, description = "Token revoked"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = []))
)]
pub async fn logout(State(state): State<Arc<AppState>>, user: AuthUser) -> StatusCode {
    state.auth.revoke(&user.0);
    tracing::info!(user_id = user.id(), "User logged out");
    StatusCode::NO_CONTENT
}

#[utoipa::path(
    get,
    path = "/api/auth/check-nickname",
    tag = "auth",
    summary = "Check whether a nickname is free",
    params(NicknameParams),
    responses(
        (status = 200, description = "Availability", body = AvailabilityResponse),
        (status = 400, description = "Empty or too long nickname"),
    )
)]
pub async fn check_nickname(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NicknameParams>,
) -> ServerResult<Json<AvailabilityResponse>> {
    let available = state
        .moodmap
        .accounts()
        .is_nickname_available(&params.nickname)
        .await?;
    Ok(Json(AvailabilityResponse { available }))
}

#[utoipa::path(
    get,
    path = "/api/auth/check-email",
    tag = "auth",
    summary = "Check whether an email is free",
    params(EmailParams),
    responses(
        (status = 200, description = "Availability", body = AvailabilityResponse),
        (status = 400, description = "Malformed email"),
    )
)]
pub async fn check_email(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EmailParams>,
) -> ServerResult<Json<AvailabilityResponse>> {
    let available = state
        .moodmap
        .accounts()
        .is_email_available(&params.email)
        .await?;
    Ok(Json(AvailabilityResponse { available }))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    summary = "Current user",
    responses(
        (status = 200, description = "Current user", body = UserDto),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = []))
)]
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ServerResult<Json<UserDto>> {
    let user = state.moodmap.accounts().get_user(user.id()).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    put,
    path = "/api/auth/me",
    tag = "auth",
    summary = "Update nickname, detail or password",
    request_body = UpdateMeRequest,
    responses(
        (status = 200, description = "Updated user", body = UserDto),
        (status = 400, description = "Invalid request data"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Nickname already taken"),
    ),
    security(("bearer" = []))
)]
pub async fn update_me(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(request): Json<UpdateMeRequest>,
) -> ServerResult<Json<UserDto>> {
    let accounts = state.moodmap.accounts();

    if let Some(password) = request.password.as_deref() {
        accounts.validate_password(password)?;
        let hash = state.auth.hash(password)?;
        accounts.set_password_hash(user.id(), &hash).await?;
    }

    let updated = accounts
        .update_profile(
            user.id(),
            ProfileUpdate {
                nickname: request.nickname,
                detail: request.detail,
            },
        )
        .await?;
    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/api/auth/me",
    tag = "auth",
    summary = "Delete the account and everything it owns",
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = []))
)]
pub async fn delete_me(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ServerResult<StatusCode> {
    state.moodmap.accounts().delete_account(user.id()).await?;
    state.auth.revoke(&user.0);
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/auth/me/profile-image",
    tag = "auth",
    summary = "Upload a new profile image (multipart)",
    responses(
        (status = 200, description = "Updated user", body = UserDto),
        (status = 401, description = "Unauthorized"),
        (status = 413, description = "Image too large"),
        (status = 415, description = "Unsupported image type"),
    ),
    security(("bearer" = []))
)]
pub async fn upload_profile_image(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    mut multipart: Multipart,
) -> ServerResult<Json<UserDto>> {
    let upload = read_image(&mut multipart).await?;
    let updated = state
        .moodmap
        .accounts()
        .set_profile_image(user.id(), upload)
        .await?;
    Ok(Json(updated.into()))
}
