//! Authentication and authorization for the moodmap API
//!
//! Every request passes through [`auth_middleware`]. A bearer token, when
//! present, must be valid and not revoked, and its account must still exist.
//! Its [`AuthContext`] is stored in the request extensions. Handlers that
//! write take an [`AuthUser`], which rejects anonymous requests. Read
//! handlers either take nothing or a [`MaybeUser`].

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::Response,
};
use headers::{Authorization, HeaderMapExt, authorization::Bearer};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use moodmap::MoodmapError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::ServerError, state::AppState};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Nickname at the time the token was issued
    pub nickname: String,
    /// User role
    pub role: String,
    /// Token ID, used by the logout deny-list
    pub jti: String,
    /// Issued at timestamp
    pub iat: usize,
    /// Expiration timestamp
    pub exp: usize,
}

/// User authentication context
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: String,
    pub nickname: String,
    pub role: String,
    pub token_id: String,
    pub expires_at: usize,
}

/// An authenticated caller. Rejects the request with 401 otherwise.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthContext);

impl AuthUser {
    pub fn id(&self) -> &str {
        &self.0.user_id
    }
}

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| ServerError::Auth("Missing authorization header".to_string()))
    }
}

/// The caller when a valid token was sent, `None` for anonymous requests.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<AuthContext>);

impl MaybeUser {
    pub fn id(&self) -> Option<&str> {
        self.0.as_ref().map(|ctx| ctx.user_id.as_str())
    }
}

impl<S: Send + Sync> FromRequestParts<S> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(parts.extensions.get::<AuthContext>().cloned()))
    }
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(auth_header) = headers.typed_get::<Authorization<Bearer>>() else {
        return Ok(next.run(request).await);
    };

    let auth_context = state.auth.validate_token(auth_header.token())?;
    match state.moodmap.accounts().get_user(&auth_context.user_id).await {
        Ok(_) => {}
        Err(MoodmapError::NotFound(_)) => {
            return Err(ServerError::Auth("Account no longer exists".to_string()));
        }
        Err(e) => return Err(e.into()),
    }
    tracing::debug!(user_id = %auth_context.user_id, "Authenticated request");
    request.extensions_mut().insert(auth_context);

    Ok(next.run(request).await)
}

/// Decode a JWT token and return the authentication context
pub fn validate_jwt_token(token: &str, secret: &str) -> Result<AuthContext, ServerError> {
    let decoding_key = DecodingKey::from_secret(secret.as_ref());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| ServerError::Auth(format!("Invalid token: {}", e)))?;

    Ok(AuthContext {
        user_id: token_data.claims.sub,
        nickname: token_data.claims.nickname,
        role: token_data.claims.role,
        token_id: token_data.claims.jti,
        expires_at: token_data.claims.exp,
    })
}

/// Generate a JWT token for a user
pub fn generate_jwt_token(
    user_id: &str,
    nickname: &str,
    role: &str,
    secret: &str,
    expiration_hours: u64,
) -> Result<(String, i64), ServerError> {
    let now = chrono::Utc::now().timestamp() as usize;
    let exp = now + (expiration_hours * 3600) as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        nickname: nickname.to_string(),
        role: role.to_string(),
        jti: Uuid::new_v4().to_string(),
        iat: now,
        exp,
    };

    let encoding_key = EncodingKey::from_secret(secret.as_ref());
    let token = encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| ServerError::Internal(format!("Failed to generate token: {}", e)))?;

    Ok((token, exp as i64))
}

/// Hash a password using bcrypt
pub fn hash_password(password: &str, cost: u32) -> Result<String, ServerError> {
    bcrypt::hash(password, cost)
        .map_err(|e| ServerError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ServerError> {
    bcrypt::verify(password, hash)
        .map_err(|e| ServerError::Internal(format!("Failed to verify password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trips_claims() {
        let (token, expires_at) = generate_jwt_token("u1", "산책러", "user", "secret", 1).unwrap();
        assert!(expires_at > chrono::Utc::now().timestamp());

        let ctx = validate_jwt_token(&token, "secret").unwrap();
        assert_eq!(ctx.user_id, "u1");
        assert_eq!(ctx.nickname, "산책러");
        assert_eq!(ctx.role, "user");
        assert!(!ctx.token_id.is_empty());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let (token, _) = generate_jwt_token("u1", "n", "user", "secret", 1).unwrap();
        let err = validate_jwt_token(&token, "other").unwrap_err();
        assert!(matches!(err, ServerError::Auth(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: "u1".to_string(),
            nickname: "n".to_string(),
            role: "user".to_string(),
            jti: "t1".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("secret".as_ref()),
        )
        .unwrap();

        assert!(validate_jwt_token(&token, "secret").is_err());
    }

    #[test]
    fn passwords_verify_against_their_hash() {
        let hash = hash_password("password123", 4).unwrap();
        assert!(verify_password("password123", &hash).unwrap());
        assert!(!verify_password("password124", &hash).unwrap());
    }
}
