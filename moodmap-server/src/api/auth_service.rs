//! Authentication service on top of the moodmap account operations

use dashmap::DashMap;

use moodmap::{core::Moodmap, models::User};

use crate::{
    api::auth::{
        AuthContext, generate_jwt_token, hash_password, validate_jwt_token, verify_password,
    },
    error::{ServerError, ServerResult},
};

/// Issues and checks tokens and keeps the logout deny-list.
#[derive(Debug)]
pub struct AuthService {
    jwt_secret: String,
    jwt_expiration_hours: u64,
    bcrypt_cost: u32,
    /// Revoked token IDs with their expiry timestamp
    revoked: DashMap<String, usize>,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(jwt_secret: String, jwt_expiration_hours: u64) -> Self {
        Self {
            jwt_secret,
            jwt_expiration_hours,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            revoked: DashMap::new(),
        }
    }

    /// Use a different bcrypt work factor (tests use the minimum)
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    pub fn hash(&self, password: &str) -> ServerResult<String> {
        hash_password(password, self.bcrypt_cost)
    }

    /// Register a new account
    pub async fn signup(
        &self,
        moodmap: &Moodmap,
        email: &str,
        nickname: &str,
        password: &str,
        detail: Option<&str>,
    ) -> ServerResult<User> {
        let accounts = moodmap.accounts();
        accounts.validate_email(email)?;
        accounts.validate_password(password)?;

        let password_hash = self.hash(password)?;
        Ok(accounts
            .register(email, nickname, &password_hash, detail)
            .await?)
    }

    /// Authenticate user and return JWT token
    pub async fn authenticate(
        &self,
        moodmap: &Moodmap,
        email: &str,
        password: &str,
    ) -> ServerResult<(String, User, i64)> {
        let user = moodmap
            .accounts()
            .find_by_email(email)
            .await?
            .ok_or_else(|| ServerError::Auth("Invalid email or password".to_string()))?;

        if !verify_password(password, &user.password_hash)? {
            return Err(ServerError::Auth("Invalid email or password".to_string()));
        }

        let (token, expires_at) = self.issue_token(&user)?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok((token, user, expires_at))
    }

    pub fn issue_token(&self, user: &User) -> ServerResult<(String, i64)> {
        generate_jwt_token(
            &user.id,
            &user.nickname,
            &user.role.to_string(),
            &self.jwt_secret,
            self.jwt_expiration_hours,
        )
    }

    /// Decode a token and refuse revoked ones
    pub fn validate_token(&self, token: &str) -> ServerResult<AuthContext> {
        let context = validate_jwt_token(token, &self.jwt_secret)?;
        if self.revoked.contains_key(&context.token_id) {
            return Err(ServerError::Auth("Token has been revoked".to_string()));
        }
        Ok(context)
    }

    /// Put a token on the deny-list until it expires
    pub fn revoke(&self, context: &AuthContext) {
        let now = chrono::Utc::now().timestamp() as usize;
        self.revoked.retain(|_, expires_at| *expires_at > now);
        self.revoked
            .insert(context.token_id.clone(), context.expires_at);
        tracing::debug!(user_id = %context.user_id, "Revoked token");
    }

    /// Number of tokens currently on the deny-list
    pub fn revoked_count(&self) -> usize {
        self.revoked.len()
    }
}
