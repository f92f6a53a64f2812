//! Application state management

use moodmap::core::Moodmap;

use crate::api::auth_service::AuthService;
use crate::config::ServerConfig;

/// Application state shared across all handlers
#[derive(Debug)]
pub struct AppState {
    pub moodmap: Moodmap,

    /// Server configuration
    pub config: ServerConfig,

    /// Token issuing and the logout deny-list
    pub auth: AuthService,
}

impl AppState {
    /// Create new application state
    pub fn new(moodmap: Moodmap, config: ServerConfig) -> Self {
        let auth = AuthService::new(config.jwt_secret.clone(), config.jwt_expiration_hours);
        Self {
            moodmap,
            config,
            auth,
        }
    }

    /// Replace the authentication service
    pub fn with_auth_service(mut self, auth: AuthService) -> Self {
        self.auth = auth;
        self
    }
}
