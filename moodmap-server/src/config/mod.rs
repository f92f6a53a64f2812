//! Server configuration module

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allow cross-origin requests from any origin
    pub cors: bool,

    /// JWT secret key for signing tokens
    pub jwt_secret: String,

    /// JWT token expiration time in hours
    pub jwt_expiration_hours: u64,

    /// Allow user signup
    pub allow_signup: bool,

    /// Maximum request body size in bytes
    pub max_upload_bytes: usize,

    /// Path to the moodmap configuration file
    pub config_file_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors: true,
            jwt_secret: "".to_string(), // Generated at runtime if not provided
            jwt_expiration_hours: 24,
            allow_signup: true,
            max_upload_bytes: 10 * 1024 * 1024,
            config_file_path: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from CLI arguments and environment variables
    /// CLI arguments take precedence over environment variables
    pub fn from_cli_and_env(cli_args: crate::cli::CliArgs) -> Result<Self> {
        let mut config = Self::default();

        if let Some(host) = cli_args.host {
            config.host = host;
        } else if let Ok(host) = env::var("MOODMAP_SERVER_HOST") {
            config.host = host;
        }

        if let Some(port) = cli_args.port {
            config.port = port;
        } else if let Ok(port) = env::var("MOODMAP_SERVER_PORT") {
            config.port = port.parse()?;
        }

        if let Some(cors) = cli_args.cors {
            config.cors = cors;
        } else if let Ok(cors) = env::var("MOODMAP_SERVER_CORS") {
            config.cors = cors.parse().unwrap_or(true);
        }

        if let Some(jwt_secret) = cli_args.jwt_secret {
            config.jwt_secret = jwt_secret;
        } else if let Ok(jwt_secret) = env::var("MOODMAP_SERVER_JWT_SECRET") {
            config.jwt_secret = jwt_secret;
        }
        if config.jwt_secret.is_empty() {
            config.jwt_secret = Self::generate_jwt_secret();
        }

        if let Some(exp_hours) = cli_args.jwt_expiration_hours {
            config.jwt_expiration_hours = exp_hours;
        } else if let Ok(exp_hours) = env::var("MOODMAP_SERVER_JWT_EXPIRATION_HOURS") {
            config.jwt_expiration_hours = exp_hours.parse()?;
        }

        if let Some(allow_signup) = cli_args.allow_signup {
            config.allow_signup = allow_signup;
        } else if let Ok(allow_signup) = env::var("MOODMAP_SERVER_ALLOW_SIGNUP") {
            config.allow_signup = allow_signup.parse().unwrap_or(true);
        }

        if let Some(max_size) = cli_args.max_upload_bytes {
            config.max_upload_bytes = max_size;
        } else if let Ok(max_size) = env::var("MOODMAP_SERVER_MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = max_size.parse()?;
        }

        if let Some(config_path) = cli_args.config_file {
            config.config_file_path = Some(config_path);
        } else if let Ok(config_path) = env::var("MOODMAP_SERVER_CONFIG_FILE") {
            config.config_file_path = Some(PathBuf::from(config_path));
        }

        Ok(config)
    }

    /// Generate a random 64 character JWT secret
    pub fn generate_jwt_secret() -> String {
        use rand::Rng;
        use rand::distr::Alphanumeric;
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(64)
            .map(char::from)
            .collect()
    }

    /// Socket address string to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliArgs;

    #[test]
    fn cli_arguments_win_and_secret_is_generated() {
        let args = CliArgs {
            port: Some(9100),
            jwt_secret: None,
            allow_signup: Some(false),
            ..CliArgs::default()
        };
        // SAFETY: no other test in this crate touches these variables
        unsafe {
            env::remove_var("MOODMAP_SERVER_JWT_SECRET");
            env::set_var("MOODMAP_SERVER_PORT", "7000");
        }

        let config = ServerConfig::from_cli_and_env(args).unwrap();
        unsafe {
            env::remove_var("MOODMAP_SERVER_PORT");
        }

        assert_eq!(config.port, 9100);
        assert!(!config.allow_signup);
        assert_eq!(config.jwt_secret.len(), 64);
        assert!(config.jwt_secret.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(config.bind_address(), "0.0.0.0:9100");
    }
}
