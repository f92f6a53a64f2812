//! Error handling for the moodmap server

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use moodmap::{MoodmapError, blob::BlobError, providers::ProviderError, storage::StorageError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// API error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Server error types
#[derive(Debug, Error)]
pub enum ServerError {
    /// Moodmap library error
    #[error("{0}")]
    Moodmap(#[from] MoodmapError),

    /// Missing, invalid or revoked credentials
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Authenticated but not allowed
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found error
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Bad request error
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request body over the configured limit
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Moodmap(err) => moodmap_status(err),
            ServerError::Auth(_) => StatusCode::UNAUTHORIZED,
            ServerError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServerError::Validation(_) | ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            ServerError::Moodmap(err) => moodmap_error_type(err),
            ServerError::Auth(_) => "authentication_error",
            ServerError::Forbidden(_) => "forbidden",
            ServerError::Validation(_) => "validation_error",
            ServerError::NotFound(_) => "not_found",
            ServerError::BadRequest(_) => "bad_request",
            ServerError::PayloadTooLarge(_) => "payload_too_large",
            ServerError::Internal(_) => "internal_error",
        }
    }
}

fn moodmap_status(err: &MoodmapError) -> StatusCode {
    match err {
        MoodmapError::Validation(_) | MoodmapError::NoPlacesFound => StatusCode::BAD_REQUEST,
        MoodmapError::NotFound(_) => StatusCode::NOT_FOUND,
        MoodmapError::Forbidden(_) => StatusCode::FORBIDDEN,
        MoodmapError::Conflict(_) => StatusCode::CONFLICT,
        MoodmapError::Blob(BlobError::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
        MoodmapError::Blob(BlobError::UnsupportedType(_)) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        MoodmapError::Blob(BlobError::InvalidKey(_)) => StatusCode::BAD_REQUEST,
        MoodmapError::Provider(ProviderError::NotConfigured(_)) => StatusCode::SERVICE_UNAVAILABLE,
        MoodmapError::Provider(_) => StatusCode::BAD_GATEWAY,
        MoodmapError::Storage(StorageError::NotFound(_)) => StatusCode::NOT_FOUND,
        MoodmapError::Storage(StorageError::AlreadyExists(_))
        | MoodmapError::Storage(StorageError::Constraint(_)) => StatusCode::CONFLICT,
        MoodmapError::Storage(StorageError::Validation(_)) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn moodmap_error_type(err: &MoodmapError) -> &'static str {
    match err {
        MoodmapError::Validation(_) => "validation_error",
        MoodmapError::NoPlacesFound => "no_places_found",
        MoodmapError::NotFound(_) => "not_found",
        MoodmapError::Forbidden(_) => "forbidden",
        MoodmapError::Conflict(_) => "conflict",
        MoodmapError::Blob(BlobError::TooLarge { .. }) => "payload_too_large",
        MoodmapError::Blob(BlobError::UnsupportedType(_)) => "unsupported_media_type",
        MoodmapError::Blob(_) => "upload_error",
        MoodmapError::Provider(ProviderError::NotConfigured(_)) => "provider_not_configured",
        MoodmapError::Provider(_) => "upstream_error",
        MoodmapError::Storage(StorageError::NotFound(_)) => "not_found",
        MoodmapError::Storage(StorageError::AlreadyExists(_))
        | MoodmapError::Storage(StorageError::Constraint(_)) => "conflict",
        MoodmapError::Storage(_) => "database_error",
        _ => "internal_error",
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{}", self);
        } else {
            tracing::debug!(status = status.as_u16(), "{}", self);
        }

        let error_response = ErrorResponse {
            error: self.error_type().to_string(),
            message: self.to_string(),
            details: None,
        };

        (status, Json(error_response)).into_response()
    }
}

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;

/// Helper function to create a bad request error
pub fn bad_request(message: &str) -> ServerError {
    ServerError::BadRequest(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_errors_map_to_http_statuses() {
        let cases = [
            (MoodmapError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (MoodmapError::NotFound("memory 1".into()), StatusCode::NOT_FOUND),
            (MoodmapError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (MoodmapError::Conflict("x".into()), StatusCode::CONFLICT),
            (
                MoodmapError::Blob(BlobError::TooLarge { size: 10, limit: 5 }),
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (
                MoodmapError::Blob(BlobError::UnsupportedType("text/plain".into())),
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ),
            (
                MoodmapError::Provider(ProviderError::NotConfigured("llm")),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                MoodmapError::Provider(ProviderError::Http("timeout".into())),
                StatusCode::BAD_GATEWAY,
            ),
            (
                MoodmapError::Storage(StorageError::AlreadyExists("email".into())),
                StatusCode::CONFLICT,
            ),
            (MoodmapError::Other("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ServerError::from(err).status_code(), status);
        }
    }

    #[test]
    fn server_errors_have_stable_types() {
        assert_eq!(ServerError::Auth("x".into()).error_type(), "authentication_error");
        assert_eq!(
            ServerError::from(MoodmapError::NoPlacesFound).error_type(),
            "no_places_found"
        );
        assert_eq!(bad_request("x").status_code(), StatusCode::BAD_REQUEST);
    }
}
