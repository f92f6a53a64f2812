//! Clients for the external services behind the recommendation features.
//!
//! Both services sit behind traits so the pipeline can run against the
//! deterministic fakes in [`testing`].

pub mod llm;
pub mod places;
pub mod testing;

pub use llm::{CompletionOptions, LlmClient, OpenAiClient};
pub use places::{GooglePlacesClient, PlaceCandidate, PlaceDetails, PlacesClient, TextSearch};

/// Errors from an external provider
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    /// No API key is configured for the provider
    #[error("{0} provider is not configured")]
    NotConfigured(&'static str),

    /// Transport failure
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The provider answered with an error status
    #[error("{api} returned {status}: {message}")]
    Status {
        api: String,
        status: String,
        message: String,
    },

    /// The response body could not be decoded
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The provider answered without usable content
    #[error("Empty response from {0}")]
    Empty(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProviderError::Decode(err.to_string())
        } else {
            ProviderError::Http(err.to_string())
        }
    }
}
