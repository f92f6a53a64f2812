//! Chat-completion client for prompt-in, text-out LLM calls.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ProviderError;
use crate::config::LlmConfig;

/// Per-call overrides of the configured sampling settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CompletionOptions {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl CompletionOptions {
    pub fn new(max_tokens: u32, temperature: f32) -> Self {
        Self {
            max_tokens: Some(max_tokens),
            temperature: Some(temperature),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single user prompt and return the trimmed reply.
    async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, ProviderError>;
}

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl OpenAiClient {
    /// Build a client when an API key is configured.
    pub fn from_config(config: &LlmConfig) -> Result<Option<Self>, ProviderError> {
        let Some(api_key) = config.api_key.as_ref().filter(|k| !k.trim().is_empty()) else {
            return Ok(None);
        };

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Some(Self {
            http,
            api_key: api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }))
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, ProviderError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: options.max_tokens.unwrap_or(self.max_tokens),
            temperature: options.temperature.unwrap_or(self.temperature),
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown".to_string());
            return Err(ProviderError::Status {
                api: "chat completions".to_string(),
                status: status.to_string(),
                message,
            });
        }

        let body = response.text().await?;
        parse_chat_response(&body)
    }
}

fn parse_chat_response(body: &str) -> Result<String, ProviderError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Decode(e.to_string()))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or_else(|| ProviderError::Empty("chat completions".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_is_trimmed() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": "  정겨움, 편안함\n"}}]}"#;
        assert_eq!(parse_chat_response(body).unwrap(), "정겨움, 편안함");
    }

    #[test]
    fn empty_reply_is_an_error() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": "   "}}]}"#;
        assert!(matches!(parse_chat_response(body), Err(ProviderError::Empty(_))));

        let body = r#"{"choices": []}"#;
        assert!(matches!(parse_chat_response(body), Err(ProviderError::Empty(_))));
    }

    #[test]
    fn client_requires_api_key() {
        assert!(OpenAiClient::from_config(&LlmConfig::default()).unwrap().is_none());

        let config = LlmConfig {
            api_key: Some("sk-test".to_string()),
            ..LlmConfig::default()
        };
        let client = OpenAiClient::from_config(&config).unwrap().unwrap();
        assert_eq!(client.model(), "gpt-4o-mini");
    }

    #[tokio::test]
    async fn mock_client_answers() {
        let mut mock = MockLlmClient::new();
        mock.expect_complete()
            .returning(|prompt, _| Ok(format!("echo: {}", prompt.len())));

        let reply = mock
            .complete("abc", &CompletionOptions::default())
            .await
            .unwrap();
        assert_eq!(reply, "echo: 3");
    }
}
