//! OpenAI-compatible endpoint client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::chat::{ChatProvider, ChatRequest, ChatResponse};
use crate::error::{LlmError, Result};
use crate::message::Message;

use super::config::LlmConfig;
use super::types::{ApiErrorResponse, ChatCompletionResponse};

/// Client for an OpenAI-compatible chat completion endpoint.
///
/// One instance is shared across all pipeline stages; the configuration
/// is read-only after construction.
#[derive(Debug, Clone)]
pub struct OpenAi {
    pub(crate) config: Arc<LlmConfig>,
    pub(crate) client: Client,
}

impl OpenAi {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: LlmConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        let client = builder
            .build()
            .map_err(|e| LlmError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    /// Create a client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn from_env() -> Result<Self> {
        Self::new(LlmConfig::from_env())
    }

    /// Get the endpoint configuration.
    #[must_use]
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Build the chat completions URL.
    pub(crate) fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Build a bearer-authenticated JSON POST.
    pub(crate) fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
    }

    /// Map a non-2xx response body to an [`LlmError`].
    pub(crate) fn parse_error(status: u16, body: &str) -> LlmError {
        if let Ok(error_response) = serde_json::from_str::<ApiErrorResponse>(body) {
            let error = error_response.error;
            let code = error.code.or(error.error_type);

            return match status {
                401 => LlmError::auth("openai", error.message),
                429 => LlmError::rate_limited("openai"),
                _ => match code {
                    Some(code) => LlmError::provider_code("openai", code, error.message),
                    None => LlmError::provider("openai", error.message),
                },
            };
        }

        LlmError::http_status(status, body.to_owned())
    }

    /// Parse the endpoint response into a [`ChatResponse`].
    pub(crate) fn parse_response(response: ChatCompletionResponse) -> Result<ChatResponse> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::response_format("at least one choice", "empty choices"))?;

        let content = choice.message.content.unwrap_or_default();

        Ok(ChatResponse {
            message: Message::assistant(content),
            usage: response.usage,
            model: response.model,
            id: response.id,
        })
    }
}

#[async_trait]
impl ChatProvider for OpenAi {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let url = self.chat_url();

        let response = self
            .build_request(&url)
            .json(request)
            .send()
            .await
            .map_err(LlmError::from)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Self::parse_error(status.as_u16(), &error_text).into());
        }

        let response_text = response.text().await.map_err(LlmError::from)?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&response_text).map_err(|e| {
            LlmError::response_format(
                "valid chat completion response",
                format!("parse error: {e}, response: {response_text}"),
            )
        })?;

        Self::parse_response(parsed)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
