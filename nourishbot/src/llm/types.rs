//! Wire types for the OpenAI-compatible Chat Completions API.
//!
//! These are internal types used for deserialization of endpoint
//! responses. The request side serializes [`ChatRequest`](crate::chat::ChatRequest)
//! directly, whose serde shape already matches the API.

use serde::Deserialize;

use crate::usage::Usage;

/// Chat completion response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    /// Completion ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Model that produced the completion.
    #[serde(default)]
    pub model: Option<String>,
    /// Completion choices; the pipeline uses the first.
    pub choices: Vec<ChatChoice>,
    /// Token usage, if reported.
    #[serde(default)]
    pub usage: Option<Usage>,
}

/// One completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    /// The generated message.
    pub message: ChoiceMessage,
}

/// The message inside a completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    /// The text content, if any.
    #[serde(default)]
    pub content: Option<String>,
}

/// Error response body from the endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// The error details.
    pub error: ApiError,
}

/// Error details from the endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    /// Error description.
    pub message: String,
    /// Error type string.
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    /// Optional error code.
    #[serde(default)]
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_parse_completion_response() {
        let body = r#"{
            "id": "cmpl-1",
            "model": "qwen2.5-7b-instruct",
            "choices": [{"message": {"role": "assistant", "content": "tomato, eggs"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 4, "total_tokens": 16}
        }"#;

        let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices.len(), 1);
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("tomato, eggs"));
        assert_eq!(parsed.usage.unwrap().total_tokens, 16);
    }

    #[test]
    fn test_parse_error_response() {
        let body = r#"{"error": {"message": "model not found", "type": "invalid_request_error", "code": "model_not_found"}}"#;
        let parsed: ApiErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.code.as_deref(), Some("model_not_found"));
    }
}
