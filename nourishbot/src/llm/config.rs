//! Completion endpoint configuration.

use std::fmt;

/// Configuration for the completion endpoint client.
///
/// Read once at startup and read-only thereafter; every field has a
/// documented default overridable via an environment variable:
///
/// | Variable              | Default                                    |
/// |-----------------------|--------------------------------------------|
/// | `OPENAI_API_BASE`     | `http://localhost:8000/v1`                 |
/// | `OPENAI_API_KEY`      | `not-needed-for-local`                     |
/// | `OPENAI_VISION_MODEL` | `meta-llama/Llama-3.2-90B-Vision-Instruct` |
/// | `OPENAI_TEXT_MODEL`   | `qwen2.5-7b-instruct`                      |
#[derive(Clone)]
pub struct LlmConfig {
    /// API key for bearer-token authentication.
    pub api_key: String,
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,
    /// Model used by vision stages (extraction, nutrition analysis).
    pub vision_model: String,
    /// Model used by text stages (dietary filtering, recipe suggestion).
    pub text_model: String,
    /// Completion request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl LlmConfig {
    /// Default API base URL (local inference server).
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8000/v1";
    /// Default API key accepted by local servers that skip auth.
    pub const DEFAULT_API_KEY: &'static str = "not-needed-for-local";
    /// Default vision-capable model.
    pub const DEFAULT_VISION_MODEL: &'static str = "meta-llama/Llama-3.2-90B-Vision-Instruct";
    /// Default text model.
    pub const DEFAULT_TEXT_MODEL: &'static str = "qwen2.5-7b-instruct";
    /// Default completion timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    /// Creates a new configuration with the given API key and defaults
    /// for everything else.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Creates configuration from environment variables.
    ///
    /// Every variable has a default, so this never fails.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY")
                .unwrap_or_else(|_| Self::DEFAULT_API_KEY.to_owned()),
            base_url: std::env::var("OPENAI_API_BASE")
                .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_owned()),
            vision_model: std::env::var("OPENAI_VISION_MODEL")
                .unwrap_or_else(|_| Self::DEFAULT_VISION_MODEL.to_owned()),
            text_model: std::env::var("OPENAI_TEXT_MODEL")
                .unwrap_or_else(|_| Self::DEFAULT_TEXT_MODEL.to_owned()),
            timeout_secs: Some(Self::DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the vision model.
    #[must_use]
    pub fn with_vision_model(mut self, model: impl Into<String>) -> Self {
        self.vision_model = model.into();
        self
    }

    /// Sets the text model.
    #[must_use]
    pub fn with_text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = model.into();
        self
    }

    /// Sets the completion request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: Self::DEFAULT_API_KEY.to_owned(),
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            vision_model: Self::DEFAULT_VISION_MODEL.to_owned(),
            text_model: Self::DEFAULT_TEXT_MODEL.to_owned(),
            timeout_secs: Some(Self::DEFAULT_TIMEOUT_SECS),
        }
    }
}

// Manual impl so the API key never lands in logs.
impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("vision_model", &self.vision_model)
            .field("text_model", &self.text_model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = LlmConfig::default();
        assert_eq!(config.base_url, LlmConfig::DEFAULT_BASE_URL);
        assert_eq!(config.api_key, LlmConfig::DEFAULT_API_KEY);
        assert_eq!(config.vision_model, LlmConfig::DEFAULT_VISION_MODEL);
        assert_eq!(config.text_model, LlmConfig::DEFAULT_TEXT_MODEL);
        assert_eq!(config.timeout_secs, Some(120));
    }

    #[test]
    fn test_config_builder() {
        let config = LlmConfig::new("sk-test")
            .with_base_url("http://127.0.0.1:9000/v1")
            .with_text_model("llama3")
            .with_timeout(60);

        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.base_url, "http://127.0.0.1:9000/v1");
        assert_eq!(config.text_model, "llama3");
        assert_eq!(config.timeout_secs, Some(60));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = LlmConfig::new("sk-very-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
