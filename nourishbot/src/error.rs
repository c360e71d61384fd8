//! Unified error types for the nourishbot pipeline.
//!
//! This module provides the error hierarchy covering:
//! - LLM endpoint errors (authentication, network, malformed responses)
//! - Image resolution errors (missing local files)
//! - Final-output schema validation errors

use std::path::PathBuf;

pub use crate::llm::error::LlmError;
pub use crate::prompts::TemplateLoadError;

/// Result type alias for nourishbot operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the nourishbot pipeline.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// LLM endpoint error.
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// A local image path does not exist.
    ///
    /// Raised before any network call is attempted.
    #[error("no file found at path: {}", path.display())]
    ImageNotFound {
        /// The offending path.
        path: PathBuf,
    },

    /// The final stage's output does not conform to the recipe schema.
    #[error("recipe output failed schema validation: {detail}")]
    SchemaValidation {
        /// What the decode step rejected.
        detail: String,
    },

    /// Prompt template loading error.
    #[error("template error: {0}")]
    Template(#[from] TemplateLoadError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an image-not-found error.
    #[must_use]
    pub fn image_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ImageNotFound { path: path.into() }
    }

    /// Create a schema validation error.
    #[must_use]
    pub fn schema_validation(detail: impl Into<String>) -> Self {
        Self::SchemaValidation {
            detail: detail.into(),
        }
    }
}
