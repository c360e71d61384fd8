//! Completion endpoint client and configuration.
//!
//! Any server implementing the OpenAI Chat Completions API works here,
//! local (vLLM, llama.cpp, Ollama's compat layer) or hosted.

mod client;
mod config;
pub mod error;
mod types;

pub use client::OpenAi;
pub use config::LlmConfig;
pub use error::LlmError;
