//! Convenience re-exports for common usage.
//!
//! ```rust,ignore
//! use nourishbot::prelude::*;
//! ```

pub use crate::chat::{ChatProvider, ChatRequest, ChatResponse, ResponseFormat};
pub use crate::error::{Error, LlmError, Result};
pub use crate::format::{format_recipes, format_result};
pub use crate::image::ImageSource;
pub use crate::ingredients::filter_ingredients;
pub use crate::llm::{LlmConfig, OpenAi};
pub use crate::message::{ContentPart, Message, Role};
pub use crate::pipeline::{
    PipelineRequest, PipelineResult, RecipePipeline, RunReport, RunState, StageModels,
};
pub use crate::prompts::{PromptTemplates, StagePrompt};
pub use crate::recipe::{Recipe, RecipeSuggestionOutput};
pub use crate::usage::Usage;
