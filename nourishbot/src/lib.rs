//! NourishBot - fridge-photo to recipe-suggestion pipeline
//!
//! This crate turns a photo of food or fridge contents, plus an optional
//! dietary restriction, into AI-generated recipe suggestions with
//! ingredient lists, instructions and calorie estimates. It drives a
//! fixed sequential chain of completion calls against any
//! OpenAI-compatible endpoint, local or hosted.

pub mod chat;
pub mod error;
pub mod format;
pub mod image;
pub mod ingredients;
pub mod llm;
pub mod message;
pub mod pipeline;
pub mod prelude;
pub mod prompts;
pub mod recipe;
pub mod usage;

pub use error::{Error, LlmError, Result};
