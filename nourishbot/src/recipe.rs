//! Recipe data model and the final-output decode step.
//!
//! [`RecipeSuggestionOutput`] is the contract the final LLM call must
//! satisfy: the same type drives the endpoint's `response_format` JSON
//! schema (via [`schemars::JsonSchema`]) and the local validation of the
//! returned text.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// A single suggested recipe. Immutable once decoded.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Recipe {
    /// Recipe title.
    pub title: String,
    /// Ordered ingredient list.
    pub ingredients: Vec<String>,
    /// Preparation instructions.
    pub instructions: String,
    /// Estimated calories per serving, in kcal.
    pub calorie_estimate: f64,
}

/// The final pipeline stage's output contract. Validated, not computed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct RecipeSuggestionOutput {
    /// Suggested recipes, in the order the model produced them.
    pub recipes: Vec<Recipe>,
}

impl RecipeSuggestionOutput {
    /// Decode and validate the final stage's completion text.
    ///
    /// This is the one strict decode step: the text must be a JSON
    /// object with a `recipes` field matching the schema.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaValidation`] if the text is not valid JSON
    /// or does not conform to the recipe schema.
    pub fn from_completion(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::schema_validation(e.to_string()))
    }

    /// Tolerant decode of an already-parsed JSON value.
    ///
    /// The canonical contract is the direct `{"recipes": [...]}` object.
    /// Two legacy shapes are accepted as migration shims: a JSON-encoded
    /// string of that object, and a nested per-task result under
    /// `recipe_suggestion_task.json_dict`. Anything else yields `None`.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(map) => {
                if map.contains_key("recipes") {
                    return serde_json::from_value(value.clone()).ok();
                }
                // Migration shim: nested per-task output.
                map.get("recipe_suggestion_task")
                    .and_then(|task| task.get("json_dict"))
                    .and_then(|inner| serde_json::from_value(inner.clone()).ok())
            }
            // Migration shim: JSON-encoded string. A decode failure falls
            // through to None rather than erroring.
            Value::String(text) => serde_json::from_str::<Value>(text)
                .ok()
                .as_ref()
                .and_then(Self::from_value),
            _ => None,
        }
    }

    /// Whether the output carries no recipes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
