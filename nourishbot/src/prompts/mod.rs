//! Prompt template structures and loading logic.
//!
//! Prompt text is data, not code: each stage has a system and a user
//! template with named `{placeholder}` fields, loaded from YAML once at
//! startup and passed explicitly into the pipeline. Built-in defaults
//! are embedded in the crate.
//!
//! # YAML Format
//!
//! ```yaml
//! dietary_filtering:
//!   system: |-
//!     You are a dietary expert...
//!   user: |-
//!     Ingredients: {ingredients}
//!     Dietary restriction: {dietary_restrictions}
//! ```

use serde::{Deserialize, Serialize};

/// Built-in default templates, embedded at compile time.
const DEFAULT_YAML: &str = include_str!("default.yaml");

/// System + user template pair for one pipeline stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StagePrompt {
    /// System instructions; may be empty, in which case no system
    /// message is sent.
    #[serde(default)]
    pub system: String,

    /// User template with named `{placeholder}` fields.
    #[serde(default)]
    pub user: String,
}

impl StagePrompt {
    /// Create a stage prompt from system and user text.
    #[must_use]
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    /// Render the user template, substituting each `{name}` placeholder.
    ///
    /// Unknown placeholders are left in place; substitution is literal
    /// with no escaping.
    #[must_use]
    pub fn render_user(&self, vars: &[(&str, &str)]) -> String {
        let mut rendered = self.user.clone();
        for (name, value) in vars {
            rendered = rendered.replace(&format!("{{{name}}}"), value);
        }
        rendered
    }
}

/// Complete set of prompt templates for the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptTemplates {
    /// Vision stage: extract a comma-separated ingredient list from an image.
    #[serde(default)]
    pub ingredient_extraction: StagePrompt,

    /// Text stage: adjust the ingredient list for a dietary restriction.
    #[serde(default)]
    pub dietary_filtering: StagePrompt,

    /// Text stage: suggest recipes as schema-constrained JSON.
    #[serde(default)]
    pub recipe_suggestion: StagePrompt,

    /// Standalone vision operation: structured nutrition report.
    #[serde(default)]
    pub nutrition_analysis: StagePrompt,
}

impl PromptTemplates {
    /// Load the built-in default templates.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_yaml(DEFAULT_YAML).expect("built-in default.yaml should be valid")
    }

    /// Load templates from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or doesn't match the
    /// expected schema.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Load templates from a YAML file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, TemplateLoadError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(Self::from_yaml(&content)?)
    }

    /// Override the ingredient extraction prompt.
    #[must_use]
    pub fn with_ingredient_extraction(mut self, prompt: StagePrompt) -> Self {
        self.ingredient_extraction = prompt;
        self
    }

    /// Override the dietary filtering prompt.
    #[must_use]
    pub fn with_dietary_filtering(mut self, prompt: StagePrompt) -> Self {
        self.dietary_filtering = prompt;
        self
    }

    /// Override the recipe suggestion prompt.
    #[must_use]
    pub fn with_recipe_suggestion(mut self, prompt: StagePrompt) -> Self {
        self.recipe_suggestion = prompt;
        self
    }

    /// Override the nutrition analysis prompt.
    #[must_use]
    pub fn with_nutrition_analysis(mut self, prompt: StagePrompt) -> Self {
        self.nutrition_analysis = prompt;
        self
    }

    /// Fill any empty fields from another template set.
    pub fn merge_defaults(&mut self, defaults: &Self) {
        for (mine, theirs) in [
            (&mut self.ingredient_extraction, &defaults.ingredient_extraction),
            (&mut self.dietary_filtering, &defaults.dietary_filtering),
            (&mut self.recipe_suggestion, &defaults.recipe_suggestion),
            (&mut self.nutrition_analysis, &defaults.nutrition_analysis),
        ] {
            if mine.system.is_empty() {
                mine.system.clone_from(&theirs.system);
            }
            if mine.user.is_empty() {
                mine.user.clone_from(&theirs.user);
            }
        }
    }
}

/// Error type for template loading operations.
#[derive(Debug, thiserror::Error)]
pub enum TemplateLoadError {
    /// IO error reading the template file.
    #[error("Failed to read template file: {0}")]
    Io(#[from] std::io::Error),
    /// YAML parsing error.
    #[error("Failed to parse template YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_builtin_templates_complete() {
        let templates = PromptTemplates::builtin();
        assert!(templates.ingredient_extraction.user.contains("comma-separated"));
        assert!(templates.dietary_filtering.user.contains("{ingredients}"));
        assert!(templates.recipe_suggestion.user.contains("{filtered_ingredients}"));
        assert!(templates.nutrition_analysis.user.contains("Nutrient Breakdown"));
        assert!(templates.nutrition_analysis.user.contains("Disclaimer"));
    }

    #[test]
    fn test_render_user_substitutes_placeholders() {
        let prompt = StagePrompt::new("", "Ingredients: {ingredients}; diet: {dietary_restrictions}");
        let rendered = prompt.render_user(&[
            ("ingredients", "egg, milk"),
            ("dietary_restrictions", "vegan"),
        ]);
        assert_eq!(rendered, "Ingredients: egg, milk; diet: vegan");
    }

    #[test]
    fn test_render_user_leaves_unknown_placeholders() {
        let prompt = StagePrompt::new("", "{known} and {unknown}");
        assert_eq!(prompt.render_user(&[("known", "x")]), "x and {unknown}");
    }

    #[test]
    fn test_from_file_and_merge_defaults() {
        let file = assert_fs::NamedTempFile::new("prompts.yaml").unwrap();
        file.write_str("dietary_filtering:\n  user: 'custom: {ingredients}'\n")
            .unwrap();

        let mut templates = PromptTemplates::from_file(file.path()).unwrap();
        assert!(templates.ingredient_extraction.user.is_empty());

        templates.merge_defaults(&PromptTemplates::builtin());
        assert_eq!(templates.dietary_filtering.user, "custom: {ingredients}");
        assert!(!templates.ingredient_extraction.user.is_empty());
    }

    #[test]
    fn test_from_file_missing_path() {
        let err = PromptTemplates::from_file("/no/such/prompts.yaml").unwrap_err();
        assert!(matches!(err, TemplateLoadError::Io(_)));
    }
}
