//! Markdown rendering of recipe suggestions.
//!
//! One section per recipe (title, ingredient table, instructions, calorie
//! estimate). An empty list renders a single human-readable message
//! rather than an empty document; this is also the user-visible shape of
//! every pipeline failure.

use std::fmt::Write as _;

use serde_json::Value;

use crate::recipe::RecipeSuggestionOutput;

/// The literal message rendered when no recipes are available.
pub const NO_RECIPES: &str = "No recipes could be generated.";

/// Render a validated recipe list as markdown.
#[must_use]
pub fn format_recipes(output: &RecipeSuggestionOutput) -> String {
    let mut out = String::from("## 🍽 Recipe Ideas\n\n");

    if output.recipes.is_empty() {
        out.push_str(NO_RECIPES);
        return out;
    }

    for (idx, recipe) in output.recipes.iter().enumerate() {
        let _ = writeln!(out, "### {}. {}\n", idx + 1, recipe.title);

        out.push_str("**Ingredients:**\n");
        out.push_str("| Ingredient |\n");
        out.push_str("|------------|\n");
        for ingredient in &recipe.ingredients {
            let _ = writeln!(out, "| {ingredient} |");
        }
        out.push('\n');

        let _ = writeln!(out, "**Instructions:**\n{}\n", recipe.instructions);
        let _ = writeln!(out, "**Calorie Estimate:** {} kcal\n", recipe.calorie_estimate);
        out.push_str("---\n\n");
    }

    out
}

/// Render an untyped upstream result as markdown.
///
/// Attempts the tolerant decode (direct object, JSON-encoded string, or
/// nested per-task shim); anything undecodable falls through to the
/// "no recipes" path rather than producing a malformed document.
#[must_use]
pub fn format_result(value: &Value) -> String {
    let output = RecipeSuggestionOutput::from_value(value).unwrap_or_default();
    format_recipes(&output)
}
