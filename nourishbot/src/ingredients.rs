//! Local ingredient cleanup.

/// Clean a raw comma-separated ingredient string.
///
/// Trims and lower-cases every token, drops blank or whitespace-only
/// tokens, and preserves the original left-to-right order. No
/// deduplication. Pure function; empty input yields an empty list.
#[must_use]
pub fn filter_ingredients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}
