//! Tokenization and query classification

use once_cell::sync::Lazy;
use regex::Regex;

/// Canonical 8-4-4-4-12 hex-with-dashes identifier, case-insensitive.
static IDENTIFIER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("identifier pattern is valid")
});

/// Lowercase the input and split on maximal runs of characters outside
/// `[a-z0-9]`, dropping empty tokens. Pure and deterministic.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether the trimmed query should take the exact-match path instead of
/// tokenized scoring.
pub fn is_identifier_query(query: &str) -> bool {
    IDENTIFIER_RE.is_match(query.trim())
}
