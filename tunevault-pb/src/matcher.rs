//! Fuzzy genre matching
//!
//! Classification is case-insensitive substring containment: a song tagged
//! "hiphop/urban" belongs in both the "hiphop" and "urban" buckets. The
//! containment rule is deliberate; exact or tokenized matching would drop
//! compound tags like these.

use serde_json::Value;

/// Normalize a genre name or tag for comparison: trim and lower-case
pub fn normalize_genre(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Extract the usable tag strings from a song's raw genre tag values
///
/// Non-string entries are malformed catalog data, not an error; they are
/// discarded and can never match any genre.
pub fn normalized_tags(tags: &[Value]) -> Vec<String> {
    tags.iter()
        .filter_map(|tag| tag.as_str())
        .map(normalize_genre)
        .collect()
}

/// True when any tag contains the candidate genre as a substring
///
/// `candidate` must already be normalized. Stops at the first matching tag;
/// membership is boolean, so later tags cannot change the outcome.
pub fn matches(tags: &[String], candidate: &str) -> bool {
    tags.iter().any(|tag| tag.contains(candidate))
}
