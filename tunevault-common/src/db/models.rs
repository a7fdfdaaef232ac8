//! Catalog document decoding helpers

use serde_json::Value;

/// Decode the stored `genre_tags` field of a song document.
///
/// The field has accumulated several shapes over the life of the catalog:
/// a JSON array of tags, a bare JSON string (treated as a single tag), or
/// content that is not valid JSON at all. Anything unrecognized decodes to
/// an empty tag list rather than an error.
pub fn parse_genre_tags(raw: &str) -> Vec<Value> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items,
        Ok(Value::String(tag)) => vec![Value::String(tag)],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_of_tags() {
        let tags = parse_genre_tags(r#"["rock", "pop"]"#);
        assert_eq!(tags, vec![json!("rock"), json!("pop")]);
    }

    #[test]
    fn test_bare_string_is_single_tag() {
        let tags = parse_genre_tags(r#""jazz""#);
        assert_eq!(tags, vec![json!("jazz")]);
    }

    #[test]
    fn test_array_keeps_malformed_entries() {
        // Non-string entries survive decoding; consumers discard them
        let tags = parse_genre_tags(r#"[42, null, "rock"]"#);
        assert_eq!(tags, vec![json!(42), json!(null), json!("rock")]);
    }

    #[test]
    fn test_unrecognized_shapes_decode_empty() {
        assert!(parse_genre_tags("").is_empty());
        assert!(parse_genre_tags("not json").is_empty());
        assert!(parse_genre_tags(r#"{"nested": "object"}"#).is_empty());
        assert!(parse_genre_tags("17").is_empty());
    }
}
