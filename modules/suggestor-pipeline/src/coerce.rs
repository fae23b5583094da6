//! Lenient readers for scraper output. Actor schemas are loose: counts show up
//! as numbers, numeric strings, or junk, and lists come as lists or as text.

use serde_json::{Map, Value};

/// A raw scraper record.
pub type RawRecord = Map<String, Value>;

/// Integers pass through, floats truncate toward zero, all-digit strings
/// parse. Anything else is 0.
pub fn safe_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|u| i64::try_from(u).unwrap_or(i64::MAX)))
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            s.parse().unwrap_or(0)
        }
        _ => 0,
    }
}

/// A counter read through [`safe_int`]; missing and negative values are 0.
pub fn count(value: Option<&Value>) -> u64 {
    value.map(safe_int).unwrap_or(0).max(0) as u64
}

/// A field's string value, when it is a non-empty string.
pub fn text(record: &RawRecord, key: &str) -> Option<String> {
    match record.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// The first of `keys` holding a non-empty string.
pub fn first_text(record: &RawRecord, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| text(record, key))
}

/// A nested object, or an empty one when the field is missing or not an object.
pub fn object<'a>(record: &'a RawRecord, key: &str) -> &'a RawRecord {
    static EMPTY: std::sync::LazyLock<RawRecord> = std::sync::LazyLock::new(RawRecord::new);
    match record.get(key) {
        Some(Value::Object(map)) => map,
        _ => &*EMPTY,
    }
}

/// Python-style truthiness, used where the source only checks presence.
pub fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
    }
}

/// URLs from a list of strings or of `{url: ...}` objects.
pub fn url_list(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Object(map) => text(map, "url"),
            _ => None,
        })
        .collect()
}

/// Hashtags from a list (strings or `{name: ...}` objects) or from free text.
/// Leading `#` is stripped and duplicates removed, first occurrence wins.
pub fn hashtags(value: Option<&Value>) -> Vec<String> {
    let raw: Vec<String> = match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Object(map) => first_text(map, &["name", "text"]),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) => return scan_hashtags(s),
        _ => Vec::new(),
    };
    dedup_tags(raw.iter().map(|t| t.trim_start_matches('#')))
}

/// Whitespace-separated words starting with `#`.
pub fn scan_hashtags(text: &str) -> Vec<String> {
    dedup_tags(
        text.split_whitespace()
            .filter(|word| word.starts_with('#'))
            .map(|word| word.trim_start_matches('#')),
    )
}

fn dedup_tags<'a>(tags: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn safe_int_accepts_ints_floats_and_digit_strings() {
        assert_eq!(safe_int(&json!(42)), 42);
        assert_eq!(safe_int(&json!(3.9)), 3);
        assert_eq!(safe_int(&json!(-2.5)), -2);
        assert_eq!(safe_int(&json!("1200")), 1200);
    }

    #[test]
    fn safe_int_rejects_everything_else() {
        assert_eq!(safe_int(&json!("1.2K")), 0);
        assert_eq!(safe_int(&json!("-5")), 0);
        assert_eq!(safe_int(&json!("")), 0);
        assert_eq!(safe_int(&json!(null)), 0);
        assert_eq!(safe_int(&json!(true)), 0);
        assert_eq!(safe_int(&json!([1])), 0);
        assert_eq!(safe_int(&json!("99999999999999999999999")), 0);
    }

    #[test]
    fn count_clamps_negative_to_zero() {
        assert_eq!(count(Some(&json!(-7))), 0);
        assert_eq!(count(None), 0);
        assert_eq!(count(Some(&json!("15"))), 15);
    }

    #[test]
    fn url_list_unwraps_objects() {
        let value = json!([{"url": "https://a/1.jpg"}, "https://a/2.jpg", {"width": 3}, ""]);
        assert_eq!(url_list(Some(&value)), vec!["https://a/1.jpg", "https://a/2.jpg"]);
        assert!(url_list(Some(&json!("https://a/3.jpg"))).is_empty());
    }

    #[test]
    fn hashtags_from_lists_objects_and_text() {
        assert_eq!(hashtags(Some(&json!(["#rust", "tokio", "#rust"]))), vec!["rust", "tokio"]);
        assert_eq!(hashtags(Some(&json!([{"name": "fyp"}, {"id": 1}]))), vec!["fyp"]);
        assert_eq!(hashtags(Some(&json!("new drop #style #ootd"))), vec!["style", "ootd"]);
        assert!(hashtags(None).is_empty());
    }

    #[test]
    fn scan_ignores_bare_hash_and_mid_word_hash() {
        assert_eq!(scan_hashtags("# a#b #ok"), vec!["ok"]);
    }

    #[test]
    fn truthiness_follows_presence_checks() {
        assert!(!truthy(Some(&json!(0))));
        assert!(!truthy(Some(&json!(""))));
        assert!(truthy(Some(&json!("PT1M"))));
        assert!(truthy(Some(&json!(12))));
    }
}
