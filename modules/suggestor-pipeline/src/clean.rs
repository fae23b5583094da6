//! Recursive removal of empty values from JSON trees.
//!
//! An object entry is dropped when its cleaned value is null, `""`, the
//! literal string `"null"`, or an empty array or object. Array elements are
//! dropped only when null or `"null"`; empty strings and empty containers
//! stay in arrays. Cleaning is idempotent.

use serde_json::{Map, Value};

/// Clean a JSON value. A bare `"null"` string becomes `Value::Null`.
pub fn clean(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(clean_map(map)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(clean)
                .filter(|v| !is_null_like(v))
                .collect(),
        ),
        Value::String(s) if s == "null" => Value::Null,
        other => other,
    }
}

fn clean_map(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .filter_map(|(key, value)| {
            let cleaned = clean(value);
            (!is_blank(&cleaned)).then_some((key, cleaned))
        })
        .collect()
}

/// Clean a borrowed value, returning `None` when nothing meaningful is left.
pub fn cleaned(value: Option<&Value>) -> Option<Value> {
    let value = clean(value?.clone());
    (!is_blank(&value)).then_some(value)
}

fn is_null_like(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s == "null",
        _ => false,
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty() || s == "null",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn drops_blank_object_entries_recursively() {
        let input = json!({
            "a": 1,
            "b": null,
            "c": "",
            "d": "null",
            "e": [],
            "f": {},
            "g": {"h": null, "i": {"j": ""}},
            "k": false,
            "l": 0
        });
        assert_eq!(clean(input), json!({"a": 1, "k": false, "l": 0}));
    }

    #[test]
    fn lists_keep_empty_strings_but_lose_nulls() {
        let input = json!({"tags": ["a", null, "", "null", {}, []]});
        assert_eq!(clean(input), json!({"tags": ["a", "", {}, []]}));
    }

    #[test]
    fn bare_null_string_becomes_null() {
        assert_eq!(clean(json!("null")), Value::Null);
        assert_eq!(clean(json!("nullable")), json!("nullable"));
    }

    #[test]
    fn list_emptied_by_cleaning_is_removed_from_parent() {
        let input = json!({"media": [null, "null"], "keep": 1});
        assert_eq!(clean(input), json!({"keep": 1}));
    }

    #[test]
    fn cleaning_is_idempotent() {
        let input = json!({
            "x": [{"y": null}, {"z": [null]}, "null", ""],
            "w": {"v": {"u": []}},
            "t": "text"
        });
        let once = clean(input);
        let twice = clean(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once, json!({"x": [{}, {}, ""], "t": "text"}));
    }

    #[test]
    fn cleaned_reports_missing_for_blank_values() {
        assert_eq!(cleaned(None), None);
        assert_eq!(cleaned(Some(&json!(""))), None);
        assert_eq!(cleaned(Some(&json!({"a": null}))), None);
        assert_eq!(cleaned(Some(&json!(42))), Some(json!(42)));
    }
}
