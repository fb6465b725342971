//! Bracket-style parameter encoding
//!
//! `{"attributes": {"name": "Ann", "tags": ["a", "b"]}}` encodes as
//! `attributes[name]=Ann`, `attributes[tags][]=a`, `attributes[tags][]=b`.
//! Nulls encode as empty strings; empty arrays and objects encode as nothing.

use serde_json::{Map, Value};

/// Flatten a parameter map into ordered key/value pairs
pub fn encode_params(params: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in params {
        encode_value(key.clone(), value, &mut pairs);
    }
    pairs
}

fn encode_value(prefix: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                encode_value(format!("{}[{}]", prefix, key), nested, pairs);
            }
        }
        Value::Array(items) => {
            for item in items {
                encode_value(format!("{}[]", prefix), item, pairs);
            }
        }
        Value::Null => pairs.push((prefix, String::new())),
        Value::String(s) => pairs.push((prefix, s.clone())),
        Value::Bool(b) => pairs.push((prefix, b.to_string())),
        Value::Number(n) => pairs.push((prefix, n.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encode(value: Value) -> Vec<(String, String)> {
        match value {
            Value::Object(map) => encode_params(&map),
            _ => panic!("expected object"),
        }
    }

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn test_nested_attributes() {
        let pairs = encode(json!({"attributes": {"name": "Ann", "age": 31, "admin": false}}));
        assert_eq!(
            pairs,
            vec![
                pair("attributes[name]", "Ann"),
                pair("attributes[age]", "31"),
                pair("attributes[admin]", "false"),
            ]
        );
    }

    #[test]
    fn test_arrays_and_nulls() {
        let pairs = encode(json!({"attributes": {"tags": ["a", "b"], "bio": null}}));
        assert_eq!(
            pairs,
            vec![
                pair("attributes[tags][]", "a"),
                pair("attributes[tags][]", "b"),
                pair("attributes[bio]", ""),
            ]
        );
    }

    #[test]
    fn test_top_level_scalars() {
        let pairs = encode(json!({"id": 42, "sql": "SELECT 1"}));
        assert_eq!(pairs, vec![pair("id", "42"), pair("sql", "SELECT 1")]);
    }

    #[test]
    fn test_empty_containers_encode_nothing() {
        assert!(encode(json!({"attributes": {}})).is_empty());
        assert!(encode(json!({"tags": []})).is_empty());
    }
}
