// Canonical encoding shared by hashing, signing and chain validation

use serde_json::{Map, Value};
use crate::core::sha256_hex;

/// Rebuild a JSON value so every object lists its keys in lexicographic order.
///
/// The order is enforced here rather than relying on the map type backing
/// `serde_json::Map`, which changes when the `preserve_order` feature is on.
pub fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));

            let mut sorted = Map::new();
            for (key, inner) in entries {
                sorted.insert(key, sort_keys(inner));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Key-sorted, compact textual encoding of a JSON value
pub fn canonical_string(value: &Value) -> String {
    sort_keys(value.clone()).to_string()
}

/// SHA256 hex digest of the canonical encoding.
///
/// Genesis linkage, the proof-of-work challenge and chain validation all go
/// through this function.
pub fn hash_value(value: &Value) -> String {
    sha256_hex(canonical_string(value).as_bytes())
}

/// Hash of the empty structure, used as the genesis block's previous hash
pub fn empty_hash() -> String {
    hash_value(&Value::Object(Map::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_string_sorts_nested_keys() {
        let value = json!({"b": 1, "a": {"z": true, "y": [ {"d": 1, "c": 2} ]}});
        assert_eq!(
            canonical_string(&value),
            r#"{"a":{"y":[{"c":2,"d":1}],"z":true},"b":1}"#
        );
    }

    #[test]
    fn test_hash_ignores_key_order() {
        let first: Value = serde_json::from_str(
            r#"{"nonce": 7, "previous_hash": "ab", "transactions": [], "timestamp": 1.5}"#,
        ).unwrap();
        let second: Value = serde_json::from_str(
            r#"{"timestamp": 1.5, "transactions": [], "previous_hash": "ab", "nonce": 7}"#,
        ).unwrap();

        assert_eq!(hash_value(&first), hash_value(&second));
    }

    #[test]
    fn test_hash_changes_with_content() {
        let a = json!({"nonce": 1});
        let b = json!({"nonce": 2});
        assert_ne!(hash_value(&a), hash_value(&b));
    }

    #[test]
    fn test_empty_hash() {
        // sha256("{}")
        assert_eq!(
            empty_hash(),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }
}
