//! Key Normalization Module
//!
//! Turns any serializable key into the canonical string the store is keyed by.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;

// == Normalize Key ==
/// Produces the canonical string form of `key`.
///
/// String keys are used verbatim. Any other value is serialized to JSON with
/// object fields sorted by name at every depth, so two keys holding the same
/// fields and values normalize identically whatever order the fields were
/// built in. Sequences keep their order.
///
/// A string key and a structured key whose canonical JSON equals that string
/// share a slot.
///
/// # Errors
/// Returns `CacheError::Normalization` when the key cannot be represented as
/// JSON, e.g. a map whose keys are not strings or numbers.
pub fn normalize_key<K: Serialize + ?Sized>(key: &K) -> Result<String> {
    match serde_json::to_value(key)? {
        Value::String(s) => Ok(s),
        other => Ok(serde_json::to_string(&canonicalize(other))?),
    }
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut fields: Vec<(String, Value)> = map.into_iter().collect();
            fields.sort_by(|a, b| a.0.cmp(&b.0));

            // Insert in sorted order so the result holds even with `preserve_order`
            let mut sorted = Map::with_capacity(fields.len());
            for (name, field) in fields {
                sorted.insert(name, canonicalize(field));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        scalar => scalar,
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use serde_json::json;
    use std::collections::HashMap;

    #[derive(Serialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Serialize)]
    struct PointReversed {
        y: i32,
        x: i32,
    }

    #[test]
    fn test_string_key_verbatim() {
        assert_eq!(normalize_key("plain key").unwrap(), "plain key");
        assert_eq!(normalize_key(&"owned".to_string()).unwrap(), "owned");
    }

    #[test]
    fn test_field_order_irrelevant() {
        let a = normalize_key(&Point { x: 1, y: 2 }).unwrap();
        let b = normalize_key(&PointReversed { y: 2, x: 1 }).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, r#"{"x":1,"y":2}"#);
    }

    #[test]
    fn test_nested_objects_sorted() {
        let a = normalize_key(&json!({"outer": {"b": 2, "a": 1}, "list": [{"d": 4, "c": 3}]}))
            .unwrap();
        assert_eq!(a, r#"{"list":[{"c":3,"d":4}],"outer":{"a":1,"b":2}}"#);
    }

    #[test]
    fn test_hashmap_keys_deterministic() {
        let mut first = HashMap::new();
        let mut second = HashMap::new();
        for i in 0..20 {
            first.insert(format!("k{}", i), i);
        }
        for i in (0..20).rev() {
            second.insert(format!("k{}", i), i);
        }
        assert_eq!(normalize_key(&first).unwrap(), normalize_key(&second).unwrap());
    }

    #[test]
    fn test_sequence_order_significant() {
        let a = normalize_key(&vec![1, 2, 3]).unwrap();
        let b = normalize_key(&vec![3, 2, 1]).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_different_values_differ() {
        let a = normalize_key(&json!({"a": 1, "b": 2})).unwrap();
        let b = normalize_key(&json!({"a": 1, "b": 3})).unwrap();
        let c = normalize_key(&json!({"a": 1})).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_string_and_object_may_collide() {
        let structured = normalize_key(&json!({"a": 1})).unwrap();
        let text = normalize_key(r#"{"a":1}"#).unwrap();
        assert_eq!(structured, text);
    }

    #[test]
    fn test_primitives() {
        assert_eq!(normalize_key(&42u32).unwrap(), "42");
        assert_eq!(normalize_key(&true).unwrap(), "true");
        assert_eq!(normalize_key(&Option::<u8>::None).unwrap(), "null");
    }

    #[test]
    fn test_unrepresentable_key_fails() {
        let mut map = HashMap::new();
        map.insert(vec![1u8, 2], "value");

        let result = normalize_key(&map);
        assert!(matches!(result, Err(CacheError::Normalization(_))));
    }
}
