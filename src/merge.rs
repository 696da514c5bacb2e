//! Deep merge of associative structures
//!
//! ## Deep Merge Semantics
//!
//! - **Objects**: Recursively merge nested objects, preserving keys from both sides
//! - **Null overlay**: An overlay `null` is skipped and the base value is kept, at the
//!   top level and for colliding keys
//! - **Everything else**: Overlay value replaces base value (arrays are not concatenated)
//! - **New Keys**: Keys only in the overlay are inserted, `null` values included
//!
//! ## Example
//!
//! ```rust
//! use oneconfig::merge::deep_merge;
//! use serde_json::json;
//!
//! let defaults = json!({"db": {"host": "localhost", "pool": 10}});
//! let resolved = json!({"db": {"host": "db1.prod"}});
//!
//! let merged = deep_merge(defaults, resolved);
//! assert_eq!(merged, json!({"db": {"host": "db1.prod", "pool": 10}}));
//! ```

use serde_json::{Map, Value};

/// Deep merge two values; a non-null `overlay` takes precedence
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            Value::Object(deep_merge_maps(base_map, overlay_map))
        }
        (base_value, Value::Null) => base_value,
        (_, overlay_value) => overlay_value,
    }
}

/// Deep merge two string-keyed maps; `overlay` takes precedence
pub fn deep_merge_maps(mut base: Map<String, Value>, overlay: Map<String, Value>) -> Map<String, Value> {
    for (key, value) in overlay {
        match base.get_mut(&key) {
            Some(slot) => {
                let base_value = std::mem::take(slot);
                *slot = deep_merge(base_value, value);
            }
            None => {
                base.insert(key, value);
            }
        }
    }
    base
}

/// Left fold of [`deep_merge`]; later values win. Empty input yields `Value::Null`.
pub fn deep_merge_all<I>(values: I) -> Value
where
    I: IntoIterator<Item = Value>,
{
    let mut iter = values.into_iter();
    match iter.next() {
        Some(first) => iter.fold(first, deep_merge),
        None => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deep_merge_nested_objects() {
        let base = json!({
            "database": {"url": "postgres://localhost", "pool": {"max": 10, "min": 2}}
        });
        let overlay = json!({
            "database": {"pool": {"max": 50, "idle_timeout": 300}}
        });

        let merged = deep_merge(base, overlay);

        assert_eq!(
            merged,
            json!({
                "database": {
                    "url": "postgres://localhost",
                    "pool": {"max": 50, "min": 2, "idle_timeout": 300}
                }
            })
        );
    }

    #[test]
    fn test_arrays_are_replaced() {
        let merged = deep_merge(json!({"hosts": ["a", "b"]}), json!({"hosts": ["c"]}));
        assert_eq!(merged, json!({"hosts": ["c"]}));
    }

    #[test]
    fn test_overlay_scalar_replaces_object_and_vice_versa() {
        assert_eq!(deep_merge(json!({"a": {"b": 1}}), json!({"a": 2})), json!({"a": 2}));
        assert_eq!(deep_merge(json!({"a": 2}), json!({"a": {"b": 1}})), json!({"a": {"b": 1}}));
    }

    #[test]
    fn test_overlay_null_keeps_base() {
        assert_eq!(deep_merge(json!({"a": 1}), json!({"a": null})), json!({"a": 1}));
        assert_eq!(deep_merge(json!({"a": {"b": 1}}), Value::Null), json!({"a": {"b": 1}}));
        assert_eq!(deep_merge(Value::Null, json!({"a": 1})), json!({"a": 1}));
        assert_eq!(deep_merge(Value::Null, Value::Null), Value::Null);
    }

    #[test]
    fn test_new_null_key_is_inserted() {
        assert_eq!(
            deep_merge(json!({"a": 1}), json!({"b": null})),
            json!({"a": 1, "b": null})
        );
    }

    #[test]
    fn test_disjoint_keys_are_unioned() {
        assert_eq!(
            deep_merge(json!({"a": 1}), json!({"b": 2})),
            json!({"a": 1, "b": 2})
        );
    }

    #[test]
    fn test_deep_merge_all() {
        let merged = deep_merge_all(vec![
            json!({"a": {"x": 1}}),
            json!({"a": {"y": 2}}),
            json!({"a": {"x": 3}}),
        ]);
        assert_eq!(merged, json!({"a": {"x": 3, "y": 2}}));
        assert_eq!(deep_merge_all(vec![json!({"a": 1}), Value::Null]), json!({"a": 1}));
        assert_eq!(deep_merge_all(Vec::new()), Value::Null);
    }
}
