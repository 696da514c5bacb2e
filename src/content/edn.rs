//! EDN content
//!
//! EDN documents are read into the same structured value as the other map
//! formats. Keyword and symbol keys become strings without the leading colon
//! (`:db/host` reads as `"db/host"`), lists, vectors and sets become arrays.
//! Values with no JSON counterpart (bigints, decimals, `#inst`, `#uuid`,
//! tagged elements) are kept as their EDN text.

use edn_format::{Keyword, Symbol};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::{OneConfigError, Result};

pub fn parse(input: &str) -> Result<Value> {
    let parsed =
        edn_format::parse_str(input).map_err(|e| OneConfigError::parse("edn", format!("{e:?}")))?;
    Ok(edn_to_json(parsed))
}

fn keyword_name(keyword: &Keyword) -> String {
    match keyword.namespace() {
        Some(ns) => format!("{}/{}", ns, keyword.name()),
        None => keyword.name().to_string(),
    }
}

fn symbol_name(symbol: &Symbol) -> String {
    match symbol.namespace() {
        Some(ns) => format!("{}/{}", ns, symbol.name()),
        None => symbol.name().to_string(),
    }
}

fn map_key(key: edn_format::Value) -> String {
    match key {
        edn_format::Value::String(s) => s,
        edn_format::Value::Keyword(k) => keyword_name(&k),
        edn_format::Value::Symbol(s) => symbol_name(&s),
        other => edn_format::emit_str(&other),
    }
}

fn edn_to_json(value: edn_format::Value) -> Value {
    match value {
        edn_format::Value::Nil => Value::Null,
        edn_format::Value::Boolean(b) => Value::Bool(b),
        edn_format::Value::String(s) => Value::String(s),
        edn_format::Value::Character(c) => Value::String(c.to_string()),
        edn_format::Value::Keyword(k) => Value::String(keyword_name(&k)),
        edn_format::Value::Symbol(s) => Value::String(symbol_name(&s)),
        edn_format::Value::Integer(i) => Value::from(i),
        edn_format::Value::Float(f) => serde_json::Number::from_f64(f.into_inner())
            .map(Value::Number)
            .unwrap_or(Value::Null),
        edn_format::Value::List(items) | edn_format::Value::Vector(items) => {
            Value::Array(items.into_iter().map(edn_to_json).collect())
        }
        edn_format::Value::Set(items) => Value::Array(items.into_iter().map(edn_to_json).collect()),
        edn_format::Value::Map(entries) => Value::Object(
            entries
                .into_iter()
                .map(|(k, v)| (map_key(k), edn_to_json(v)))
                .collect(),
        ),
        other => Value::String(edn_format::emit_str(&other)),
    }
}

/// EDN map with keyword keys wherever the key is a valid keyword name
pub fn map_to_edn(map: &Map<String, Value>) -> BTreeMap<edn_format::Value, edn_format::Value> {
    map.iter()
        .map(|(k, v)| (key_to_edn(k), json_to_edn(v)))
        .collect()
}

fn key_to_edn(key: &str) -> edn_format::Value {
    if !is_keyword_name(key) {
        return edn_format::Value::String(key.to_string());
    }
    match key.split_once('/') {
        Some((ns, name)) if !name.is_empty() => {
            edn_format::Value::Keyword(Keyword::from_namespace_and_name(ns, name))
        }
        _ => edn_format::Value::Keyword(Keyword::from_name(key)),
    }
}

fn json_to_edn(value: &Value) -> edn_format::Value {
    match value {
        Value::Null => edn_format::Value::Nil,
        Value::Bool(b) => edn_format::Value::Boolean(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => edn_format::Value::Integer(i),
            None => edn_format::Value::Float(n.as_f64().unwrap_or(f64::NAN).into()),
        },
        Value::String(s) => edn_format::Value::String(s.clone()),
        Value::Array(items) => edn_format::Value::Vector(items.iter().map(json_to_edn).collect()),
        Value::Object(map) => edn_format::Value::Map(map_to_edn(map)),
    }
}

/// Render a structured value as EDN. Object keys that are valid keyword
/// names are written as keywords, others as strings.
pub fn to_string(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out);
    out
}

fn is_keyword_name(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || "-_.*+!?/".contains(c)) && !key.ends_with('/')
}

fn write_string(text: &str, out: &mut String) {
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
}

fn write_map(map: &Map<String, Value>, out: &mut String) {
    out.push('{');
    for (idx, (key, value)) in map.iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        if is_keyword_name(key) {
            out.push(':');
            out.push_str(key);
        } else {
            write_string(key, out);
        }
        out.push(' ');
        write_value(value, out);
    }
    out.push('}');
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("nil"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => write_string(s, out),
        Value::Array(items) => {
            out.push('[');
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push(' ');
                }
                write_value(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => write_map(map, out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keyword_keys_become_strings() {
        let value = parse("{:db {:host \"db1\" :ports [5432 5433]} :app/name \"svc\"}").unwrap();
        assert_eq!(
            value,
            json!({"db": {"host": "db1", "ports": [5432, 5433]}, "app/name": "svc"})
        );
    }

    #[test]
    fn test_scalars_and_collections() {
        let value = parse("{:on true :off false :none nil :ratio 0.5 :mode :fast :tags #{\"a\"} :l (1 2)}").unwrap();
        assert_eq!(value.get("on"), Some(&json!(true)));
        assert_eq!(value.get("off"), Some(&json!(false)));
        assert_eq!(value.get("none"), Some(&Value::Null));
        assert_eq!(value.get("ratio"), Some(&json!(0.5)));
        assert_eq!(value.get("mode"), Some(&json!("fast")));
        assert_eq!(value.get("tags"), Some(&json!(["a"])));
        assert_eq!(value.get("l"), Some(&json!([1, 2])));
    }

    #[test]
    fn test_string_keys_kept() {
        assert_eq!(parse("{\"a b\" 1}").unwrap(), json!({"a b": 1}));
    }

    #[test]
    fn test_parse_error() {
        let err = parse("{:db ").unwrap_err();
        assert!(matches!(err, OneConfigError::ParseError { ref content_type, .. } if content_type == "edn"));
    }

    #[test]
    fn test_map_to_edn_uses_keywords() {
        let map = parse("{:db {:host \"db1\"} \"a b\" 1}").unwrap();
        let edn = map_to_edn(map.as_object().unwrap());

        let db = edn.get(&edn_format::Value::Keyword(Keyword::from_name("db"))).unwrap();
        let edn_format::Value::Map(db) = db else {
            panic!("expected a map, got {db:?}");
        };
        assert_eq!(
            db.get(&edn_format::Value::Keyword(Keyword::from_name("host"))),
            Some(&edn_format::Value::String("db1".to_string()))
        );
        assert_eq!(
            edn.get(&edn_format::Value::String("a b".to_string())),
            Some(&edn_format::Value::Integer(1))
        );
    }

    #[test]
    fn test_render_keywords_and_strings() {
        let text = to_string(&json!({"db": {"host": "d\"1"}, "a b": [1, null]}));
        assert_eq!(text, "{:db {:host \"d\\\"1\"} \"a b\" [1 nil]}");
        assert_eq!(parse(&text).unwrap(), json!({"db": {"host": "d\"1"}, "a b": [1, null]}));
    }
}
