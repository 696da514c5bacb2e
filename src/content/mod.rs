//! Content types and codecs
//!
//! A stored entry is raw text plus a content type. This module turns that
//! text into a [`ConfigValue`] and back.

pub mod edn;
pub mod properties;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::entry::ConfigValue;
use crate::error::{OneConfigError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Json,
    Yaml,
    Toml,
    Properties,
    #[serde(rename = "txt")]
    Text,
    Edn,
}

impl ContentType {
    pub const ALL: [ContentType; 6] = [
        ContentType::Json,
        ContentType::Yaml,
        ContentType::Toml,
        ContentType::Properties,
        ContentType::Text,
        ContentType::Edn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
            Self::Properties => "properties",
            Self::Text => "txt",
            Self::Edn => "edn",
        }
    }

    /// File extension used by the filesystem layout
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        ext.parse().ok()
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = OneConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            "properties" => Ok(Self::Properties),
            "txt" | "text" => Ok(Self::Text),
            "edn" => Ok(Self::Edn),
            _ => Err(OneConfigError::unsupported_content_type(s)),
        }
    }
}

/// Decode raw stored text according to its content type.
pub fn decode(content_type: ContentType, raw: &str) -> Result<ConfigValue> {
    let value = match content_type {
        ContentType::Json => ConfigValue::Structured(
            serde_json::from_str::<Value>(raw)
                .map_err(|e| OneConfigError::parse("json", e.to_string()))?,
        ),
        ContentType::Yaml => ConfigValue::Structured(
            serde_yaml::from_str::<Value>(raw)
                .map_err(|e| OneConfigError::parse("yaml", e.to_string()))?,
        ),
        ContentType::Toml => {
            let table = toml::from_str::<toml::Table>(raw)
                .map_err(|e| OneConfigError::parse("toml", e.to_string()))?;
            ConfigValue::Structured(toml_to_json(toml::Value::Table(table)))
        }
        ContentType::Edn => ConfigValue::Structured(edn::parse(raw)?),
        ContentType::Properties => ConfigValue::Properties(properties::parse(raw)?),
        ContentType::Text => ConfigValue::Text(raw.to_string()),
    };
    Ok(value)
}

/// Encode a value for storage under the given content type
pub fn encode(value: &ConfigValue, content_type: ContentType) -> Result<String> {
    match (content_type, value) {
        (ContentType::Json, ConfigValue::Structured(v)) => Ok(serde_json::to_string_pretty(v)?),
        (ContentType::Yaml, ConfigValue::Structured(v)) => Ok(serde_yaml::to_string(v)?),
        (ContentType::Toml, ConfigValue::Structured(v)) => {
            toml::to_string_pretty(v).map_err(|e| OneConfigError::serialization(e.to_string()))
        }
        (ContentType::Properties, ConfigValue::Properties(props)) => {
            Ok(properties::to_string(props))
        }
        (ContentType::Edn, ConfigValue::Structured(v)) => Ok(edn::to_string(v)),
        (ContentType::Text | ContentType::Edn, ConfigValue::Text(text)) => Ok(text.clone()),
        (content_type, _) => Err(OneConfigError::serialization(format!(
            "value shape does not match content type '{content_type}'"
        ))),
    }
}

/// Datetimes become their RFC 3339 text; non-finite floats become null
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}
