//! Configuration entry models
//!
//! This module defines the record returned by a resolution together with the
//! typed views callers use to read its value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::content::edn;

/// Java-style properties: string keys to string values
pub type Properties = BTreeMap<String, String>;

/// Resolved configuration payload, shaped by the entry's content type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Text(String),
    Properties(Properties),
    Structured(Value),
}

impl ConfigValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_properties(&self) -> Option<&Properties> {
        match self {
            Self::Properties(props) => Some(props),
            _ => None,
        }
    }

    pub fn as_structured(&self) -> Option<&Value> {
        match self {
            Self::Structured(value) => Some(value),
            _ => None,
        }
    }
}

impl From<Value> for ConfigValue {
    fn from(value: Value) -> Self {
        Self::Structured(value)
    }
}

impl From<Properties> for ConfigValue {
    fn from(props: Properties) -> Self {
        Self::Properties(props)
    }
}

impl From<String> for ConfigValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for ConfigValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// A resolved configuration entry
///
/// Entries are produced by a [`ConfigBackend`](crate::backend::ConfigBackend)
/// and are immutable once built; the accessors hand out the stored fields
/// without modification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigEntry {
    key: String,
    env: String,
    version: String,
    content_type: String,
    value: ConfigValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    change_num: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated: Option<DateTime<Utc>>,
}

impl ConfigEntry {
    pub fn new(
        key: impl Into<String>,
        env: impl Into<String>,
        version: impl Into<String>,
        content_type: impl Into<String>,
        value: impl Into<ConfigValue>,
    ) -> Self {
        Self {
            key: key.into(),
            env: env.into(),
            version: version.into(),
            content_type: content_type.into(),
            value: value.into(),
            change_num: None,
            updated: None,
        }
    }

    /// Attach the revision timestamp of the stored entry
    pub fn with_updated(mut self, updated: DateTime<Utc>) -> Self {
        self.change_num = Some(updated.timestamp_millis());
        self.updated = Some(updated);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn env(&self) -> &str {
        &self.env
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn value(&self) -> &ConfigValue {
        &self.value
    }

    pub fn into_value(self) -> ConfigValue {
        self.value
    }

    pub fn change_num(&self) -> Option<i64> {
        self.change_num
    }

    pub fn updated(&self) -> Option<DateTime<Utc>> {
        self.updated
    }

    pub fn value_as_string(&self) -> Option<&str> {
        self.value.as_text()
    }

    pub fn value_as_properties(&self) -> Option<&Properties> {
        self.value.as_properties()
    }

    /// Borrow the value as a map when it is a structured object
    pub fn value_as_map(&self) -> Option<&Map<String, Value>> {
        self.value.as_structured().and_then(Value::as_object)
    }

    /// Copy the value into a string-keyed JSON map.
    ///
    /// Properties are converted to string values. Text and non-object
    /// structured values have no map view.
    pub fn value_as_json_map(&self) -> Option<Map<String, Value>> {
        match &self.value {
            ConfigValue::Structured(Value::Object(map)) => Some(map.clone()),
            ConfigValue::Properties(props) => Some(
                props
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Map view with EDN keyword keys, built from [`value_as_json_map`](Self::value_as_json_map)
    pub fn value_as_edn_map(&self) -> Option<BTreeMap<edn_format::Value, edn_format::Value>> {
        self.value_as_json_map().map(|map| edn::map_to_edn(&map))
    }

    /// Walk into the structured value following `path`.
    ///
    /// Object segments are looked up by name, array segments must be decimal
    /// indices. Properties answer single-segment paths.
    pub fn get_in<S: AsRef<str>>(&self, path: &[S]) -> Option<Value> {
        match &self.value {
            ConfigValue::Structured(root) => {
                let mut current = root;
                for segment in path {
                    let segment = segment.as_ref();
                    current = match current {
                        Value::Object(map) => map.get(segment)?,
                        Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                        _ => return None,
                    };
                }
                Some(current.clone())
            }
            ConfigValue::Properties(props) => match path {
                [single] => props.get(single.as_ref()).cloned().map(Value::String),
                _ => None,
            },
            ConfigValue::Text(_) => None,
        }
    }

    /// Short listing form used by [`ConfigBackend::list`](crate::backend::ConfigBackend::list)
    pub fn summary(&self) -> EntrySummary {
        EntrySummary {
            key: self.key.clone(),
            env: self.env.clone(),
            version: self.version.clone(),
            content_type: self.content_type.clone(),
            change_num: self.change_num,
        }
    }
}

impl std::fmt::Display for ConfigEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match &self.value {
            ConfigValue::Text(text) => format!("{text:?}"),
            ConfigValue::Properties(props) => format!("{props:?}"),
            ConfigValue::Structured(value) => value.to_string(),
        };
        write!(
            f,
            "{{key: {:?}, env: {:?}, version: {:?}, content-type: {:?}, value: {}}}",
            self.key, self.env, self.version, self.content_type, value
        )
    }
}

/// Entry metadata without the value, as returned by listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EntrySummary {
    pub key: String,
    pub env: String,
    pub version: String,
    pub content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_num: Option<i64>,
}
