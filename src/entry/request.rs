//! Resolution requests and listing filters

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::utils::sanitizer::{validate_env, validate_key};
use crate::utils::version::parse_version;

/// The key/env/version triple a caller asks to resolve
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigRequest {
    pub key: String,
    pub env: String,
    pub version: String,
}

impl ConfigRequest {
    pub fn new(key: impl Into<String>, env: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            env: env.into(),
            version: version.into(),
        }
    }

    /// Check the triple before it touches storage
    pub fn validate(&self) -> Result<()> {
        validate_key(&self.key)?;
        validate_env(&self.env)?;
        parse_version(&self.version)?;
        Ok(())
    }
}

impl std::fmt::Display for ConfigRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.key, self.env, self.version)
    }
}

/// Prefix filters for listing stored entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub key: Option<String>,
    pub env: Option<String>,
}

impl ListFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(mut self, prefix: impl Into<String>) -> Self {
        self.key = Some(prefix.into());
        self
    }

    pub fn env(mut self, prefix: impl Into<String>) -> Self {
        self.env = Some(prefix.into());
        self
    }

    pub fn matches(&self, key: &str, env: &str) -> bool {
        let key_ok = self.key.as_deref().map_or(true, |p| key.starts_with(p));
        let env_ok = self.env.as_deref().map_or(true, |p| env.starts_with(p));
        key_ok && env_ok
    }
}
