//! In-memory backend

use std::collections::BTreeMap;
use std::sync::RwLock;
use tracing::debug;

use super::{sort_summaries, ConfigBackend};
use crate::entry::{ConfigEntry, ConfigRequest, EntrySummary, ListFilter};
use crate::error::{OneConfigError, Result};
use crate::utils::sanitizer::{validate_env, validate_key};
use crate::utils::version::{best_match, parse_version};

type Slot = (String, String);

/// Entries kept in a map keyed by (key, env), one entry per stored version
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<BTreeMap<Slot, Vec<ConfigEntry>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a backend pre-populated with `entries`
    pub fn with_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = ConfigEntry>,
    {
        let backend = Self::new();
        for entry in entries {
            backend.save(&entry)?;
        }
        Ok(backend)
    }

    fn poisoned() -> OneConfigError {
        OneConfigError::config("memory backend lock poisoned")
    }
}

impl ConfigBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn load(&self, request: &ConfigRequest) -> Result<Option<ConfigEntry>> {
        request.validate()?;

        let entries = self.entries.read().map_err(|_| Self::poisoned())?;
        let slot = (request.key.clone(), request.env.clone());
        let Some(versions) = entries.get(&slot) else {
            debug!("No entries stored for {}/{}", request.key, request.env);
            return Ok(None);
        };

        let chosen = best_match(&request.version, versions.iter().map(ConfigEntry::version))?;
        Ok(chosen.and_then(|version| {
            versions
                .iter()
                .find(|entry| entry.version() == version)
                .cloned()
        }))
    }

    /// Insert or replace the entry stored under the same key, env and version
    fn save(&self, entry: &ConfigEntry) -> Result<()> {
        validate_key(entry.key())?;
        validate_env(entry.env())?;
        let version = parse_version(entry.version())?;

        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        let versions = entries
            .entry((entry.key().to_string(), entry.env().to_string()))
            .or_default();

        versions.retain(|existing| {
            parse_version(existing.version())
                .map(|v| v != version)
                .unwrap_or(true)
        });
        versions.push(entry.clone());

        debug!(
            "Stored {}/{}/{} in memory",
            entry.key(),
            entry.env(),
            entry.version()
        );
        Ok(())
    }

    fn list(&self, filter: &ListFilter) -> Result<Vec<EntrySummary>> {
        let entries = self.entries.read().map_err(|_| Self::poisoned())?;
        let mut summaries: Vec<EntrySummary> = entries
            .iter()
            .filter(|((key, env), _)| filter.matches(key, env))
            .flat_map(|(_, versions)| versions.iter().map(ConfigEntry::summary))
            .collect();
        sort_summaries(&mut summaries);
        Ok(summaries)
    }
}
