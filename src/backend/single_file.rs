//! Single-file backend
//!
//! An explicitly configured file answers every request. The entry echoes the
//! requested key, env and version; the content type comes from the file
//! extension. Useful for local overrides and containers that mount a config.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::ConfigBackend;
use crate::content::{self, ContentType};
use crate::entry::{ConfigEntry, ConfigRequest, EntrySummary, ListFilter};
use crate::error::{OneConfigError, Result};

#[derive(Debug, Clone)]
pub struct SingleFileBackend {
    path: PathBuf,
    content_type: ContentType,
}

impl SingleFileBackend {
    /// Fails when the extension does not name a supported content type
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| {
                OneConfigError::config(format!(
                    "Config file '{}' has no extension to infer its content type",
                    path.display()
                ))
            })?;
        let content_type = ext.parse()?;
        Ok(Self { path, content_type })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }
}

impl ConfigBackend for SingleFileBackend {
    fn name(&self) -> &'static str {
        "single-file"
    }

    fn load(&self, request: &ConfigRequest) -> Result<Option<ConfigEntry>> {
        request.validate()?;

        if !self.path.is_file() {
            debug!("Config file {} does not exist", self.path.display());
            return Ok(None);
        }

        debug!("Answering {} from {}", request, self.path.display());
        let raw = fs::read_to_string(&self.path)?;
        let value = content::decode(self.content_type, &raw)?;

        Ok(Some(ConfigEntry::new(
            request.key.clone(),
            request.env.clone(),
            request.version.clone(),
            self.content_type.as_str(),
            value,
        )))
    }

    /// The file is not addressed by key, so nothing is listed
    fn list(&self, _filter: &ListFilter) -> Result<Vec<EntrySummary>> {
        Ok(Vec::new())
    }
}
