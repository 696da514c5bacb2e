//! Filesystem backend
//!
//! Entries live under a root directory using the layout
//! `<root>/<key>/<env>/<version>/<key>.<ext>`, where the extension names the
//! content type. A missing root, key or env directory means "not found".

use chrono::{DateTime, Utc};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use super::{sort_summaries, ConfigBackend};
use crate::content::{self, ContentType};
use crate::entry::{ConfigEntry, ConfigRequest, EntrySummary, ListFilter};
use crate::error::Result;
use crate::utils::sanitizer::{is_valid_config_name, validate_env, validate_key};
use crate::utils::version::{best_match, parse_version};

#[derive(Debug, Clone)]
pub struct FilesystemBackend {
    root: PathBuf,
}

/// A version directory that holds an entry file
#[derive(Debug, Clone)]
struct StoredVersion {
    version: String,
    path: PathBuf,
    content_type: ContentType,
}

impl FilesystemBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file that stores `entry`
    pub fn entry_path(&self, key: &str, env: &str, version: &str, content_type: ContentType) -> PathBuf {
        self.root
            .join(key)
            .join(env)
            .join(version)
            .join(format!("{}.{}", key, content_type.extension()))
    }

    fn env_dir(&self, key: &str, env: &str) -> PathBuf {
        self.root.join(key).join(env)
    }

    /// Find the entry file inside a version directory
    fn find_entry_file(dir: &Path, key: &str) -> Option<(PathBuf, ContentType)> {
        ContentType::ALL.iter().find_map(|ct| {
            let candidate = dir.join(format!("{}.{}", key, ct.extension()));
            candidate.is_file().then_some((candidate, *ct))
        })
    }

    fn subdirectories(dir: &Path) -> Result<Vec<String>> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for dir_entry in fs::read_dir(dir)? {
            let dir_entry = dir_entry?;
            if !dir_entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(name) = dir_entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn stored_versions(&self, key: &str, env: &str) -> Result<Vec<StoredVersion>> {
        let env_dir = self.env_dir(key, env);
        let mut stored = Vec::new();

        for version in Self::subdirectories(&env_dir)? {
            match Self::find_entry_file(&env_dir.join(&version), key) {
                Some((path, content_type)) => stored.push(StoredVersion {
                    version,
                    path,
                    content_type,
                }),
                None => debug!("Version directory {}/{}/{} holds no entry file", key, env, version),
            }
        }

        Ok(stored)
    }

    fn modified_at(path: &Path) -> Option<DateTime<Utc>> {
        fs::metadata(path)
            .and_then(|meta| meta.modified())
            .map(DateTime::<Utc>::from)
            .ok()
    }
}

impl ConfigBackend for FilesystemBackend {
    fn name(&self) -> &'static str {
        "filesystem"
    }

    fn load(&self, request: &ConfigRequest) -> Result<Option<ConfigEntry>> {
        request.validate()?;

        let stored = self.stored_versions(&request.key, &request.env)?;
        let Some(version) = best_match(&request.version, stored.iter().map(|s| s.version.as_str()))? else {
            debug!("No stored version of {} satisfies the request", request);
            return Ok(None);
        };

        let Some(hit) = stored.into_iter().find(|s| s.version == version) else {
            return Ok(None);
        };

        debug!("Resolved {} to {}", request, hit.path.display());
        let raw = fs::read_to_string(&hit.path)?;
        let value = content::decode(hit.content_type, &raw)?;

        let mut entry = ConfigEntry::new(
            request.key.clone(),
            request.env.clone(),
            hit.version,
            hit.content_type.as_str(),
            value,
        );
        if let Some(updated) = Self::modified_at(&hit.path) {
            entry = entry.with_updated(updated);
        }
        Ok(Some(entry))
    }

    /// Write the entry file, replacing any file of another content type
    /// stored for the same version.
    ///
    /// The body goes to a temporary file in the version directory that is
    /// renamed into place; superseded files are removed only after that
    /// rename succeeds.
    fn save(&self, entry: &ConfigEntry) -> Result<()> {
        validate_key(entry.key())?;
        validate_env(entry.env())?;
        parse_version(entry.version())?;
        let content_type: ContentType = entry.content_type().parse()?;

        let body = content::encode(entry.value(), content_type)?;
        let path = self.entry_path(entry.key(), entry.env(), entry.version(), content_type);
        let parent = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());
        fs::create_dir_all(&parent)?;

        let mut staged = NamedTempFile::new_in(&parent)?;
        staged.write_all(body.as_bytes())?;
        staged.persist(&path).map_err(|e| e.error)?;

        for other in ContentType::ALL.iter().filter(|ct| **ct != content_type) {
            let stale = parent.join(format!("{}.{}", entry.key(), other.extension()));
            if stale.is_file() {
                warn!("Removing {} superseded by {}", stale.display(), content_type);
                fs::remove_file(&stale)?;
            }
        }

        info!("Saved {}/{}/{} to {}", entry.key(), entry.env(), entry.version(), path.display());
        Ok(())
    }

    fn list(&self, filter: &ListFilter) -> Result<Vec<EntrySummary>> {
        let mut summaries = Vec::new();

        for key in Self::subdirectories(&self.root)? {
            if !is_valid_config_name(&key) {
                continue;
            }
            for env in Self::subdirectories(&self.root.join(&key))? {
                if !is_valid_config_name(&env) || !filter.matches(&key, &env) {
                    continue;
                }
                for stored in self.stored_versions(&key, &env)? {
                    summaries.push(EntrySummary {
                        key: key.clone(),
                        env: env.clone(),
                        version: stored.version,
                        content_type: stored.content_type.as_str().to_string(),
                        change_num: Self::modified_at(&stored.path).map(|t| t.timestamp_millis()),
                    });
                }
            }
        }

        sort_summaries(&mut summaries);
        Ok(summaries)
    }
}
