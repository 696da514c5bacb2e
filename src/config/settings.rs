//! Client settings management
//!
//! This module loads the client settings from an optional TOML file and
//! `ONECONFIG_*` environment variables, and persists them back to disk.

use crate::error::{OneConfigError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

const ENV_PREFIX: &str = "ONECONFIG";

/// Which storage engine the default client resolves against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    #[serde(alias = "filesystem")]
    Fs,
    Memory,
    Hierarchical,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fs => "fs",
            Self::Memory => "memory",
            Self::Hierarchical => "hierarchical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub default_backend: BackendKind,
    pub default_backend_dir: PathBuf,
    /// Explicit config file answering every request; overrides the backend selection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Extra directories consulted after `default_backend_dir` by the hierarchical backend
    #[serde(deserialize_with = "deserialize_path_list")]
    pub search_paths: Vec<PathBuf>,
}

/// A TOML array of paths, or one comma-separated string as set in the environment
#[derive(Deserialize)]
#[serde(untagged)]
enum PathList {
    List(Vec<PathBuf>),
    Joined(String),
}

fn deserialize_path_list<'de, D>(deserializer: D) -> std::result::Result<Vec<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match PathList::deserialize(deserializer)? {
        PathList::List(paths) => paths,
        PathList::Joined(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(PathBuf::from)
            .collect(),
    })
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_backend: BackendKind::Fs,
            default_backend_dir: default_backend_dir(),
            file: None,
            search_paths: Vec::new(),
        }
    }
}

/// `$HOME/.1config`, or `.1config` when no home directory is known
pub fn default_backend_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".1config"))
        .unwrap_or_else(|| PathBuf::from(".1config"))
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_backend_dir.as_os_str().is_empty() {
            return Err(OneConfigError::config("default_backend_dir must not be empty"));
        }

        if let Some(file) = &self.file {
            if file.as_os_str().is_empty() {
                return Err(OneConfigError::config("file must not be empty when set"));
            }
        }

        Ok(())
    }

    pub fn get_settings_path() -> Result<PathBuf> {
        #[cfg(any(target_os = "linux", target_os = "macos"))]
        {
            use std::env;
            let config_dir = if let Ok(xdg_config_home) = env::var("XDG_CONFIG_HOME") {
                PathBuf::from(xdg_config_home)
            } else {
                let home_dir = env::var("HOME")
                    .map_err(|_| OneConfigError::config("HOME environment variable not set"))?;
                PathBuf::from(home_dir).join(".config")
            };
            Ok(config_dir.join("oneconfig").join("settings.toml"))
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        {
            let config_dir = dirs::config_dir()
                .ok_or_else(|| OneConfigError::config("Unable to determine config directory"))?;
            Ok(config_dir.join("oneconfig").join("settings.toml"))
        }
    }

    pub fn load() -> Result<Self> {
        load_settings()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        save_settings(self, path)
    }
}

/// Load settings with priority order:
/// 1. `ONECONFIG_*` environment variables
/// 2. Settings file
/// 3. Default values
pub fn load_settings() -> Result<Settings> {
    let path = Settings::get_settings_path().ok();
    load_settings_from(path.as_deref(), None)
}

/// Load settings from an explicit file and, when given, an explicit set of
/// environment variables instead of the process environment
pub fn load_settings_from(
    path: Option<&Path>,
    env_vars: Option<HashMap<String, String>>,
) -> Result<Settings> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        debug!("Reading settings from {}", path.display());
        builder = builder.add_source(
            config::File::from(path)
                .format(config::FileFormat::Toml)
                .required(false),
        );
    }

    // Values stay strings; the typed fields parse them during deserialization
    let environment = config::Environment::with_prefix(ENV_PREFIX).source(env_vars);

    let settings: Settings = builder
        .add_source(environment)
        .build()?
        .try_deserialize()?;

    settings.validate()?;
    debug!(
        "Settings: backend={}, dir={}",
        settings.default_backend.as_str(),
        settings.default_backend_dir.display()
    );
    Ok(settings)
}

pub fn save_settings(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(settings)
        .map_err(|e| OneConfigError::serialization(e.to_string()))?;

    std::fs::write(path, contents)?;

    Ok(())
}
