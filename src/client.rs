//! Configuration client
//!
//! The client is a thin facade: it marshals key/env/version into a
//! [`ConfigRequest`], delegates to a [`ConfigBackend`] and hands the entry
//! back untouched. Merging delegates to [`crate::merge`].

use serde_json::{Map, Value};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

use crate::backend::{create_backend, ConfigBackend};
use crate::config::{load_settings, Settings};
use crate::entry::{ConfigEntry, ConfigRequest};
use crate::error::Result;
use crate::merge;

#[derive(Clone)]
pub struct OneConfigClient {
    backend: Arc<dyn ConfigBackend>,
}

impl std::fmt::Debug for OneConfigClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OneConfigClient")
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl OneConfigClient {
    pub fn new(backend: Arc<dyn ConfigBackend>) -> Self {
        Self { backend }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let backend = create_backend(settings)?;
        info!("oneconfig client using {} backend", backend.name());
        Ok(Self::new(backend))
    }

    /// Build a client from the settings file and `ONECONFIG_*` environment
    pub fn from_env() -> Result<Self> {
        Self::from_settings(&load_settings()?)
    }

    pub fn backend(&self) -> &Arc<dyn ConfigBackend> {
        &self.backend
    }

    /// Resolve the configuration for `key` in `env` at `version`.
    ///
    /// Returns `Ok(None)` when the backend has no matching entry. Backend
    /// errors are returned as they are.
    pub fn resolve(&self, key: &str, env: &str, version: &str) -> Result<Option<ConfigEntry>> {
        let request = ConfigRequest::new(key, env, version);
        debug!("Resolving {} via {} backend", request, self.backend.name());
        self.backend.load(&request)
    }

    /// Same as [`resolve`](Self::resolve)
    pub fn configure(&self, key: &str, env: &str, version: &str) -> Result<Option<ConfigEntry>> {
        self.resolve(key, env, version)
    }

    pub fn deep_merge(&self, base: Value, overlay: Value) -> Value {
        merge::deep_merge(base, overlay)
    }

    pub fn deep_merge_json_maps(&self, base: Map<String, Value>, overlay: Map<String, Value>) -> Map<String, Value> {
        merge::deep_merge_maps(base, overlay)
    }
}

static DEFAULT_CLIENT: OnceLock<OneConfigClient> = OnceLock::new();

/// Process-wide client built from the environment on first use.
///
/// A failed build is returned and the next call tries again.
pub fn default_client() -> Result<&'static OneConfigClient> {
    get_or_build(&DEFAULT_CLIENT, OneConfigClient::from_env)
}

fn get_or_build<F>(cell: &OnceLock<OneConfigClient>, build: F) -> Result<&OneConfigClient>
where
    F: FnOnce() -> Result<OneConfigClient>,
{
    if let Some(client) = cell.get() {
        return Ok(client);
    }
    let client = build()?;
    Ok(cell.get_or_init(|| client))
}

/// Resolve through the default client
pub fn configure(key: &str, env: &str, version: &str) -> Result<Option<ConfigEntry>> {
    default_client()?.resolve(key, env, version)
}

/// Deep merge two values; a non-null `overlay` takes precedence
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    merge::deep_merge(base, overlay)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemoryBackend, MockConfigBackend};
    use crate::error::OneConfigError;
    use mockall::predicate::eq;
    use serde_json::json;

    #[test]
    fn test_resolve_forwards_request_and_returns_entry_unchanged() {
        let stored = ConfigEntry::new("svc", "prod", "1.2.0", "json", json!({"a": 1}));
        let returned = stored.clone();

        let mut backend = MockConfigBackend::new();
        backend.expect_name().return_const("mock");
        backend
            .expect_load()
            .with(eq(ConfigRequest::new("svc", "prod", "1.5")))
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));

        let client = OneConfigClient::new(Arc::new(backend));
        let entry = client.resolve("svc", "prod", "1.5").unwrap().unwrap();
        assert_eq!(entry, stored);
    }

    #[test]
    fn test_resolve_absence() {
        let mut backend = MockConfigBackend::new();
        backend.expect_name().return_const("mock");
        backend.expect_load().returning(|_| Ok(None));

        let client = OneConfigClient::new(Arc::new(backend));
        assert!(client.configure("svc", "prod", "1").unwrap().is_none());
    }

    #[test]
    fn test_resolve_propagates_backend_errors() {
        let mut backend = MockConfigBackend::new();
        backend.expect_name().return_const("mock");
        backend
            .expect_load()
            .returning(|_| Err(OneConfigError::invalid_key("bad key")));

        let client = OneConfigClient::new(Arc::new(backend));
        assert!(matches!(
            client.resolve("bad key", "prod", "1"),
            Err(OneConfigError::InvalidKey { name }) if name == "bad key"
        ));
    }

    #[test]
    fn test_get_or_build_retries_after_failure() {
        let cell = OnceLock::new();
        let mut builds = 0;

        let first = get_or_build(&cell, || {
            builds += 1;
            Err(OneConfigError::config("no settings"))
        });
        assert!(matches!(first, Err(OneConfigError::ConfigError(_))));
        assert!(cell.get().is_none());

        let second = get_or_build(&cell, || {
            builds += 1;
            Ok(OneConfigClient::new(Arc::new(MemoryBackend::new())))
        })
        .unwrap();
        assert_eq!(second.backend().name(), "memory");

        let third = get_or_build(&cell, || {
            builds += 1;
            Err(OneConfigError::config("not called"))
        })
        .unwrap();
        assert!(std::ptr::eq(second, third));
        assert_eq!(builds, 2);
    }

    #[test]
    fn test_deep_merge_matches_merge_module() {
        let client = OneConfigClient::new(Arc::new(MockConfigBackend::new()));
        let a = json!({"x": {"y": 1, "z": [1]}, "k": "v"});
        let b = json!({"x": {"z": [2], "w": null}});

        assert_eq!(
            client.deep_merge(a.clone(), b.clone()),
            merge::deep_merge(a.clone(), b.clone())
        );
        assert_eq!(deep_merge(a.clone(), b.clone()), merge::deep_merge(a, b));
    }

    #[test]
    fn test_deep_merge_json_maps() {
        let client = OneConfigClient::new(Arc::new(MockConfigBackend::new()));
        let a = json!({"x": {"y": 1}}).as_object().cloned().unwrap();
        let b = json!({"x": {"z": 2}}).as_object().cloned().unwrap();
        let merged = client.deep_merge_json_maps(a, b);
        assert_eq!(Value::Object(merged), json!({"x": {"y": 1, "z": 2}}));
    }
}
