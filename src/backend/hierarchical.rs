//! Hierarchical backend
//!
//! Consults an ordered list of backends. The first backend that resolves a
//! request wins; writes go to the first backend.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use super::{sort_summaries, ConfigBackend};
use crate::entry::{ConfigEntry, ConfigRequest, EntrySummary, ListFilter};
use crate::error::{OneConfigError, Result};

pub struct HierarchicalBackend {
    backends: Vec<Arc<dyn ConfigBackend>>,
}

impl HierarchicalBackend {
    pub fn new(backends: Vec<Arc<dyn ConfigBackend>>) -> Self {
        Self { backends }
    }

    pub fn backends(&self) -> &[Arc<dyn ConfigBackend>] {
        &self.backends
    }
}

impl std::fmt::Debug for HierarchicalBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.backends.iter().map(|b| b.name()).collect();
        f.debug_struct("HierarchicalBackend")
            .field("backends", &names)
            .finish()
    }
}

impl ConfigBackend for HierarchicalBackend {
    fn name(&self) -> &'static str {
        "hierarchical"
    }

    fn load(&self, request: &ConfigRequest) -> Result<Option<ConfigEntry>> {
        for backend in &self.backends {
            if let Some(entry) = backend.load(request)? {
                debug!("{} resolved by {} backend", request, backend.name());
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }

    fn save(&self, entry: &ConfigEntry) -> Result<()> {
        match self.backends.first() {
            Some(backend) => backend.save(entry),
            None => Err(OneConfigError::read_only(self.name())),
        }
    }

    /// Union of all listings; an entry shadowed by an earlier backend is
    /// reported once
    fn list(&self, filter: &ListFilter) -> Result<Vec<EntrySummary>> {
        let mut seen = HashSet::new();
        let mut summaries = Vec::new();

        for backend in &self.backends {
            for summary in backend.list(filter)? {
                let id = (summary.key.clone(), summary.env.clone(), summary.version.clone());
                if seen.insert(id) {
                    summaries.push(summary);
                }
            }
        }

        sort_summaries(&mut summaries);
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use serde_json::json;

    fn layer(entries: Vec<ConfigEntry>) -> Arc<dyn ConfigBackend> {
        Arc::new(MemoryBackend::with_entries(entries).unwrap())
    }

    #[test]
    fn test_first_backend_wins() {
        let first = layer(vec![ConfigEntry::new("svc", "prod", "1.0.0", "json", json!({"from": "first"}))]);
        let second = layer(vec![
            ConfigEntry::new("svc", "prod", "1.5.0", "json", json!({"from": "second"})),
            ConfigEntry::new("other", "prod", "1.0.0", "txt", "only here"),
        ]);
        let backend = HierarchicalBackend::new(vec![first, second]);

        let svc = backend.load(&ConfigRequest::new("svc", "prod", "2")).unwrap().unwrap();
        assert_eq!(svc.get_in(&["from"]), Some(json!("first")));

        let other = backend.load(&ConfigRequest::new("other", "prod", "1")).unwrap().unwrap();
        assert_eq!(other.value_as_string(), Some("only here"));

        assert!(backend.load(&ConfigRequest::new("none", "prod", "1")).unwrap().is_none());
    }

    #[test]
    fn test_save_goes_to_first_backend() {
        let first = Arc::new(MemoryBackend::new());
        let second = Arc::new(MemoryBackend::new());
        let backend = HierarchicalBackend::new(vec![
            first.clone() as Arc<dyn ConfigBackend>,
            second.clone() as Arc<dyn ConfigBackend>,
        ]);

        backend
            .save(&ConfigEntry::new("svc", "dev", "1.0.0", "txt", "x"))
            .unwrap();

        assert_eq!(first.list(&ListFilter::new()).unwrap().len(), 1);
        assert!(second.list(&ListFilter::new()).unwrap().is_empty());
    }

    #[test]
    fn test_empty_hierarchy() {
        let backend = HierarchicalBackend::new(Vec::new());
        assert!(backend.load(&ConfigRequest::new("svc", "dev", "1")).unwrap().is_none());
        assert!(backend
            .save(&ConfigEntry::new("svc", "dev", "1.0.0", "txt", "x"))
            .is_err());
    }

    #[test]
    fn test_list_deduplicates() {
        let entry = ConfigEntry::new("svc", "prod", "1.0.0", "txt", "x");
        let backend = HierarchicalBackend::new(vec![
            layer(vec![entry.clone()]),
            layer(vec![entry, ConfigEntry::new("svc", "prod", "0.9.0", "txt", "y")]),
        ]);
        let listed = backend.list(&ListFilter::new()).unwrap();
        let versions: Vec<_> = listed.iter().map(|s| s.version.as_str()).collect();
        assert_eq!(versions, ["1.0.0", "0.9.0"]);
    }
}
