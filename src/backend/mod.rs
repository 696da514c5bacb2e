//! Configuration backends
//!
//! A backend is the engine that turns a key/env/version request into a
//! stored entry. The client only delegates to the trait defined here.

pub mod filesystem;
pub mod hierarchical;
pub mod memory;
pub mod single_file;

pub use filesystem::FilesystemBackend;
pub use hierarchical::HierarchicalBackend;
pub use memory::MemoryBackend;
pub use single_file::SingleFileBackend;

use std::sync::Arc;
use tracing::debug;

use crate::config::{BackendKind, Settings};
use crate::entry::{ConfigEntry, ConfigRequest, EntrySummary, ListFilter};
use crate::error::{OneConfigError, Result};

/// Trait for configuration storage engines
#[cfg_attr(test, mockall::automock)]
pub trait ConfigBackend: Send + Sync {
    /// Human-readable backend name, used in logs and errors
    fn name(&self) -> &'static str;

    /// Load the best match for `request`: the highest stored version not
    /// above the requested one. `Ok(None)` when nothing qualifies.
    fn load(&self, request: &ConfigRequest) -> Result<Option<ConfigEntry>>;

    /// Store an entry
    fn save(&self, entry: &ConfigEntry) -> Result<()> {
        let _ = entry;
        Err(OneConfigError::read_only(self.name()))
    }

    /// List stored entries matching `filter`, sorted by key, env and
    /// descending version
    fn list(&self, filter: &ListFilter) -> Result<Vec<EntrySummary>>;
}

/// Sort summaries by key, env, then newest version first
pub(crate) fn sort_summaries(summaries: &mut [EntrySummary]) {
    use crate::utils::version::parse_version;

    summaries.sort_by(|a, b| {
        a.key
            .cmp(&b.key)
            .then_with(|| a.env.cmp(&b.env))
            .then_with(|| match (parse_version(&a.version), parse_version(&b.version)) {
                (Ok(va), Ok(vb)) => vb.cmp(&va),
                _ => b.version.cmp(&a.version),
            })
    });
}

/// Build the backend described by `settings`.
///
/// An explicit `file` takes precedence over the backend selection.
pub fn create_backend(settings: &Settings) -> Result<Arc<dyn ConfigBackend>> {
    if let Some(file) = &settings.file {
        debug!("Using single-file backend at {}", file.display());
        return Ok(Arc::new(SingleFileBackend::new(file.clone())?));
    }

    let backend: Arc<dyn ConfigBackend> = match settings.default_backend {
        BackendKind::Fs => {
            debug!(
                "Using filesystem backend at {}",
                settings.default_backend_dir.display()
            );
            Arc::new(FilesystemBackend::new(settings.default_backend_dir.clone()))
        }
        BackendKind::Memory => Arc::new(MemoryBackend::new()),
        BackendKind::Hierarchical => {
            let backends: Vec<Arc<dyn ConfigBackend>> = std::iter::once(&settings.default_backend_dir)
                .chain(settings.search_paths.iter())
                .map(|dir| Arc::new(FilesystemBackend::new(dir.clone())) as Arc<dyn ConfigBackend>)
                .collect();
            debug!("Using hierarchical backend over {} directories", backends.len());
            Arc::new(HierarchicalBackend::new(backends))
        }
    };

    Ok(backend)
}
