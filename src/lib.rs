//! oneconfig - versioned configuration client
//!
//! Resolves the configuration of a service by key, environment and version
//! against a pluggable storage backend, and deep-merges configuration maps.
//!
//! ```rust,no_run
//! use oneconfig::OneConfigClient;
//!
//! # fn main() -> oneconfig::Result<()> {
//! let client = OneConfigClient::from_env()?;
//! if let Some(entry) = client.resolve("user-service", "prod", "1.4.0")? {
//!     println!("{} {}", entry.content_type(), entry);
//! }
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod client;
pub mod config;
pub mod content;
pub mod entry;
pub mod error;
pub mod merge;
pub mod utils;

// Re-export commonly used types
pub use client::{configure, deep_merge, OneConfigClient};
pub use entry::{ConfigEntry, ConfigRequest, ConfigValue, Properties};
pub use error::{OneConfigError, Result};
