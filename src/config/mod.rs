//! Client configuration module
//!
//! This module handles loading the client settings from a settings file,
//! environment variables and default values.

pub mod settings;

pub use settings::*;
