//! Utility functions module
//!
//! This module contains name validation for keys and environments and
//! version parsing and matching.

pub mod sanitizer;
pub mod version;

pub use sanitizer::*;
pub use version::*;
