//! Name validation for configuration keys and environments
//!
//! Keys and environments end up as directory names in the filesystem
//! layout, so both are restricted to a conservative character set.

use regex::Regex;

use crate::error::{OneConfigError, Result};

const MAX_NAME_LENGTH: usize = 128;
const NAME_PATTERN: &str = r"^[a-zA-Z0-9][a-zA-Z0-9._-]*$";

/// Check if a name is usable as a key or environment
pub fn is_valid_config_name(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_NAME_LENGTH {
        return false;
    }

    Regex::new(NAME_PATTERN)
        .map(|re| re.is_match(name))
        .unwrap_or(false)
}

pub fn validate_key(key: &str) -> Result<()> {
    if is_valid_config_name(key) {
        Ok(())
    } else {
        Err(OneConfigError::invalid_key(key))
    }
}

pub fn validate_env(env: &str) -> Result<()> {
    if is_valid_config_name(env) {
        Ok(())
    } else {
        Err(OneConfigError::invalid_env(env))
    }
}
