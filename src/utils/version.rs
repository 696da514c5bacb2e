//! Version parsing and best-match selection
//!
//! Stored versions are compared as semantic versions. A request for
//! version `V` resolves to the highest stored version that is `<= V`.

use semver::Version;
use tracing::warn;

use crate::error::{OneConfigError, Result};

/// Parse a version, padding missing minor/patch components with zero.
///
/// `"2"` becomes `2.0.0` and `"1.4-rc1"` becomes `1.4.0-rc1`.
pub fn parse_version(version: &str) -> Result<Version> {
    let trimmed = version.trim();
    if trimmed.is_empty() {
        return Err(OneConfigError::invalid_version(version, "version is empty"));
    }

    let split_at = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
    let (core, suffix) = trimmed.split_at(split_at);

    let parts: Vec<&str> = core.split('.').collect();
    if parts.len() > 3 || parts.iter().any(|p| p.is_empty()) {
        return Err(OneConfigError::invalid_version(
            version,
            "expected MAJOR[.MINOR[.PATCH]]",
        ));
    }

    let mut padded = parts.join(".");
    for _ in parts.len()..3 {
        padded.push_str(".0");
    }
    padded.push_str(suffix);

    Version::parse(&padded).map_err(|e| OneConfigError::invalid_version(version, e.to_string()))
}

/// Pick the highest of `available` that does not exceed `requested`.
///
/// Returns the original string of the winner so callers can address the
/// stored entry exactly. Unparsable candidates are skipped.
pub fn best_match<I, S>(requested: &str, available: I) -> Result<Option<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let wanted = parse_version(requested)?;

    let mut best: Option<(Version, String)> = None;
    for candidate in available {
        let candidate = candidate.as_ref();
        let parsed = match parse_version(candidate) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Skipping unparsable version '{}': {}", candidate, e);
                continue;
            }
        };

        if parsed > wanted {
            continue;
        }

        let better = best
            .as_ref()
            .map(|(current, _)| parsed > *current)
            .unwrap_or(true);
        if better {
            best = Some((parsed, candidate.to_string()));
        }
    }

    Ok(best.map(|(_, original)| original))
}
