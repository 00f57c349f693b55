//! Strict semantic-version validation for release versions.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Semver grammar: `MAJOR.MINOR.PATCH[-prerelease][+build]`.
///
/// Numeric components must not have leading zeros. Pre-release and build
/// identifiers are dot-separated alphanumeric/hyphen segments; numeric
/// pre-release segments also reject leading zeros.
const SEMVER_PATTERN: &str = r"^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(?:-((?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*))*))?(?:\+([0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?$";

static SEMVER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SEMVER_PATTERN).expect("valid regex"));

/// Check whether `version` matches the semver grammar.
pub fn is_valid_version(version: &str) -> bool {
    !version.is_empty() && SEMVER_RE.is_match(version)
}

/// Validate `version`, rejecting anything outside the semver grammar.
pub fn validate_version(version: &str) -> Result<(), CoreError> {
    if is_valid_version(version) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Version '{version}' must be in semver format (e.g. 1.0.0, 1.0.0-alpha, 1.0.0+build)"
        )))
    }
}
