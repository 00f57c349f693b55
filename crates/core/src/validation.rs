//! Small input grammars that do not fit the derive-based DTO validation.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

static HEX_COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid regex"));

/// Validate a `#RRGGBB` hex color string.
pub fn validate_hex_color(color: &str) -> Result<(), CoreError> {
    if HEX_COLOR_RE.is_match(color) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Color '{color}' must be a valid hex color code (e.g. #FF5733)"
        )))
    }
}
