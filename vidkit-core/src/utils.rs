//! Utility functions for path and size handling.
//!
//! This module provides the extension resolver used by every asset handle
//! and a byte formatter used when presenting media details.

/// Sentinel extension for paths that have no usable extension.
///
/// Also used as the message of `CoreError::InvalidInputPath`.
pub const INCORRECT_INPUT_PATH: &str = "Incorrect input path";

/// Extracts the extension from a path string.
///
/// Returns the text after the last `.`. A path without any `.`, or whose last
/// `.` is the final character, resolves to [`INCORRECT_INPUT_PATH`]. The
/// split is purely textual: directory separators are not special.
#[must_use]
pub fn resolve_extension(path: &str) -> String {
    match path.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext.to_string(),
        _ => INCORRECT_INPUT_PATH.to_string(),
    }
}

/// Returns true when `extension` is a real extension rather than the sentinel.
#[must_use]
pub fn is_valid_extension(extension: &str) -> bool {
    extension != INCORRECT_INPUT_PATH
}

/// Renders a byte count for display: whole bytes below 1 KiB, otherwise two
/// decimals in the largest binary unit that keeps the value at or above 1.
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["KiB", "MiB", "GiB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", UNITS[unit])
}
