//! Small helpers shared by the scanner, the transfer service and the UI.
//!
//! - [`hash`]: content digests (xxHash3-128) with memory mapping for large files
//! - [`paths`]: relative-key derivation and parent directory creation

/// Content hashing
pub mod hash;
/// Path manipulation helpers
pub mod paths;

use std::path::Path;

/// Determines if a relative path should be ignored based on configured patterns.
///
/// Supported forms: `dir/` (any component equals `dir`), `*contains*`,
/// `*suffix`, `prefix*`, and a bare name (whole path or any component).
#[must_use]
pub fn should_ignore(path: &Path, patterns: &[String]) -> bool {
    let path_str = path.to_string_lossy();
    let has_component = |name: &str| path.components().any(|c| c.as_os_str() == name);

    patterns.iter().any(|pattern| {
        if let Some(dir_name) = pattern.strip_suffix('/') {
            has_component(dir_name)
        } else if pattern.len() > 1 && pattern.starts_with('*') && pattern.ends_with('*') {
            path_str.contains(&pattern[1..pattern.len() - 1])
        } else if let Some(suffix) = pattern.strip_prefix('*') {
            path_str.ends_with(suffix)
        } else if let Some(prefix) = pattern.strip_suffix('*') {
            path_str.starts_with(prefix)
        } else {
            path_str == pattern.as_str() || has_component(pattern.as_str())
        }
    })
}

/// Formats a file size in bytes into a human-readable string with appropriate units.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn format_size(size: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = size as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", size.round() as u64, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}
