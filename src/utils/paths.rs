use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Component, Path};

/// Builds the comparison key for `path` under `base`: its components joined by `/`.
///
/// Returns `None` if `path` is not strictly below `base`. Component bytes are kept
/// as they are, so names that are not valid UTF-8 stay distinct.
#[must_use]
pub fn relative_key(path: &Path, base: &Path) -> Option<OsString> {
    let relative = path.strip_prefix(base).ok()?;
    let mut key = OsString::new();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            if !key.is_empty() {
                key.push("/");
            }
            key.push(part);
        }
    }

    if key.is_empty() { None } else { Some(key) }
}

/// Ensures parent directories exist for a given path
///
/// # Errors
///
/// Returns an error if the parent directories cannot be created
pub fn ensure_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create parent directories for {}", path.display())
        })?;
    }
    Ok(())
}
