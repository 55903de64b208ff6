use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

const BANNER_WIDTH: usize = 60;
const UNREADABLE: &str = "(Could not read file)\n";

fn read_lossy(path: &Path) -> String {
    fs::read(path).map_or_else(
        |_| UNREADABLE.to_string(),
        |bytes| String::from_utf8_lossy(&bytes).into_owned(),
    )
}

/// Builds the manual merge document: a commented header naming both sources,
/// then the full left and right contents under banners.
#[must_use]
pub fn render_merge_file(relative_path: &str, left: &Path, right: &Path) -> String {
    let rule = "=".repeat(BANNER_WIDTH);
    let mut doc = String::new();

    let _ = writeln!(doc, "# Merge file for: {relative_path}");
    let _ = writeln!(doc, "# Left file:  {}", left.display());
    let _ = writeln!(doc, "# Right file: {}", right.display());
    doc.push_str("#\n");
    doc.push_str("# Keep the content you want, delete the rest, and save this file.\n");
    doc.push_str("# Nothing is written back to either tree automatically.\n");
    doc.push('\n');

    let _ = writeln!(doc, "{rule}\nLEFT FILE ({}):\n{rule}", left.display());
    doc.push_str(&read_lossy(left));
    doc.push_str("\n\n");

    let _ = writeln!(doc, "{rule}\nRIGHT FILE ({}):\n{rule}", right.display());
    doc.push_str(&read_lossy(right));

    doc
}

/// Writes the merge document to a new `.merge` file in `dir` and keeps it.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_merge_file(
    dir: &Path,
    relative_path: &str,
    left: &Path,
    right: &Path,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create merge directory {}", dir.display()))?;

    let mut file = tempfile::Builder::new()
        .prefix("dircmp-")
        .suffix(".merge")
        .tempfile_in(dir)
        .with_context(|| format!("Failed to create merge file in {}", dir.display()))?;
    file.write_all(render_merge_file(relative_path, left, right).as_bytes())
        .context("Failed to write merge file")?;

    let (_, path) = file.keep().map_err(|e| e.error).context("Failed to keep merge file")?;
    info!(path = %path.display(), subject = relative_path, "Merge file written");
    Ok(path)
}
