use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{Level, debug, span};

/// Number of leading bytes inspected by the text heuristic.
pub const TEXT_SAMPLE_LEN: usize = 512;

/// Share of printable bytes a sample must exceed to count as text.
pub const TEXT_RATIO: f64 = 0.7;

/// Returns true if `sample` looks like human-editable text.
///
/// An empty sample is text. Otherwise bytes in `0x20..=0x7E` plus tab, LF and CR
/// count as printable, and their share must be strictly above [`TEXT_RATIO`].
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn looks_like_text(sample: &[u8]) -> bool {
    if sample.is_empty() {
        return true;
    }
    let printable = sample
        .iter()
        .filter(|&&b| (0x20..=0x7E).contains(&b) || matches!(b, b'\t' | b'\n' | b'\r'))
        .count();
    printable as f64 / sample.len() as f64 > TEXT_RATIO
}

/// Reads up to [`TEXT_SAMPLE_LEN`] bytes from the start of a file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn read_sample(path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open file for text check: {}", path.display()))?;
    let mut sample = Vec::with_capacity(TEXT_SAMPLE_LEN);
    file.take(TEXT_SAMPLE_LEN as u64)
        .read_to_end(&mut sample)
        .with_context(|| format!("Failed to read file for text check: {}", path.display()))?;
    Ok(sample)
}

/// Check if a file is text by sampling its first bytes.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn is_text_file(path: &Path) -> Result<bool> {
    let span = span!(Level::DEBUG, "text_check", path = %path.display());
    let _guard = span.enter();

    let sample = read_sample(path)?;
    let is_text = looks_like_text(&sample);

    debug!(is_text, bytes_checked = sample.len(), "Text detection complete");

    Ok(is_text)
}
