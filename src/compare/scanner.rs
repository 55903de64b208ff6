use super::record::FileRecord;
use crate::utils::paths::relative_key;
use crate::utils::should_ignore;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::Path;
use tracing::{Level, debug, span};
use walkdir::WalkDir;

/// Walks one directory tree and collects its regular files.
#[derive(Debug, Clone, Default)]
pub struct DirectoryScanner {
    ignore_patterns: Vec<String>,
}

impl DirectoryScanner {
    #[must_use]
    pub const fn new(ignore_patterns: Vec<String>) -> Self {
        Self { ignore_patterns }
    }

    #[must_use]
    pub fn ignore_patterns(&self) -> &[String] {
        &self.ignore_patterns
    }

    /// Maps every regular file under `root` by its `/`-separated relative path.
    ///
    /// Keys keep the raw name bytes, so the map is ordered by byte value.
    /// Symlinks and special files are skipped. Entries that fail to stat are
    /// left out. A missing root yields an empty map.
    #[must_use]
    pub fn scan(&self, root: &Path) -> BTreeMap<OsString, FileRecord> {
        let span = span!(Level::DEBUG, "scan", root = %root.display());
        let _guard = span.enter();

        let mut files = BTreeMap::new();
        if !root.is_dir() {
            debug!("Root missing, nothing to scan");
            return files;
        }

        let mut skipped = 0usize;
        for entry in WalkDir::new(root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(error = %e, "Skipping unreadable entry");
                    skipped += 1;
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let Some(key) = relative_key(entry.path(), root) else {
                continue;
            };
            if should_ignore(Path::new(&key), &self.ignore_patterns) {
                continue;
            }

            match entry.metadata() {
                Ok(metadata) => {
                    let record = FileRecord::from_metadata(key.clone(), entry.path(), &metadata);
                    files.insert(key, record);
                }
                Err(e) => {
                    debug!(path = %entry.path().display(), error = %e, "Skipping file");
                    skipped += 1;
                }
            }
        }

        debug!(files = files.len(), skipped, "Scan complete");
        files
    }
}
