use crate::utils::hash::hash_file;
use anyhow::{Context, Result};
use filetime::FileTime;
use std::ffi::{OsStr, OsString};
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

/// Outcome of hashing a file's content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContentHash {
    /// xxHash3-128 digest as 32 lowercase hex characters
    Digest(String),
    /// The file could not be opened or read
    Unreadable,
}

impl ContentHash {
    #[must_use]
    pub const fn is_unreadable(&self) -> bool {
        matches!(self, Self::Unreadable)
    }
}

/// Metadata snapshot of one file on one side of the comparison.
///
/// `key` is the exact `/`-joined relative path used to pair records across the
/// trees. `relative_path` is its display form and may be lossy.
///
/// The content hash is computed on first access and then kept for the lifetime
/// of the record, even if the file changes on disk. A copy or rescan replaces the
/// record instead of mutating it.
#[derive(Debug, Clone)]
pub struct FileRecord {
    key: OsString,
    relative_path: String,
    path: PathBuf,
    size: u64,
    modified_at: i64,
    exists: bool,
    content_hash: OnceLock<ContentHash>,
}

impl FileRecord {
    #[must_use]
    pub fn new(key: impl Into<OsString>, path: impl Into<PathBuf>, size: u64, modified_at: i64) -> Self {
        let key = key.into();
        Self {
            relative_path: key.to_string_lossy().into_owned(),
            key,
            path: path.into(),
            size,
            modified_at,
            exists: true,
            content_hash: OnceLock::new(),
        }
    }

    /// Record for a path that has no file behind it.
    #[must_use]
    pub fn missing(key: impl Into<OsString>, path: impl Into<PathBuf>) -> Self {
        Self {
            exists: false,
            ..Self::new(key, path, 0, 0)
        }
    }

    #[must_use]
    pub fn from_metadata(key: impl Into<OsString>, path: impl Into<PathBuf>, metadata: &Metadata) -> Self {
        let modified = FileTime::from_last_modification_time(metadata);
        Self::new(key, path, metadata.len(), modified.unix_seconds())
    }

    /// Stats `path` and builds a fresh record with an uncomputed hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the file metadata cannot be read.
    pub fn stat(key: impl Into<OsString>, path: &Path) -> Result<Self> {
        let metadata =
            fs::metadata(path).with_context(|| format!("Failed to stat {}", path.display()))?;
        Ok(Self::from_metadata(key, path, &metadata))
    }

    /// Pre-fills the hash slot. The slot is write-once, so this only has an effect
    /// on a record whose hash has not been requested yet.
    #[must_use]
    pub fn with_content_hash(self, hash: ContentHash) -> Self {
        let _ = self.content_hash.set(hash);
        self
    }

    #[must_use]
    pub fn key(&self) -> &OsStr {
        &self.key
    }

    #[must_use]
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Modification time in whole seconds since the Unix epoch.
    #[must_use]
    pub const fn modified_at(&self) -> i64 {
        self.modified_at
    }

    #[must_use]
    pub const fn exists(&self) -> bool {
        self.exists
    }

    /// Returns the cached content hash, hashing the file on first call.
    pub fn content_hash(&self) -> &ContentHash {
        self.content_hash.get_or_init(|| {
            if !self.exists {
                return ContentHash::Unreadable;
            }
            match hash_file(&self.path) {
                Ok(digest) => ContentHash::Digest(digest),
                Err(e) => {
                    debug!(path = %self.path.display(), error = %e, "Content unreadable");
                    ContentHash::Unreadable
                }
            }
        })
    }

    #[must_use]
    pub fn is_hashed(&self) -> bool {
        self.content_hash.get().is_some()
    }
}
