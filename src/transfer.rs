//! Single-file copies between the two trees.
//!
//! A copy is staged in a temporary file beside the destination, gets the source's
//! permissions and timestamps, and is then renamed into place. A failed copy never
//! leaves a partial destination behind.

use crate::compare::{ComparisonResult, FileRecord, Side};
use crate::utils::paths::ensure_parent_dirs;
use anyhow::{Context, Result};
use filetime::FileTime;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{Level, debug, info, span, warn};

/// Which way a file travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    LeftToRight,
    RightToLeft,
}

impl Direction {
    #[must_use]
    pub const fn source(self) -> Side {
        match self {
            Self::LeftToRight => Side::Left,
            Self::RightToLeft => Side::Right,
        }
    }

    #[must_use]
    pub const fn destination(self) -> Side {
        match self {
            Self::LeftToRight => Side::Right,
            Self::RightToLeft => Side::Left,
        }
    }

    #[must_use]
    pub const fn arrow(self) -> &'static str {
        match self {
            Self::LeftToRight => "left → right",
            Self::RightToLeft => "right → left",
        }
    }
}

/// A planned copy, detached from the result set so it can run on another thread.
#[derive(Debug, Clone)]
pub struct CopyJob {
    pub index: usize,
    pub key: OsString,
    pub relative_path: String,
    pub direction: Direction,
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// What a worker reports back after running a [`CopyJob`].
#[derive(Debug)]
pub struct CopyOutcome {
    pub job: CopyJob,
    /// Freshly stat'd destination record on success
    pub result: Result<FileRecord>,
}

impl CopyJob {
    /// Performs the copy and stats the destination.
    #[must_use]
    pub fn run(self) -> CopyOutcome {
        let span = span!(
            Level::DEBUG,
            "copy",
            path = %self.relative_path,
            direction = self.direction.arrow()
        );
        let _guard = span.enter();

        let result = copy_preserving(&self.source, &self.destination)
            .and_then(|()| FileRecord::stat(self.key.clone(), &self.destination));

        match &result {
            Ok(record) => info!(bytes = record.size(), "File copied"),
            Err(e) => warn!(error = %e, "Copy failed"),
        }

        CopyOutcome { job: self, result }
    }
}

impl CopyOutcome {
    /// Patches the destination record into `results`.
    ///
    /// Returns false if the copy failed or the entry at the job's index no longer
    /// has the job's path (the result set was rebuilt meanwhile).
    pub fn apply(self, results: &mut [ComparisonResult]) -> bool {
        let Ok(record) = self.result else {
            return false;
        };
        match results.get_mut(self.job.index) {
            Some(entry) if entry.key() == self.job.key.as_os_str() => {
                entry.replace(self.job.direction.destination(), record);
                true
            }
            _ => {
                debug!(path = %self.job.relative_path, "Result set changed, dropping patch");
                false
            }
        }
    }
}

/// Copies files between the left and right roots.
#[derive(Debug, Clone)]
pub struct TransferService {
    left_root: PathBuf,
    right_root: PathBuf,
}

impl TransferService {
    #[must_use]
    pub fn new(left_root: impl Into<PathBuf>, right_root: impl Into<PathBuf>) -> Self {
        Self {
            left_root: left_root.into(),
            right_root: right_root.into(),
        }
    }

    #[must_use]
    pub fn root(&self, side: Side) -> &Path {
        match side {
            Side::Left => &self.left_root,
            Side::Right => &self.right_root,
        }
    }

    /// Builds a job for `result`, or `None` if the source side has no file.
    ///
    /// The destination mirrors the source's path below its root byte for byte.
    #[must_use]
    pub fn plan(&self, index: usize, result: &ComparisonResult, direction: Direction) -> Option<CopyJob> {
        let source = result.existing(direction.source())?;
        let relative = source
            .path()
            .strip_prefix(self.root(direction.source()))
            .map_or_else(|_| PathBuf::from(result.key()), Path::to_path_buf);
        let destination = self.root(direction.destination()).join(relative);

        Some(CopyJob {
            index,
            key: result.key().to_os_string(),
            relative_path: result.relative_path().to_string(),
            direction,
            source: source.path().to_path_buf(),
            destination,
        })
    }

    /// Copies synchronously and patches `result` on success.
    pub fn copy(&self, result: &mut ComparisonResult, direction: Direction) -> bool {
        let Some(job) = self.plan(0, result, direction) else {
            return false;
        };
        match job.run().result {
            Ok(record) => {
                result.replace(direction.destination(), record);
                true
            }
            Err(_) => false,
        }
    }
}

/// Copies `source` to `destination` through a staged temporary file, keeping
/// permissions and access/modification times.
///
/// # Errors
///
/// Returns an error if the source cannot be read, the destination directory
/// cannot be created, or the staged file cannot be written or renamed.
pub fn copy_preserving(source: &Path, destination: &Path) -> Result<()> {
    let metadata = fs::metadata(source)
        .with_context(|| format!("Failed to stat {}", source.display()))?;

    ensure_parent_dirs(destination)?;
    let parent = destination
        .parent()
        .with_context(|| format!("No parent directory for {}", destination.display()))?;

    let mut reader =
        File::open(source).with_context(|| format!("Failed to open {}", source.display()))?;
    let mut staged = tempfile::Builder::new()
        .prefix(".dircmp-")
        .suffix(".part")
        .tempfile_in(parent)
        .with_context(|| format!("Failed to stage copy in {}", parent.display()))?;

    io::copy(&mut reader, staged.as_file_mut()).with_context(|| {
        format!(
            "Failed to copy {} to {}",
            source.display(),
            destination.display()
        )
    })?;
    staged.as_file().sync_all()?;

    fs::set_permissions(staged.path(), metadata.permissions())
        .with_context(|| format!("Failed to set permissions on {}", destination.display()))?;
    filetime::set_file_times(
        staged.path(),
        FileTime::from_last_access_time(&metadata),
        FileTime::from_last_modification_time(&metadata),
    )
    .with_context(|| format!("Failed to set times on {}", destination.display()))?;

    staged
        .persist(destination)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to move copy into {}", destination.display()))?;
    Ok(())
}
