use super::record::FileRecord;
use super::text::is_text_file;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

/// Marker appended to a status symbol when the pair can be merged.
pub const MERGE_MARKER: &str = "[M]";

/// Modification times further apart than this many seconds differ.
pub const TIME_TOLERANCE_SECS: i64 = 1;

/// Classification of one relative path across the two trees.
///
/// Declaration order is the classification order: the first matching rule wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    OnlyRight,
    OnlyLeft,
    DifferentSize,
    DifferentTime,
    Unreadable,
    DifferentContent,
    Identical,
}

impl Status {
    pub const ALL: [Self; 7] = [
        Self::OnlyRight,
        Self::OnlyLeft,
        Self::DifferentSize,
        Self::DifferentTime,
        Self::Unreadable,
        Self::DifferentContent,
        Self::Identical,
    ];

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::OnlyRight => "<<<",
            Self::OnlyLeft => ">>>",
            Self::DifferentSize => "!=",
            Self::DifferentTime => "~=",
            Self::Unreadable => "??",
            Self::DifferentContent => "<>",
            Self::Identical => "==",
        }
    }

    /// Short column label shown in the status column of the file list.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OnlyRight => "<<<",
            Self::OnlyLeft => ">>>",
            Self::DifferentSize => "SIZE",
            Self::DifferentTime => "TIME",
            Self::Unreadable => "READ?",
            Self::DifferentContent => "DIFF",
            Self::Identical => "SAME",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::OnlyRight => "ONLY_RIGHT",
            Self::OnlyLeft => "ONLY_LEFT",
            Self::DifferentSize => "DIFFERENT_SIZE",
            Self::DifferentTime => "DIFFERENT_TIME",
            Self::Unreadable => "UNREADABLE",
            Self::DifferentContent => "DIFFERENT_CONTENT",
            Self::Identical => "IDENTICAL",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::OnlyRight => "File only exists on right",
            Self::OnlyLeft => "File only exists on left",
            Self::DifferentSize => "Files have different sizes",
            Self::DifferentTime => "Files have different modification times",
            Self::Unreadable => "Content could not be read",
            Self::DifferentContent => "Files have different content",
            Self::Identical => "Files are identical",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One of the two compared trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Pairing of the left and right record for one relative path.
#[derive(Debug, Clone)]
pub struct ComparisonResult {
    key: OsString,
    relative_path: String,
    left: Option<FileRecord>,
    right: Option<FileRecord>,
    merge_hint: OnceLock<bool>,
}

impl ComparisonResult {
    /// Pairs two records. Returns `None` unless at least one side exists on disk.
    ///
    /// The key is taken from the left record if it exists, else the right.
    #[must_use]
    pub fn new(left: Option<FileRecord>, right: Option<FileRecord>) -> Option<Self> {
        let anchor = left
            .as_ref()
            .filter(|r| r.exists())
            .or_else(|| right.as_ref().filter(|r| r.exists()))?;
        let key = anchor.key().to_os_string();
        let relative_path = anchor.relative_path().to_string();
        Some(Self {
            key,
            relative_path,
            left,
            right,
            merge_hint: OnceLock::new(),
        })
    }

    /// Exact relative path shared by both records.
    #[must_use]
    pub fn key(&self) -> &OsStr {
        &self.key
    }

    /// Display form of [`key`](Self::key).
    #[must_use]
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    #[must_use]
    pub const fn left(&self) -> Option<&FileRecord> {
        self.left.as_ref()
    }

    #[must_use]
    pub const fn right(&self) -> Option<&FileRecord> {
        self.right.as_ref()
    }

    #[must_use]
    pub const fn record(&self, side: Side) -> Option<&FileRecord> {
        match side {
            Side::Left => self.left.as_ref(),
            Side::Right => self.right.as_ref(),
        }
    }

    /// The record on `side`, only if the file actually exists.
    #[must_use]
    pub fn existing(&self, side: Side) -> Option<&FileRecord> {
        self.record(side).filter(|r| r.exists())
    }

    /// Swaps in a new record for `side` and drops the cached merge eligibility.
    pub fn replace(&mut self, side: Side, record: FileRecord) {
        match side {
            Side::Left => self.left = Some(record),
            Side::Right => self.right = Some(record),
        }
        self.merge_hint = OnceLock::new();
    }

    /// Classifies the pair. Content is only hashed when size and time agree.
    pub fn status(&self) -> Status {
        let Some(left) = self.existing(Side::Left) else {
            return Status::OnlyRight;
        };
        let Some(right) = self.existing(Side::Right) else {
            return Status::OnlyLeft;
        };
        if left.size() != right.size() {
            return Status::DifferentSize;
        }
        if (left.modified_at() - right.modified_at()).abs() > TIME_TOLERANCE_SECS {
            return Status::DifferentTime;
        }

        let left_hash = left.content_hash();
        let right_hash = right.content_hash();
        if left_hash.is_unreadable() || right_hash.is_unreadable() {
            return Status::Unreadable;
        }
        if left_hash != right_hash {
            return Status::DifferentContent;
        }
        Status::Identical
    }

    /// True if both files exist, differ, and both look like text.
    ///
    /// Computed once per record pair; any read error makes the pair unmergeable.
    pub fn can_merge(&self) -> bool {
        *self.merge_hint.get_or_init(|| {
            let (Some(left), Some(right)) = (self.existing(Side::Left), self.existing(Side::Right))
            else {
                return false;
            };
            if self.status() == Status::Identical {
                return false;
            }
            match (is_text_file(left.path()), is_text_file(right.path())) {
                (Ok(l), Ok(r)) => l && r,
                (Err(e), _) | (_, Err(e)) => {
                    debug!(path = %self.relative_path, error = %e, "Merge check failed");
                    false
                }
            }
        })
    }

    /// Status symbol with the merge marker appended when applicable.
    pub fn display_symbol(&self) -> String {
        let symbol = self.status().symbol();
        if self.can_merge() {
            format!("{symbol}{MERGE_MARKER}")
        } else {
            symbol.to_string()
        }
    }
}
