use super::record::FileRecord;
use super::result::{ComparisonResult, Status};
use super::scanner::DirectoryScanner;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{Level, info, span};

/// Merges two scans into one result per distinct relative path, sorted by the
/// path's bytes.
#[must_use]
pub fn compare(
    mut left: BTreeMap<OsString, FileRecord>,
    mut right: BTreeMap<OsString, FileRecord>,
) -> Vec<ComparisonResult> {
    let keys: BTreeSet<OsString> = left.keys().chain(right.keys()).cloned().collect();

    keys.into_iter()
        .filter_map(|key| ComparisonResult::new(left.remove(&key), right.remove(&key)))
        .collect()
}

/// Counts results per status, classifying in parallel.
///
/// Classification may hash file contents, which are then cached on the records.
#[must_use]
pub fn tally(results: &[ComparisonResult]) -> BTreeMap<Status, usize> {
    results
        .par_iter()
        .map(ComparisonResult::status)
        .fold(BTreeMap::new, |mut counts, status| {
            *counts.entry(status).or_insert(0) += 1;
            counts
        })
        .reduce(BTreeMap::new, |mut a, b| {
            for (status, n) in b {
                *a.entry(status).or_insert(0) += n;
            }
            a
        })
}

/// Scans the two roots and produces the ordered result set.
#[derive(Debug, Clone)]
pub struct ComparisonEngine {
    left_root: PathBuf,
    right_root: PathBuf,
    scanner: DirectoryScanner,
}

impl ComparisonEngine {
    #[must_use]
    pub fn new(left_root: impl Into<PathBuf>, right_root: impl Into<PathBuf>, scanner: DirectoryScanner) -> Self {
        Self {
            left_root: left_root.into(),
            right_root: right_root.into(),
            scanner,
        }
    }

    #[must_use]
    pub fn left_root(&self) -> &Path {
        &self.left_root
    }

    #[must_use]
    pub fn right_root(&self) -> &Path {
        &self.right_root
    }

    /// Scans both trees concurrently and compares them.
    #[must_use]
    pub fn run(&self) -> Vec<ComparisonResult> {
        let span = span!(
            Level::INFO,
            "compare",
            left = %self.left_root.display(),
            right = %self.right_root.display()
        );
        let _guard = span.enter();

        let (left, right) = rayon::join(
            || self.scanner.scan(&self.left_root),
            || self.scanner.scan(&self.right_root),
        );
        let (left_count, right_count) = (left.len(), right.len());
        let results = compare(left, right);

        info!(
            left_files = left_count,
            right_files = right_count,
            results = results.len(),
            "Comparison built"
        );
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::record::ContentHash;

    fn map(entries: &[(&str, u64)]) -> BTreeMap<OsString, FileRecord> {
        entries
            .iter()
            .map(|(key, size)| {
                let record = FileRecord::new(*key, format!("/nowhere/{key}"), *size, 0)
                    .with_content_hash(ContentHash::Digest(format!("{size}")));
                (OsString::from(*key), record)
            })
            .collect()
    }

    #[test]
    fn test_compare_union_is_sorted() {
        let left = map(&[("b.txt", 1), ("a.txt", 1), ("sub/c", 2)]);
        let right = map(&[("a.txt", 1), ("z.txt", 3), ("sub/c", 5)]);

        let results = compare(left, right);
        let paths: Vec<_> = results.iter().map(ComparisonResult::relative_path).collect();
        assert_eq!(paths, vec!["a.txt", "b.txt", "sub/c", "z.txt"]);

        let statuses: Vec<_> = results.iter().map(ComparisonResult::status).collect();
        assert_eq!(
            statuses,
            vec![
                Status::Identical,
                Status::OnlyLeft,
                Status::DifferentSize,
                Status::OnlyRight
            ]
        );
    }

    #[test]
    fn test_compare_empty() {
        assert!(compare(BTreeMap::new(), BTreeMap::new()).is_empty());
    }

    #[test]
    fn test_byte_order_sorting() {
        let left = map(&[("a", 1), ("B", 1), ("_", 1)]);
        let results = compare(left, BTreeMap::new());
        let paths: Vec<_> = results.iter().map(ComparisonResult::relative_path).collect();
        assert_eq!(paths, vec!["B", "_", "a"]);
    }

    #[test]
    fn test_tally() {
        let left = map(&[("a", 1), ("b", 1), ("c", 1)]);
        let right = map(&[("a", 1), ("b", 2), ("d", 1)]);
        let counts = tally(&compare(left, right));

        assert_eq!(counts.get(&Status::Identical), Some(&1));
        assert_eq!(counts.get(&Status::DifferentSize), Some(&1));
        assert_eq!(counts.get(&Status::OnlyLeft), Some(&1));
        assert_eq!(counts.get(&Status::OnlyRight), Some(&1));
        assert_eq!(counts.values().sum::<usize>(), 4);
    }
}
