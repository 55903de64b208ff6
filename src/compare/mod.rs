//! Directory scanning and per-file classification.
//!
//! A [`DirectoryScanner`] turns a tree into a map keyed by relative path,
//! [`compare`] pairs two such maps, and each [`ComparisonResult`] classifies
//! its pair into a [`Status`] on demand. Content hashes are only computed when
//! size and modification time cannot tell the files apart.

/// Scan orchestration and the pairing step
pub mod engine;
/// Per-file metadata and lazy content hash
pub mod record;
/// Pair classification
pub mod result;
/// Tree walking
pub mod scanner;
/// Text heuristic used for merge eligibility
pub mod text;

pub use engine::{ComparisonEngine, compare, tally};
pub use record::{ContentHash, FileRecord};
pub use result::{ComparisonResult, MERGE_MARKER, Side, Status};
pub use scanner::DirectoryScanner;
