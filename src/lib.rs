//! # dircmp
//!
//! Compares two directory trees file by file and lets the user reconcile the
//! differences from an interactive terminal list.
//!
//! ## Architecture
//!
//! - [`compare`]: tree scanning, pairing and per-file classification
//! - [`controller`]: selection, scrolling and command dispatch
//! - [`transfer`]: single-file copies between the trees
//! - [`tools`]: external editor and merge programs
//! - [`ui`]: terminal session, key bindings and layout
//! - [`config`]: TOML configuration
//! - [`output`]: console messages outside the interactive screen
//!
//! ## Example Usage
//!
//! ```no_run
//! use dircmp::CompareContext;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let ctx = CompareContext::new(Path::new("backup"), Path::new("live"), None)?;
//! for result in ctx.engine().run() {
//!     println!("{} {}", result.display_symbol(), result.relative_path());
//! }
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions.
pub mod cli;

/// Scanning and classification.
pub mod compare;

/// Configuration parsing and validation.
pub mod config;

/// Navigation state and command dispatch.
pub mod controller;

/// Log file setup.
pub mod logging;

/// Console output.
pub mod output;

/// External editor and merge programs.
pub mod tools;

/// Copying files between the trees.
pub mod transfer;

/// Terminal user interface.
pub mod ui;

/// Utility functions and helpers.
pub mod utils;

use anyhow::{Context, Result, bail};
use compare::{ComparisonEngine, DirectoryScanner};
use controller::NavigationController;
use std::path::{Path, PathBuf};
use tools::ProcessTools;
use transfer::TransferService;

/// Current version of the dircmp binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Checks that both roots exist and are directories.
///
/// # Errors
///
/// Returns an error naming the first root that is missing or not a directory.
pub fn validate_roots(left: &Path, right: &Path) -> Result<()> {
    if !left.exists() {
        bail!("Left directory '{}' does not exist", left.display());
    }
    if !right.exists() {
        bail!("Right directory '{}' does not exist", right.display());
    }
    for root in [left, right] {
        if !root.is_dir() {
            bail!("'{}' is not a directory", root.display());
        }
    }
    Ok(())
}

/// Validated roots plus loaded configuration for one comparison session.
#[derive(Debug, Clone)]
pub struct CompareContext {
    /// Absolute path of the left tree.
    pub left_root: PathBuf,

    /// Absolute path of the right tree.
    pub right_root: PathBuf,

    /// Loaded configuration settings.
    pub config: config::Config,
}

impl CompareContext {
    /// Validates the roots and loads the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a root is missing or not a directory, or if the
    /// configuration cannot be loaded.
    pub fn new(left: &Path, right: &Path, config_path: Option<&Path>) -> Result<Self> {
        validate_roots(left, right)?;
        let config = config::Config::load(config_path)?;
        Self::with_config(left, right, config)
    }

    /// Like [`CompareContext::new`] with an already loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a root is missing or cannot be resolved.
    pub fn with_config(left: &Path, right: &Path, config: config::Config) -> Result<Self> {
        validate_roots(left, right)?;
        let resolve = |p: &Path| {
            p.canonicalize()
                .with_context(|| format!("Failed to resolve {}", p.display()))
        };
        Ok(Self {
            left_root: resolve(left)?,
            right_root: resolve(right)?,
            config,
        })
    }

    #[must_use]
    pub fn engine(&self) -> ComparisonEngine {
        let scanner = DirectoryScanner::new(self.config.scan.ignore_patterns.clone());
        ComparisonEngine::new(&self.left_root, &self.right_root, scanner)
    }

    #[must_use]
    pub fn transfer(&self) -> TransferService {
        TransferService::new(&self.left_root, &self.right_root)
    }

    /// Scans both trees and wires the controller to real processes.
    #[must_use]
    pub fn controller(&self) -> NavigationController<ProcessTools> {
        NavigationController::new(
            self.engine(),
            self.transfer(),
            ProcessTools::new(&self.config),
        )
    }
}
