//! External editor and merge programs.
//!
//! The controller only sees the [`ExternalTools`] trait; [`ProcessTools`] is the
//! implementation that actually spawns processes. Tests substitute a recorder.

/// Editor resolution and invocation planning
pub mod editor;
/// Merge candidate ordering
pub mod merge;
/// Foreground process execution
pub mod process;
/// Manual merge documents
pub mod scratch;

use crate::config::{Config, EditorConfig, MergeConfig};
use anyhow::{Result, bail};
use editor::EditorCommand;
use std::path::{Path, PathBuf};
use tracing::{Level, debug, info, span, warn};

/// Which file(s) of a pair an edit command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Left,
    Right,
    Both,
}

impl EditTarget {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Both => "both",
        }
    }
}

/// Launches programs that need the terminal.
///
/// Callers release the terminal before calling any method that runs a process.
pub trait ExternalTools {
    /// Opens `files` in the editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor is missing or any invocation fails.
    fn edit(&mut self, files: &[PathBuf]) -> Result<()>;

    /// Runs the first merge program that succeeds, falling back to editing both
    /// files. Returns the name of what ran.
    ///
    /// # Errors
    ///
    /// Returns an error only if every candidate and the fallback failed.
    fn merge(&mut self, left: &Path, right: &Path) -> Result<String>;

    /// Writes a manual merge document and returns its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    fn write_merge_scratch(&mut self, relative_path: &str, left: &Path, right: &Path)
    -> Result<PathBuf>;
}

/// [`ExternalTools`] backed by real processes.
#[derive(Debug, Clone)]
pub struct ProcessTools {
    editor: EditorConfig,
    merge: MergeConfig,
    scratch_dir: PathBuf,
}

impl ProcessTools {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            editor: config.editor.clone(),
            merge: config.merge.clone(),
            scratch_dir: config
                .merge
                .scratch_dir
                .clone()
                .unwrap_or_else(std::env::temp_dir),
        }
    }

    #[must_use]
    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// Merge programs that would be tried, for the help screen.
    #[must_use]
    pub fn merge_tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        if self.merge.editor_diff
            && let Ok(editor) = EditorCommand::resolve(&self.editor)
            && editor.supports_split_view()
        {
            names.push(format!("{} diff", editor.program()));
        }
        names.extend(self.merge.tools.iter().map(|t| t.name.clone()));
        names
    }
}

impl ExternalTools for ProcessTools {
    fn edit(&mut self, files: &[PathBuf]) -> Result<()> {
        let span = span!(Level::INFO, "edit", files = files.len());
        let _guard = span.enter();

        if files.is_empty() {
            bail!("No files to edit");
        }
        let editor = EditorCommand::resolve(&self.editor)?;
        for invocation in editor.edit_invocations(files) {
            invocation.run()?;
        }
        Ok(())
    }

    fn merge(&mut self, left: &Path, right: &Path) -> Result<String> {
        let span = span!(Level::INFO, "merge", left = %left.display(), right = %right.display());
        let _guard = span.enter();

        let editor = EditorCommand::resolve(&self.editor)
            .inspect_err(|e| warn!(error = %e, "Editor unusable, trying merge tools only"))
            .ok();
        for candidate in merge::candidates(editor.as_ref(), &self.merge, left, right) {
            if !candidate.invocation.is_available() {
                debug!(tool = %candidate.name, "Merge tool not installed");
                continue;
            }
            match candidate.invocation.run() {
                Ok(()) => {
                    info!(tool = %candidate.name, "Merge tool succeeded");
                    return Ok(candidate.name);
                }
                Err(e) => warn!(tool = %candidate.name, error = %e, "Merge tool failed"),
            }
        }

        let Some(editor) = editor else {
            bail!("No merge tool succeeded and no usable editor");
        };
        debug!("No merge tool succeeded, editing both files");
        self.edit(&[left.to_path_buf(), right.to_path_buf()])?;
        Ok(editor.program().to_string())
    }

    fn write_merge_scratch(
        &mut self,
        relative_path: &str,
        left: &Path,
        right: &Path,
    ) -> Result<PathBuf> {
        scratch::write_merge_file(&self.scratch_dir, relative_path, left, right)
    }
}
