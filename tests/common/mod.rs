#![allow(dead_code)]

use anyhow::{Result, bail};
use dircmp::compare::{ComparisonEngine, DirectoryScanner};
use dircmp::controller::NavigationController;
use dircmp::tools::ExternalTools;
use dircmp::transfer::TransferService;
use dircmp::ui::terminal::Screen;
use filetime::FileTime;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Fixed modification time so size/time checks never trip by accident.
pub const BASE_TIME: i64 = 1_700_000_000;

/// A left and a right tree inside one temporary directory.
pub struct TwoTrees {
    pub temp_dir: TempDir,
    pub left: PathBuf,
    pub right: PathBuf,
}

impl TwoTrees {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let left = temp_dir.path().join("left");
        let right = temp_dir.path().join("right");
        fs::create_dir_all(&left)?;
        fs::create_dir_all(&right)?;
        Ok(Self {
            temp_dir,
            left,
            right,
        })
    }

    fn write(root: &Path, rel: &Path, content: &[u8], mtime: i64) -> Result<PathBuf> {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        filetime::set_file_mtime(&path, FileTime::from_unix_time(mtime, 0))?;
        Ok(path)
    }

    pub fn write_left(&self, rel: impl AsRef<Path>, content: &[u8]) -> Result<PathBuf> {
        Self::write(&self.left, rel.as_ref(), content, BASE_TIME)
    }

    pub fn write_right(&self, rel: impl AsRef<Path>, content: &[u8]) -> Result<PathBuf> {
        Self::write(&self.right, rel.as_ref(), content, BASE_TIME)
    }

    /// Same relative path on both sides.
    pub fn write_both(&self, rel: impl AsRef<Path>, left: &[u8], right: &[u8]) -> Result<()> {
        self.write_left(rel.as_ref(), left)?;
        self.write_right(rel.as_ref(), right)?;
        Ok(())
    }

    pub fn engine(&self) -> ComparisonEngine {
        ComparisonEngine::new(&self.left, &self.right, DirectoryScanner::default())
    }

    pub fn transfer(&self) -> TransferService {
        TransferService::new(&self.left, &self.right)
    }

    pub fn controller(&self, tools: RecordingTools) -> NavigationController<RecordingTools> {
        NavigationController::new(self.engine(), self.transfer(), tools)
    }
}

pub fn set_mtime(path: &Path, secs: i64) -> Result<()> {
    filetime::set_file_mtime(path, FileTime::from_unix_time(secs, 0))?;
    Ok(())
}

/// One call made to [`RecordingTools`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    Edit(Vec<PathBuf>),
    Merge(PathBuf, PathBuf),
    Scratch(String),
}

type EditHook = Box<dyn FnMut(&[PathBuf])>;

/// Records every call instead of spawning processes.
#[derive(Default)]
pub struct RecordingTools {
    pub calls: Vec<ToolCall>,
    pub fail_edit: bool,
    pub fail_merge: bool,
    pub scratch_dir: Option<PathBuf>,
    pub on_edit: Option<EditHook>,
}

impl RecordingTools {
    pub fn failing_edit() -> Self {
        Self {
            fail_edit: true,
            ..Self::default()
        }
    }
}

impl ExternalTools for RecordingTools {
    fn edit(&mut self, files: &[PathBuf]) -> Result<()> {
        self.calls.push(ToolCall::Edit(files.to_vec()));
        if let Some(hook) = self.on_edit.as_mut() {
            hook(files);
        }
        if self.fail_edit {
            bail!("editor exited with 1");
        }
        Ok(())
    }

    fn merge(&mut self, left: &Path, right: &Path) -> Result<String> {
        self.calls
            .push(ToolCall::Merge(left.to_path_buf(), right.to_path_buf()));
        if self.fail_merge {
            bail!("no merge tool");
        }
        Ok("recorder".to_string())
    }

    fn write_merge_scratch(&mut self, relative_path: &str, left: &Path, right: &Path) -> Result<PathBuf> {
        self.calls.push(ToolCall::Scratch(relative_path.to_string()));
        let Some(dir) = &self.scratch_dir else {
            bail!("no scratch dir");
        };
        dircmp::tools::scratch::write_merge_file(dir, relative_path, left, right)
    }
}

/// Counts terminal hand-offs.
#[derive(Debug, Default)]
pub struct FakeScreen {
    pub released: usize,
    pub reacquired: usize,
}

impl Screen for FakeScreen {
    fn release(&mut self) -> Result<()> {
        self.released += 1;
        Ok(())
    }

    fn reacquire(&mut self) -> Result<()> {
        self.reacquired += 1;
        Ok(())
    }
}
