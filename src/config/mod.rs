//! TOML configuration.
//!
//! Looked up from an explicit path (`--config` or `DIRCMP_CONFIG`), falling back
//! to `~/.config/dircmp/config.toml`. Every section and key is optional.

pub mod parser;
pub mod validator;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub editor: EditorConfig,

    #[serde(default)]
    pub merge: MergeConfig,

    #[serde(default)]
    pub scan: ScanConfig,
}

/// Editor used for edit, merge fallback and manual merge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EditorConfig {
    /// Used when `EDITOR` is unset
    #[serde(default = "default_editor_command")]
    pub command: String,
    /// Program names that can show two files side by side
    #[serde(default = "default_split_view")]
    pub split_view: Vec<String>,
    #[serde(default = "default_split_flag")]
    pub split_flag: String,
    #[serde(default = "default_diff_flag")]
    pub diff_flag: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MergeConfig {
    /// Try the editor in diff mode before the external tools
    #[serde(default = "default_editor_diff")]
    pub editor_diff: bool,
    /// Tried in order after the editor
    #[serde(default = "default_merge_tools")]
    pub tools: Vec<MergeTool>,
    /// Where manual merge files are written; system temp dir when unset
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
}

/// An external merge program.
///
/// `command` is an argument template; `{left}` and `{right}` are replaced by the
/// two file paths.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MergeTool {
    pub name: String,
    pub command: Vec<String>,
}

impl MergeTool {
    #[must_use]
    pub fn new(name: &str, command: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            command: command.iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ScanConfig {
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            command: default_editor_command(),
            split_view: default_split_view(),
            split_flag: default_split_flag(),
            diff_flag: default_diff_flag(),
        }
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            editor_diff: default_editor_diff(),
            tools: default_merge_tools(),
            scratch_dir: None,
        }
    }
}

impl Config {
    /// Default location, `~/.config/dircmp/config.toml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("dircmp").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default location is used
    /// if present, and built-in defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An explicitly given file does not exist
    /// - The file cannot be read or is not valid TOML
    /// - A value fails validation
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            return Self::load_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load_file(&path),
            _ => {
                debug!("No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn load_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Loading config");
        let config = parser::parse_config_file(path)?;
        validator::ConfigValidator::new().warn_unknown_fields(path)?;
        Ok(config)
    }
}

// Default functions for serde
fn default_editor_command() -> String {
    "vim".to_string()
}

fn default_split_view() -> Vec<String> {
    vec!["vim".to_string(), "nvim".to_string()]
}

fn default_split_flag() -> String {
    "-O".to_string()
}

fn default_diff_flag() -> String {
    "-d".to_string()
}

const fn default_editor_diff() -> bool {
    true
}

fn default_merge_tools() -> Vec<MergeTool> {
    vec![
        MergeTool::new("meld", &["meld", "{left}", "{right}"]),
        MergeTool::new("diff3", &["diff3", "-m", "{left}", "{left}", "{right}"]),
        MergeTool::new("merge", &["merge", "{left}", "{left}", "{right}"]),
    ]
}
