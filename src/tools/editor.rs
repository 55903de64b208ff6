use super::process::Invocation;
use crate::config::EditorConfig;
use anyhow::{Context, Result, bail};
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{Level, debug, span};

/// The user's editor, parsed into program and leading arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorCommand {
    program: String,
    args: Vec<String>,
    split_view: bool,
    split_flag: String,
    diff_flag: String,
}

impl EditorCommand {
    /// Uses `EDITOR` when set and non-blank, else the configured command.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen command is empty or has invalid quoting.
    pub fn resolve(config: &EditorConfig) -> Result<Self> {
        match env::var("EDITOR") {
            Ok(editor) if !editor.trim().is_empty() => Self::parse(&editor, config),
            _ => Self::parse(&config.command, config),
        }
    }

    /// Parses a shell-style command line such as `code --wait`.
    ///
    /// # Errors
    ///
    /// Returns an error if the command is empty or has invalid quoting.
    pub fn parse(cmd: &str, config: &EditorConfig) -> Result<Self> {
        let span = span!(Level::DEBUG, "parse_editor_command", cmd);
        let _guard = span.enter();

        let mut parts =
            shell_words::split(cmd).with_context(|| format!("Invalid editor command: '{cmd}'"))?;
        if parts.is_empty() {
            bail!("Empty editor command");
        }
        let program = parts.remove(0);

        let base = Path::new(&program)
            .file_name()
            .map_or_else(|| program.clone(), |n| n.to_string_lossy().into_owned());
        let split_view = config.split_view.iter().any(|name| *name == base);

        debug!(program = %program, args = ?parts, split_view, "Editor command parsed");

        Ok(Self {
            program,
            args: parts,
            split_view,
            split_flag: config.split_flag.clone(),
            diff_flag: config.diff_flag.clone(),
        })
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Whether the editor can show two files side by side.
    #[must_use]
    pub const fn supports_split_view(&self) -> bool {
        self.split_view
    }

    fn invocation<I>(&self, extra: I) -> Invocation
    where
        I: IntoIterator<Item = OsString>,
    {
        let args = self.args.iter().map(OsString::from).chain(extra);
        Invocation::new(self.program.clone(), args)
    }

    /// Invocations needed to edit `files`.
    ///
    /// Several files go to a split-view editor in one invocation with the split
    /// flag; any other editor gets one invocation per file, in order.
    #[must_use]
    pub fn edit_invocations(&self, files: &[PathBuf]) -> Vec<Invocation> {
        if files.len() > 1 && self.split_view {
            let extra = std::iter::once(OsString::from(&self.split_flag))
                .chain(files.iter().map(|f| f.as_os_str().to_owned()));
            return vec![self.invocation(extra)];
        }
        files
            .iter()
            .map(|f| self.invocation([f.as_os_str().to_owned()]))
            .collect()
    }

    /// The editor in diff mode, if it supports split view.
    #[must_use]
    pub fn diff_invocation(&self, left: &Path, right: &Path) -> Option<Invocation> {
        self.split_view.then(|| {
            self.invocation([
                OsString::from(&self.diff_flag),
                left.as_os_str().to_owned(),
                right.as_os_str().to_owned(),
            ])
        })
    }
}
