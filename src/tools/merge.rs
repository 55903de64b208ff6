use super::editor::EditorCommand;
use super::process::Invocation;
use crate::config::{MergeConfig, MergeTool};
use std::ffi::OsString;
use std::path::Path;

/// A merge program ready to run on one file pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeCandidate {
    pub name: String,
    pub invocation: Invocation,
}

/// Fills `{left}` and `{right}` in a tool's argument template.
///
/// Arguments that are exactly a placeholder receive the path unchanged; embedded
/// placeholders are substituted textually.
#[must_use]
pub fn instantiate(tool: &MergeTool, left: &Path, right: &Path) -> Option<Invocation> {
    let (program, template) = tool.command.split_first()?;
    let args = template.iter().map(|arg| match arg.as_str() {
        "{left}" => left.as_os_str().to_owned(),
        "{right}" => right.as_os_str().to_owned(),
        other => OsString::from(
            other
                .replace("{left}", &left.to_string_lossy())
                .replace("{right}", &right.to_string_lossy()),
        ),
    });
    Some(Invocation::new(program.clone(), args))
}

/// Merge programs in the order they should be tried.
///
/// The editor's diff mode comes first when enabled and supported, followed by the
/// configured tools. Without an editor only the configured tools are listed.
#[must_use]
pub fn candidates(
    editor: Option<&EditorCommand>,
    config: &MergeConfig,
    left: &Path,
    right: &Path,
) -> Vec<MergeCandidate> {
    let editor_diff = editor
        .filter(|_| config.editor_diff)
        .and_then(|editor| {
            editor
                .diff_invocation(left, right)
                .map(|invocation| MergeCandidate {
                    name: format!("{} diff", editor.program()),
                    invocation,
                })
        });

    editor_diff
        .into_iter()
        .chain(config.tools.iter().filter_map(|tool| {
            instantiate(tool, left, right).map(|invocation| MergeCandidate {
                name: tool.name.clone(),
                invocation,
            })
        }))
        .collect()
}
