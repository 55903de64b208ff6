use crate::output;
use anyhow::{Context, Result};
use colored::Colorize;
use std::collections::HashSet;
use std::path::Path;

/// Spots configuration keys dircmp does not know about.
pub struct ConfigValidator {
    known_fields: HashSet<&'static str>,
}

const KNOWN_FIELDS: &[&str] = &[
    "editor",
    "editor.command",
    "editor.split_view",
    "editor.split_flag",
    "editor.diff_flag",
    "merge",
    "merge.editor_diff",
    "merge.tools",
    "merge.scratch_dir",
    "scan",
    "scan.ignore_patterns",
];

const MERGE_TOOL_FIELDS: &[&str] = &["name", "command"];

impl ConfigValidator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            known_fields: KNOWN_FIELDS.iter().copied().collect(),
        }
    }

    /// Dotted paths of every key in `content` that has no meaning to dircmp.
    ///
    /// # Errors
    ///
    /// Returns an error if `content` is not valid TOML.
    pub fn unknown_fields(&self, content: &str) -> Result<Vec<String>> {
        let parsed: toml::Table = toml::from_str(content).context("Failed to parse TOML config")?;
        let mut unknown = Vec::new();
        self.check_table(&parsed, "", &mut unknown);
        Ok(unknown)
    }

    /// Prints a warning for each unknown key in the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn warn_unknown_fields(&self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        for field in self.unknown_fields(&content)? {
            output::warning(&format!("Unknown configuration field: {}", field.yellow()));
        }
        Ok(())
    }

    fn check_table(&self, table: &toml::Table, prefix: &str, unknown: &mut Vec<String>) {
        for (key, value) in table {
            let full_key = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };

            if !self.known_fields.contains(full_key.as_str()) {
                unknown.push(full_key);
                continue;
            }

            match value {
                toml::Value::Table(inner) => self.check_table(inner, &full_key, unknown),
                toml::Value::Array(items) if full_key == "merge.tools" => {
                    for (i, item) in items.iter().enumerate() {
                        let Some(tool) = item.as_table() else { continue };
                        unknown.extend(
                            tool.keys()
                                .filter(|k| !MERGE_TOOL_FIELDS.contains(&k.as_str()))
                                .map(|k| format!("{full_key}[{i}].{k}")),
                        );
                    }
                }
                _ => {}
            }
        }
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_fields_pass() -> Result<()> {
        let content = r#"
            [editor]
            command = "nvim"

            [merge]
            tools = [{ name = "meld", command = ["meld", "{left}", "{right}"] }]

            [scan]
            ignore_patterns = []
        "#;
        assert!(ConfigValidator::new().unknown_fields(content)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_unknown_fields_are_reported() -> Result<()> {
        let content = r#"
            colour = true

            [editor]
            comand = "nvim"

            [merge]
            tools = [{ name = "meld", command = ["meld"], gui = true }]
        "#;
        let mut unknown = ConfigValidator::new().unknown_fields(content)?;
        unknown.sort();
        assert_eq!(
            unknown,
            vec!["colour", "editor.comand", "merge.tools[0].gui"]
        );
        Ok(())
    }
}
