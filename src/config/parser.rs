use super::Config;
use anyhow::{Context, Result, bail};
use std::path::Path;

/// Reads and validates a config file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid TOML, or fails
/// validation.
pub fn parse_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config_str(&content)
        .with_context(|| format!("Invalid config file: {}", path.display()))
}

/// Parses and validates config text.
///
/// # Errors
///
/// Returns an error if the text is not valid TOML or fails validation.
pub fn parse_config_str(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).context("Failed to parse TOML config")?;

    validate_config(&config)?;
    Ok(config)
}

/// Checks values serde cannot express constraints for.
///
/// # Errors
///
/// Returns an error describing the first invalid value.
pub fn validate_config(config: &Config) -> Result<()> {
    let editor = config.editor.command.trim();
    if editor.is_empty() {
        bail!("Editor command cannot be empty");
    }
    match shell_words::split(editor) {
        Ok(words) if !words.is_empty() => {}
        Ok(_) => bail!("Editor command cannot be empty"),
        Err(e) => bail!("Invalid editor command '{editor}': {e}"),
    }

    for tool in &config.merge.tools {
        if tool.command.first().is_none_or(|program| program.trim().is_empty()) {
            bail!("Merge tool '{}' has an empty command", tool.name);
        }
        let mentions = |placeholder: &str| tool.command.iter().any(|arg| arg.contains(placeholder));
        if !mentions("{left}") || !mentions("{right}") {
            bail!(
                "Merge tool '{}' must reference both {{left}} and {{right}}",
                tool.name
            );
        }
    }

    Ok(())
}
