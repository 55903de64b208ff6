//! Command-line interface definition.
//!
//! Shared between the binary and the xtask man page generator.

#![allow(missing_docs)]

use clap::Parser;
use std::path::PathBuf;

/// Compare two directory trees and reconcile them interactively.
#[derive(Parser, Debug)]
#[command(
    name = "dircmp",
    version = crate::VERSION,
    about = "Compare two directories file by file",
    long_about = "Compare two directory trees, classify each file, and copy, edit or merge \
                  differences from an interactive terminal list"
)]
pub struct Cli {
    /// Left directory to compare
    pub left_dir: PathBuf,

    /// Right directory to compare
    pub right_dir: PathBuf,

    /// Print a comparison summary before starting and log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file (default: ~/.config/dircmp/config.toml)
    #[arg(long, env = "DIRCMP_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_positional_and_flags() {
        let cli = Cli::try_parse_from(["dircmp", "a", "b", "-v", "--config", "c.toml"]).unwrap();
        assert_eq!(cli.left_dir, PathBuf::from("a"));
        assert_eq!(cli.right_dir, PathBuf::from("b"));
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
    }

    #[test]
    fn test_both_directories_required() {
        assert!(Cli::try_parse_from(["dircmp", "only-one"]).is_err());
    }
}
