use anyhow::{Context, Result, bail};
use std::ffi::OsString;
use std::fmt;
use std::process::Command;
use tracing::{Level, debug, info, span};
use which::which;

/// A program plus arguments, run in the foreground with the terminal inherited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<OsString>,
}

impl Invocation {
    #[must_use]
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// True if the program can be found on `PATH` (or is a usable path itself).
    #[must_use]
    pub fn is_available(&self) -> bool {
        which(&self.program).is_ok()
    }

    /// Runs the program and waits for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the program is not found, cannot be spawned, or exits
    /// with a non-zero status.
    pub fn run(&self) -> Result<()> {
        let span = span!(Level::DEBUG, "run_tool", program = %self.program);
        let _guard = span.enter();

        let resolved = which(&self.program)
            .with_context(|| format!("Program '{}' not found in PATH", self.program))?;

        debug!(path = %resolved.display(), args = ?self.args, "Spawning process");

        let status = Command::new(&resolved)
            .args(&self.args)
            .status()
            .with_context(|| format!("Failed to spawn {}", self.program))?;

        if !status.success() {
            bail!("{} exited with {status}", self.program);
        }

        info!(program = %self.program, "Process finished");
        Ok(())
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}
