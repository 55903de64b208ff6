//! Console messages printed before and after the interactive screen.
//!
//! The terminal belongs to the UI while it runs, so these are only used for the
//! startup notice, the verbose summary, config warnings and the final error.

use crate::compare::Status;
use colored::{Color, Colorize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU8, Ordering};

/// Verbosity level for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Default verbosity level, show all standard messages.
    Normal = 1,
    /// Also show the comparison summary and other details.
    Verbose = 2,
}

/// Global verbosity setting (default: Normal).
static VERBOSITY: AtomicU8 = AtomicU8::new(1);

/// Sets the global verbosity level for all output functions.
pub fn set_verbosity(level: Verbosity) {
    VERBOSITY.store(level as u8, Ordering::Relaxed);
}

/// Gets the current global verbosity level.
pub fn get_verbosity() -> Verbosity {
    match VERBOSITY.load(Ordering::Relaxed) {
        2 => Verbosity::Verbose,
        _ => Verbosity::Normal,
    }
}

/// Prints an error message in bold red (always shown).
pub fn error(message: &str) {
    eprintln!("{}", message.red().bold());
}

/// Prints a warning message in bold yellow (always shown).
pub fn warning(message: &str) {
    eprintln!("{}", message.yellow().bold());
}

/// Prints an informational message.
pub fn info(message: &str) {
    eprintln!("{message}");
}

/// Prints a dimmed message (only in verbose mode).
pub fn verbose(message: &str) {
    if get_verbosity() != Verbosity::Verbose {
        return;
    }
    eprintln!("{}", message.dimmed());
}

/// Console color for a status, matching the list colors in the UI.
#[must_use]
pub const fn status_color(status: Status) -> Color {
    match status {
        Status::OnlyLeft => Color::Red,
        Status::OnlyRight => Color::Green,
        Status::DifferentSize | Status::DifferentTime | Status::DifferentContent => {
            Color::Magenta
        }
        Status::Unreadable => Color::Yellow,
        Status::Identical => Color::Cyan,
    }
}

/// One line per status with a non-zero count, in classification order.
#[must_use]
pub fn summary_lines(total: usize, counts: &BTreeMap<Status, usize>) -> Vec<String> {
    let mut lines = vec![format!("Found {total} files to compare")];
    lines.extend(counts.iter().filter(|&(_, &n)| n > 0).map(|(status, n)| {
        format!(
            "  {} {:<18} {n}",
            format!("{:<4}", status.symbol()).color(status_color(*status)),
            status.name()
        )
    }));
    lines
}

/// Prints the comparison summary (only in verbose mode).
pub fn summary(total: usize, counts: &BTreeMap<Status, usize>) {
    for line in summary_lines(total, counts) {
        verbose(&line);
    }
}
