//! Screen layout as plain data.
//!
//! Everything here is a pure function of the controller's [`View`]; the terminal
//! session only paints the lines it is given.

use crate::compare::{ComparisonResult, FileRecord, MERGE_MARKER, Side, Status};
use crate::controller::View;
use crate::utils::format_size;
use chrono::{DateTime, Local};
use std::path::Path;

/// Rows taken by the header, column titles, bottom border, status and hint.
pub const CHROME_ROWS: usize = 6;
/// First row of the file list.
pub const LIST_TOP: usize = 4;

const STATUS_COL_WIDTH: usize = 10;
const INFO_WIDTH: usize = 19;
const MISSING: &str = "─ MISSING ─";
const HINT: &str =
    "↑↓:Select F3/<:Copy→Left F4/>:Copy→Right e/E/w:Edit m/M:Merge r:Refresh h:Help q:Quit";

/// How a line should be colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Header,
    Row(Status),
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub tone: Tone,
    pub selected: bool,
}

impl Line {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Plain,
            selected: false,
        }
    }
}

/// Number of list rows that fit in a terminal of `height` rows.
#[must_use]
pub const fn list_height(height: usize) -> usize {
    if height > CHROME_ROWS {
        height - CHROME_ROWS
    } else {
        1
    }
}

/// Pads or cuts `text` to exactly `width` characters, keeping the start.
fn fit(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat_n(' ', width - len));
    out
}

/// Cuts `text` to at most `width` characters, keeping the end behind `...`.
fn tail(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len <= width {
        return text.to_string();
    }
    if width <= 3 {
        return ".".repeat(width);
    }
    let keep: String = text.chars().skip(len - (width - 3)).collect();
    format!("...{keep}")
}

fn center(text: &str, width: usize) -> String {
    let len = text.chars().count().min(width);
    let left = (width - len) / 2;
    fit(&format!("{}{text}", " ".repeat(left)), width)
}

fn format_time(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0).map_or_else(
        || "??/?? ??:??".to_string(),
        |t| t.with_timezone(&Local).format("%m/%d %H:%M").to_string(),
    )
}

/// Size and modification time of a side, or the missing marker.
#[must_use]
pub fn side_info(record: Option<&FileRecord>) -> String {
    match record.filter(|r| r.exists()) {
        Some(r) => format!("{} {}", format_size(r.size()), format_time(r.modified_at())),
        None => MISSING.to_string(),
    }
}

/// Status label with the merge marker when the pair is mergeable.
#[must_use]
pub fn status_cell(result: &ComparisonResult) -> String {
    let label = result.status().label();
    if result.can_merge() {
        format!("{label}{MERGE_MARKER}")
    } else {
        label.to_string()
    }
}

struct Columns {
    left: usize,
    status: usize,
    right: usize,
}

impl Columns {
    fn for_width(width: usize) -> Self {
        let inner = width.saturating_sub(STATUS_COL_WIDTH + 4);
        let left = inner * 6 / 10;
        Self {
            left,
            status: STATUS_COL_WIDTH,
            right: inner - left,
        }
    }

    fn rule(&self, open: char, mid: char, close: char) -> String {
        format!(
            "{open}{}{mid}{}{mid}{}{close}",
            "─".repeat(self.left),
            "─".repeat(self.status),
            "─".repeat(self.right)
        )
    }

    fn row(&self, left: &str, status: &str, right: &str) -> String {
        format!(
            "│{}│{}│{}│",
            fit(left, self.left),
            center(status, self.status),
            fit(right, self.right)
        )
    }
}

fn root_name(root: &Path) -> String {
    root.file_name().map_or_else(
        || root.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    )
}

fn result_row(columns: &Columns, result: &ComparisonResult) -> String {
    let info = side_info(result.record(Side::Left));
    let name_width = columns.left.saturating_sub(INFO_WIDTH + 1);
    let left = if name_width == 0 {
        tail(result.relative_path(), columns.left)
    } else {
        format!(
            "{} {info:>width$}",
            fit(&tail(result.relative_path(), name_width), name_width),
            width = INFO_WIDTH
        )
    };
    columns.row(&left, &status_cell(result), &side_info(result.record(Side::Right)))
}

/// Lays out the full screen: exactly `height` lines of at most `width` chars.
#[must_use]
pub fn render(view: &View<'_>, width: usize, height: usize) -> Vec<Line> {
    let columns = Columns::for_width(width);
    let mut lines = Vec::with_capacity(height);

    lines.push(Line {
        text: fit(
            &format!(
                " Directory Comparison: {} <-> {} ",
                root_name(view.left_root),
                root_name(view.right_root)
            ),
            width,
        ),
        tone: Tone::Header,
        selected: false,
    });
    lines.push(Line::plain(columns.rule('┌', '┬', '┐')));
    lines.push(Line::plain(columns.row("LEFT DIRECTORY", "STATUS", "RIGHT DIRECTORY")));
    lines.push(Line::plain(columns.rule('├', '┼', '┤')));

    if view.results.is_empty() {
        lines.push(Line::plain(""));
        lines.push(Line::plain("  No files found or directories don't exist"));
    } else {
        for (offset, result) in view.visible().iter().enumerate() {
            lines.push(Line {
                text: result_row(&columns, result),
                tone: Tone::Row(result.status()),
                selected: view.scroll + offset == view.selected,
            });
        }
        lines.push(Line::plain(columns.rule('└', '┴', '┘')));
    }

    let footer = [view.status_line(), HINT.to_string()];
    let body_rows = height.saturating_sub(footer.len());
    lines.truncate(body_rows);
    lines.resize_with(body_rows, || Line::plain(""));
    lines.extend(footer.iter().map(|text| Line::plain(fit(text, width))));

    for line in &mut lines {
        if line.text.chars().count() > width {
            line.text = line.text.chars().take(width).collect();
        }
    }
    lines.truncate(height);
    lines
}

/// Text of the help page.
#[must_use]
pub fn help_lines(merge_tools: &[String]) -> Vec<String> {
    let mut lines: Vec<String> = [
        "Directory Comparison Tool - Help",
        "",
        "Navigation:",
        "  ↑/↓ or k/j    - Move selection up/down",
        "  PgUp/PgDn     - Page up/down",
        "  Home/End      - Go to first/last file",
        "",
        "File Operations:",
        "  F3 or <       - Copy selected file from right to left",
        "  F4 or >       - Copy selected file from left to right",
        "",
        "Editing & Merging:",
        "  e             - Edit both files (if they exist)",
        "  E             - Edit left file only",
        "  w             - Edit right file only",
        "  m             - Merge files using external tool",
        "  M             - Create manual merge file",
        "",
        "Other Commands:",
        "  r             - Refresh directory comparison",
        "  h or ?        - Show this help",
        "  q or Esc      - Quit",
        "",
        "File Status Symbols:",
    ]
    .iter()
    .map(ToString::to_string)
    .collect();

    lines.extend(
        Status::ALL
            .iter()
            .map(|s| format!("  {:<5} {:<7} - {}", s.symbol(), s.label(), s.description())),
    );
    lines.push(format!("  {MERGE_MARKER:<13} - Files can be merged"));
    lines.push(String::new());
    lines.push("Notes:".to_string());
    lines.push("- Set EDITOR for your preferred editor".to_string());
    lines.push("- Merging requires text files on both sides".to_string());
    lines.push(format!("- Merge tools tried in order: {}", merge_tools.join(", ")));
    lines.push(String::new());
    lines.push("Press any key to continue...".to_string());
    lines
}

/// Help page fitted to the screen.
#[must_use]
pub fn help_screen(text: &[String], width: usize, height: usize) -> Vec<Line> {
    let mut lines: Vec<Line> = text
        .iter()
        .take(height)
        .map(|t| Line::plain(fit(&format!("  {t}"), width)))
        .collect();
    lines.resize_with(height, || Line::plain(""));
    lines
}
