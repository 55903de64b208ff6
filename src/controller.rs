//! Selection, scrolling and command dispatch over the comparison results.
//!
//! The controller lives on the event-loop thread and owns every piece of mutable
//! UI state, including the busy flag. At most one command runs at a time: while
//! one is in flight every further command is rejected without touching state or
//! collaborators. Copies run on a worker thread that reports back through a
//! channel; edits and merges run in the foreground with the terminal released.

use crate::compare::{ComparisonEngine, ComparisonResult, Side};
use crate::tools::{EditTarget, ExternalTools};
use crate::transfer::{CopyOutcome, Direction, TransferService};
use crate::ui::terminal::{Screen, with_released};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use tracing::{Level, debug, info, span, warn};

/// A user command that may touch files or processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Copy(Direction),
    Edit(EditTarget),
    Merge,
    ManualMerge,
    Refresh,
}

/// Cursor movements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
}

/// Read-only snapshot handed to the renderer.
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    pub results: &'a [ComparisonResult],
    pub selected: usize,
    pub scroll: usize,
    pub viewport_height: usize,
    pub busy: bool,
    pub status_message: Option<&'a str>,
    pub left_root: &'a Path,
    pub right_root: &'a Path,
}

impl View<'_> {
    /// The rows currently inside the viewport.
    #[must_use]
    pub fn visible(&self) -> &[ComparisonResult] {
        let start = self.scroll.min(self.results.len());
        let end = (start + self.viewport_height).min(self.results.len());
        &self.results[start..end]
    }

    /// Busy notice, else the last outcome, else the position summary.
    #[must_use]
    pub fn status_line(&self) -> String {
        if self.busy {
            return "Processing...".to_string();
        }
        if let Some(message) = self.status_message {
            return message.to_string();
        }
        let total = self.results.len();
        let current = if total > 0 { self.selected + 1 } else { 0 };
        format!("Files: {total} | Selected: {current}/{total}")
    }
}

/// Owns the result list and the cursor over it, and turns user commands into
/// scans, copies, and tool launches.
///
/// Copies run on a worker thread; [`poll_completion`](Self::poll_completion) folds their outcome back
/// into the list. While one is pending the controller is busy and refuses other
/// mutating commands.
pub struct NavigationController<T: ExternalTools> {
    engine: ComparisonEngine,
    transfer: TransferService,
    tools: T,
    results: Vec<ComparisonResult>,
    selected: usize,
    scroll: usize,
    viewport_height: usize,
    busy: bool,
    status_message: Option<String>,
    pending: Option<Receiver<CopyOutcome>>,
}

impl<T: ExternalTools> NavigationController<T> {
    /// Runs the initial comparison and starts at the top of the list.
    #[must_use]
    pub fn new(engine: ComparisonEngine, transfer: TransferService, tools: T) -> Self {
        let results = engine.run();
        Self {
            engine,
            transfer,
            tools,
            results,
            selected: 0,
            scroll: 0,
            viewport_height: 1,
            busy: false,
            status_message: None,
            pending: None,
        }
    }

    #[must_use]
    pub fn results(&self) -> &[ComparisonResult] {
        &self.results
    }

    #[must_use]
    pub const fn selected(&self) -> usize {
        self.selected
    }

    #[must_use]
    pub const fn scroll_offset(&self) -> usize {
        self.scroll
    }

    #[must_use]
    pub const fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    #[must_use]
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    #[must_use]
    pub const fn has_pending_copy(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub const fn tools(&self) -> &T {
        &self.tools
    }

    #[must_use]
    pub fn selected_result(&self) -> Option<&ComparisonResult> {
        self.results.get(self.selected)
    }

    #[must_use]
    pub fn view(&self) -> View<'_> {
        View {
            results: &self.results,
            selected: self.selected,
            scroll: self.scroll,
            viewport_height: self.viewport_height,
            busy: self.busy,
            status_message: self.status_message.as_deref(),
            left_root: self.engine.left_root(),
            right_root: self.engine.right_root(),
        }
    }

    /// Moves the selection by `delta` rows, clamped to the list.
    ///
    /// Does nothing on an empty list. Any move clears the status message.
    pub fn move_selection(&mut self, delta: isize) {
        if self.results.is_empty() {
            return;
        }
        let last = self.results.len() - 1;
        self.selected = self.selected.saturating_add_signed(delta).min(last);
        self.status_message = None;
        self.reconcile_scroll();
    }

    /// Jumps to `index`, clamped to the last row, and scrolls it into view.
    ///
    /// Clears the status message. Does nothing on an empty list.
    pub fn select(&mut self, index: usize) {
        if self.results.is_empty() {
            return;
        }
        self.selected = index.min(self.results.len() - 1);
        self.status_message = None;
        self.reconcile_scroll();
    }

    #[allow(clippy::cast_possible_wrap)]
    pub fn apply_movement(&mut self, movement: Movement) {
        let page = self.viewport_height as isize;
        let all = self.results.len() as isize;
        let delta = match movement {
            Movement::Up => -1,
            Movement::Down => 1,
            Movement::PageUp => -page,
            Movement::PageDown => page,
            Movement::Home => -all,
            Movement::End => all,
        };
        self.move_selection(delta);
    }

    /// Sets the number of visible rows (at least one) and re-fits the scroll.
    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height.max(1);
        self.reconcile_scroll();
    }

    /// Scrolls the minimum amount that keeps the selection inside the viewport.
    pub fn reconcile_scroll(&mut self) {
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + self.viewport_height {
            self.scroll = self.selected + 1 - self.viewport_height;
        }
        let max_scroll = self.results.len().saturating_sub(self.viewport_height);
        self.scroll = self.scroll.min(max_scroll);
    }

    /// Dispatches `command` against the selected row.
    ///
    /// Returns false, with nothing changed and no collaborator called, while
    /// another command is in flight or when there are no results.
    pub fn execute(&mut self, command: Command, screen: &mut dyn Screen) -> bool {
        let span = span!(Level::DEBUG, "execute", ?command);
        let _guard = span.enter();

        if self.busy || self.results.is_empty() {
            debug!(busy = self.busy, "Command rejected");
            return false;
        }

        match command {
            Command::Copy(direction) => self.start_copy(direction),
            Command::Edit(target) => self.edit(target, screen),
            Command::Merge => self.merge(screen),
            Command::ManualMerge => self.manual_merge(screen),
            Command::Refresh => self.refresh(),
        }
        true
    }

    fn finish(&mut self, message: impl Into<String>) {
        self.busy = false;
        self.status_message = Some(message.into());
    }

    fn start_copy(&mut self, direction: Direction) {
        let Some(job) = self
            .transfer
            .plan(self.selected, &self.results[self.selected], direction)
        else {
            self.status_message = Some(format!(
                "Failed to copy file: no {} file",
                direction.source().name()
            ));
            return;
        };

        let (tx, rx) = mpsc::channel();
        self.busy = true;
        let spawned = thread::Builder::new()
            .name("dircmp-copy".to_string())
            .spawn(move || {
                // The receiver may be gone if the controller was dropped
                let _ = tx.send(job.run());
            });

        match spawned {
            Ok(_) => self.pending = Some(rx),
            Err(e) => {
                warn!(error = %e, "Failed to start copy worker");
                self.finish("Failed to copy file");
            }
        }
    }

    fn finish_copy(&mut self, outcome: CopyOutcome) {
        self.pending = None;
        let direction = outcome.job.direction;
        if outcome.apply(&mut self.results) {
            self.finish(format!("File copied {}", direction.arrow()));
        } else {
            self.finish("Failed to copy file");
        }
    }

    /// Applies a finished background copy, if there is one.
    ///
    /// Returns true if state changed.
    pub fn poll_completion(&mut self) -> bool {
        let Some(rx) = &self.pending else {
            return false;
        };
        match rx.try_recv() {
            Ok(outcome) => {
                self.finish_copy(outcome);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                self.finish("Failed to copy file");
                true
            }
        }
    }

    /// Blocks until an in-flight copy has finished and applies it.
    pub fn wait_for_completion(&mut self) {
        let Some(rx) = self.pending.take() else {
            return;
        };
        info!("Waiting for copy to finish");
        match rx.recv() {
            Ok(outcome) => self.finish_copy(outcome),
            Err(_) => self.finish("Failed to copy file"),
        }
    }

    fn existing_path(&self, side: Side) -> Option<PathBuf> {
        self.results[self.selected]
            .existing(side)
            .map(|r| r.path().to_path_buf())
    }

    fn edit(&mut self, target: EditTarget, screen: &mut dyn Screen) {
        let sides: &[Side] = match target {
            EditTarget::Left => &[Side::Left],
            EditTarget::Right => &[Side::Right],
            EditTarget::Both => &[Side::Left, Side::Right],
        };
        let files: Vec<PathBuf> = sides
            .iter()
            .filter_map(|side| self.existing_path(*side))
            .collect();
        if files.is_empty() {
            self.status_message = Some(format!("No {} file(s) to edit", target.name()));
            return;
        }

        self.busy = true;
        match with_released(screen, || self.tools.edit(&files)) {
            Ok(()) => {
                self.rescan_keep_selection();
                let message = match target {
                    EditTarget::Both => "Files edited successfully",
                    EditTarget::Left => "Left file edited successfully",
                    EditTarget::Right => "Right file edited successfully",
                };
                self.finish(message);
            }
            Err(e) => {
                warn!(error = %e, "Edit failed");
                self.finish("Editor failed or was cancelled");
            }
        }
    }

    /// Both paths of the selected pair, if it can be merged.
    fn merge_pair(&self) -> Option<(PathBuf, PathBuf)> {
        let result = &self.results[self.selected];
        if !result.can_merge() {
            return None;
        }
        Some((self.existing_path(Side::Left)?, self.existing_path(Side::Right)?))
    }

    fn merge(&mut self, screen: &mut dyn Screen) {
        let Some((left, right)) = self.merge_pair() else {
            self.status_message = Some("Files cannot be merged (missing or binary)".to_string());
            return;
        };

        self.busy = true;
        match with_released(screen, || self.tools.merge(&left, &right)) {
            Ok(tool) => {
                self.rescan_keep_selection();
                self.finish(format!("Files merged successfully ({tool})"));
            }
            Err(e) => {
                warn!(error = %e, "Merge failed");
                self.finish("Merge failed or was cancelled");
            }
        }
    }

    fn manual_merge(&mut self, screen: &mut dyn Screen) {
        let Some((left, right)) = self.merge_pair() else {
            self.status_message = Some("Files cannot be merged (missing or binary)".to_string());
            return;
        };

        self.busy = true;
        let relative_path = self.results[self.selected].relative_path().to_string();
        let scratch = match self.tools.write_merge_scratch(&relative_path, &left, &right) {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "Could not write merge file");
                self.finish("Failed to create merge file");
                return;
            }
        };

        match with_released(screen, || self.tools.edit(std::slice::from_ref(&scratch))) {
            Ok(()) => self.finish(format!("Manual merge completed: {}", scratch.display())),
            Err(e) => {
                warn!(error = %e, "Could not edit merge file");
                self.finish("Failed to open merge file in editor");
            }
        }
    }

    fn refresh(&mut self) {
        self.busy = true;
        self.results = self.engine.run();
        self.selected = 0;
        self.scroll = 0;
        self.finish("Refreshed");
    }

    fn rescan_keep_selection(&mut self) {
        self.results = self.engine.run();
        self.selected = self.selected.min(self.results.len().saturating_sub(1));
        self.reconcile_scroll();
    }
}
