use super::render::{Line, Tone};
use crate::compare::Status;
use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event,
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    },
};
use std::io::{self, Stdout, Write};
use std::time::Duration;
use tracing::{debug, warn};

/// Something that owns the terminal and can hand it to a child process.
pub trait Screen {
    /// Leaves raw mode and the alternate screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal mode cannot be changed.
    fn release(&mut self) -> Result<()>;

    /// Takes the terminal back after [`Screen::release`].
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal mode cannot be changed.
    fn reacquire(&mut self) -> Result<()>;
}

/// Keeps the terminal released for as long as it lives.
///
/// Dropping the guard reacquires the terminal, whether or not the release
/// itself succeeded and whatever the child process did.
pub struct Released<'a> {
    screen: &'a mut dyn Screen,
}

impl<'a> Released<'a> {
    /// # Errors
    ///
    /// Returns an error if the terminal could not be released. The terminal is
    /// reacquired before returning.
    pub fn new(screen: &'a mut dyn Screen) -> Result<Self> {
        let guard = Self { screen };
        guard.screen.release()?;
        Ok(guard)
    }
}

impl Drop for Released<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.screen.reacquire() {
            warn!(error = %e, "Failed to reacquire terminal");
        }
    }
}

/// Runs `f` with the terminal released.
///
/// # Errors
///
/// Returns the release error, or whatever `f` returns.
pub fn with_released<R>(screen: &mut dyn Screen, f: impl FnOnce() -> Result<R>) -> Result<R> {
    let _released = Released::new(screen)?;
    f()
}

/// Raw-mode alternate-screen session on stdout, restored on drop.
pub struct TerminalSession {
    stdout: Stdout,
    active: bool,
}

impl TerminalSession {
    /// # Errors
    ///
    /// Returns an error if raw mode or the alternate screen cannot be entered.
    pub fn start() -> Result<Self> {
        let mut session = Self {
            stdout: io::stdout(),
            active: false,
        };
        session.enter()?;
        Ok(session)
    }

    fn enter(&mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        self.active = true;
        execute!(self.stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))
            .context("Failed to enter alternate screen")?;
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        self.active = false;
        let screen = execute!(self.stdout, LeaveAlternateScreen, Show, ResetColor);
        disable_raw_mode().context("Failed to disable raw mode")?;
        screen.context("Failed to leave alternate screen")?;
        Ok(())
    }

    /// Current (width, height) in cells.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be queried.
    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size().context("Failed to read terminal size")
    }

    /// Replaces the screen content with `lines`, one per row from the top.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    pub fn draw(&mut self, lines: &[Line]) -> Result<()> {
        queue!(self.stdout, Clear(ClearType::All))?;
        for (row, line) in (0u16..).zip(lines) {
            let (fg, bg) = colors(line.tone);
            queue!(self.stdout, MoveTo(0, row))?;
            if let Some(fg) = fg {
                queue!(self.stdout, SetForegroundColor(fg))?;
            }
            if let Some(bg) = bg {
                queue!(self.stdout, SetBackgroundColor(bg))?;
            }
            if matches!(line.tone, Tone::Header) {
                queue!(self.stdout, SetAttribute(Attribute::Bold))?;
            }
            if line.selected {
                queue!(self.stdout, SetAttribute(Attribute::Reverse))?;
            }
            queue!(
                self.stdout,
                Print(&line.text),
                SetAttribute(Attribute::Reset),
                ResetColor
            )?;
        }
        self.stdout.flush()?;
        Ok(())
    }
}

const fn colors(tone: Tone) -> (Option<Color>, Option<Color>) {
    match tone {
        Tone::Header => (Some(Color::White), Some(Color::Blue)),
        Tone::Row(status) => (Some(status_color(status)), None),
        Tone::Plain => (None, None),
    }
}

const fn status_color(status: Status) -> Color {
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

impl Screen for TerminalSession {
    fn release(&mut self) -> Result<()> {
        debug!("Releasing terminal");
        self.leave()
    }

    fn reacquire(&mut self) -> Result<()> {
        debug!("Reacquiring terminal");
        self.enter()?;
        // Keys typed into the child process must not reach the list
        while event::poll(Duration::from_millis(0))? {
            let _ = event::read();
        }
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if self.active
            && let Err(e) = self.leave()
        {
            warn!(error = %e, "Failed to restore terminal");
        }
    }
}
