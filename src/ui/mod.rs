//! Interactive terminal front end.
//!
//! - [`terminal`]: raw-mode session and the release/reacquire seam
//! - [`keymap`]: key bindings
//! - [`render`]: screen layout

/// Key bindings
pub mod keymap;
/// Screen layout
pub mod render;
/// Terminal ownership
pub mod terminal;

use crate::controller::NavigationController;
use crate::tools::ExternalTools;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use keymap::Action;
use std::time::Duration;
use terminal::TerminalSession;
use tracing::{debug, info};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Why the event loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Quit,
    Interrupted,
}

/// Runs the event loop until the user quits or interrupts.
///
/// Any copy still running when the loop ends is waited for before the
/// terminal is restored.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up, read or drawn to.
pub fn run<T: ExternalTools>(
    controller: &mut NavigationController<T>,
    help_text: &[String],
) -> Result<ExitReason> {
    let mut session = TerminalSession::start()?;
    let mut show_help = false;
    let mut dirty = true;
    info!("Interactive session started");

    let reason = loop {
        if controller.poll_completion() {
            dirty = true;
        }

        if dirty {
            let (width, height) = session.size()?;
            let (width, height) = (usize::from(width), usize::from(height));
            controller.set_viewport_height(render::list_height(height));
            let lines = if show_help {
                render::help_screen(help_text, width, height)
            } else {
                render::render(&controller.view(), width, height)
            };
            session.draw(&lines)?;
            dirty = false;
        }

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let key = match event::read()? {
            Event::Key(key) => key,
            Event::Resize(..) => {
                dirty = true;
                continue;
            }
            _ => continue,
        };

        let action = keymap::action_for(key);
        if show_help && key.kind == KeyEventKind::Press && action != Some(Action::Interrupt) {
            show_help = false;
            dirty = true;
            continue;
        }
        let Some(action) = action else {
            continue;
        };
        dirty = true;

        debug!(?action, "Key action");
        match action {
            Action::Move(movement) => controller.apply_movement(movement),
            Action::Run(command) => {
                controller.execute(command, &mut session);
            }
            Action::Help => show_help = true,
            Action::Quit => break ExitReason::Quit,
            Action::Interrupt => break ExitReason::Interrupted,
        }
    };

    controller.wait_for_completion();
    drop(session);
    info!(?reason, "Interactive session ended");
    Ok(reason)
}
