use crate::controller::{Command, Movement};
use crate::tools::EditTarget;
use crate::transfer::Direction;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move(Movement),
    Run(Command),
    Help,
    Quit,
    Interrupt,
}

/// Maps a key event to an action. Releases and unbound keys map to `None`.
#[must_use]
pub fn action_for(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c' | 'C')).then_some(Action::Interrupt);
    }

    let action = match key.code {
        KeyCode::Up | KeyCode::Char('k') => Action::Move(Movement::Up),
        KeyCode::Down | KeyCode::Char('j') => Action::Move(Movement::Down),
        KeyCode::PageUp => Action::Move(Movement::PageUp),
        KeyCode::PageDown => Action::Move(Movement::PageDown),
        KeyCode::Home => Action::Move(Movement::Home),
        KeyCode::End => Action::Move(Movement::End),
        KeyCode::F(4) | KeyCode::Char('>') => Action::Run(Command::Copy(Direction::LeftToRight)),
        KeyCode::F(3) | KeyCode::Char('<') => Action::Run(Command::Copy(Direction::RightToLeft)),
        KeyCode::Char('e') => Action::Run(Command::Edit(EditTarget::Both)),
        KeyCode::Char('E') => Action::Run(Command::Edit(EditTarget::Left)),
        KeyCode::Char('w') => Action::Run(Command::Edit(EditTarget::Right)),
        KeyCode::Char('m') => Action::Run(Command::Merge),
        KeyCode::Char('M') => Action::Run(Command::ManualMerge),
        KeyCode::Char('r') => Action::Run(Command::Refresh),
        KeyCode::Char('h' | '?') => Action::Help,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        _ => return None,
    };
    Some(action)
}
