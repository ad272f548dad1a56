//! Key bindings: arrows and vim-style hjkl.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Pick up the piece in tray slot 0..3.
    Select(usize),
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Drop,
    /// Put the dragged piece back; quits when nothing is dragged.
    Cancel,
    Help,
    NewGame,
    Quit,
    None,
}

/// Map key event to action. Supports both arrows and vim keys (hjkl).
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent {
        code, modifiers, ..
    } = key;
    if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
        return Action::Quit;
    }
    let no_mod = modifiers.is_empty() || modifiers == KeyModifiers::SHIFT;
    if !no_mod {
        return Action::None;
    }
    match code {
        KeyCode::Char(c @ '1'..='3') => Action::Select(c as usize - '1' as usize),
        KeyCode::Left | KeyCode::Char('h') => Action::MoveLeft,
        KeyCode::Right | KeyCode::Char('l') => Action::MoveRight,
        KeyCode::Up | KeyCode::Char('k') => Action::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => Action::MoveDown,
        KeyCode::Enter | KeyCode::Char(' ') => Action::Drop,
        KeyCode::Esc => Action::Cancel,
        KeyCode::Char('?') | KeyCode::F(1) => Action::Help,
        KeyCode::Char('n') => Action::NewGame,
        KeyCode::Char('q') => Action::Quit,
        _ => Action::None,
    }
}
