//! Event handling utilities

use crossterm::event::{KeyCode, KeyModifiers};

/// Map a key press to an action. `h`/`l` navigate only in vim mode.
pub fn key_to_action(key: KeyCode, modifiers: KeyModifiers, vim_mode: bool) -> Option<Action> {
    if modifiers.contains(KeyModifiers::CONTROL) {
        return match key {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    match key {
        KeyCode::Right => Some(Action::Next),
        KeyCode::Left => Some(Action::Prev),
        KeyCode::Char('l') if vim_mode => Some(Action::Next),
        KeyCode::Char('h') if vim_mode => Some(Action::Prev),
        // On-screen button hotkeys
        KeyCode::Char(']') => Some(Action::Next),
        KeyCode::Char('[') => Some(Action::Prev),
        KeyCode::Char(' ') => Some(Action::Flip),
        KeyCode::Char('p') => Some(Action::Pronounce),
        KeyCode::Char('f') => Some(Action::CycleFilter),
        KeyCode::Tab => Some(Action::SwitchScreen),
        KeyCode::Char('y') | KeyCode::Char('1') => Some(Action::Correct),
        KeyCode::Char('n') | KeyCode::Char('2') => Some(Action::Incorrect),
        KeyCode::Enter => Some(Action::NewSession),
        KeyCode::Char('r') => Some(Action::RetryMissed),
        KeyCode::Char('0') | KeyCode::Home | KeyCode::Backspace => Some(Action::Reset),
        KeyCode::Char('?') => Some(Action::Help),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

/// Actions that can be taken in the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Navigation
    Next,
    Prev,
    Flip,
    Reset,

    // Deck
    CycleFilter,
    SwitchScreen,

    // Practice
    Correct,
    Incorrect,
    NewSession,
    RetryMissed,

    // Misc
    Pronounce,
    Help,
    Quit,
}
