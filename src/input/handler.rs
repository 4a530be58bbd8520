use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::keybindings::{Action, KeyBindings};
use crate::app::state::InputMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Quit,
    Action(Action),
    Char(char),
    Backspace,
    /// Confirm the open prompt
    Submit,
}

pub fn handle_input(event: Event, mode: &InputMode, bindings: &KeyBindings) -> InputResult {
    match event {
        Event::Key(key_event) if key_event.kind != KeyEventKind::Release => {
            handle_key(normalize(key_event), mode, bindings)
        }
        _ => InputResult::Continue,
    }
}

/// Terminals disagree on whether shifted symbols carry SHIFT; bindings are
/// registered with SHIFT only for letters.
fn normalize(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code {
        if c.is_ascii_uppercase() {
            key.modifiers.insert(KeyModifiers::SHIFT);
        } else if !c.is_ascii_alphabetic() {
            key.modifiers.remove(KeyModifiers::SHIFT);
        }
    }
    key.kind = KeyEventKind::Press;
    key.state = crossterm::event::KeyEventState::NONE;
    key
}

fn handle_key(key: KeyEvent, mode: &InputMode, bindings: &KeyBindings) -> InputResult {
    match mode {
        InputMode::Prompt { .. } => handle_text_input(key),
        InputMode::Help { .. } => handle_help_input(key, bindings),
        InputMode::Normal => match bindings.get(&key) {
            Some(Action::Quit) => InputResult::Quit,
            Some(action) => InputResult::Action(action),
            None => InputResult::Continue,
        },
    }
}

fn handle_help_input(key: KeyEvent, bindings: &KeyBindings) -> InputResult {
    // In help modal: j/k scroll, Esc or the help key closes
    if let Some(action) = bindings.get(&key) {
        match action {
            Action::Help | Action::Back => return InputResult::Action(Action::Help),
            Action::Up => return InputResult::Action(Action::Up),
            Action::Down => return InputResult::Action(Action::Down),
            _ => {}
        }
    }

    match key.code {
        KeyCode::Esc => InputResult::Action(Action::Help),
        KeyCode::Up | KeyCode::Char('k') => InputResult::Action(Action::Up),
        KeyCode::Down | KeyCode::Char('j') => InputResult::Action(Action::Down),
        _ => InputResult::Continue,
    }
}

fn handle_text_input(key: KeyEvent) -> InputResult {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => InputResult::Action(Action::Back),
            _ => InputResult::Continue,
        };
    }
    match key.code {
        KeyCode::Char(c) => InputResult::Char(c),
        KeyCode::Backspace => InputResult::Backspace,
        KeyCode::Enter => InputResult::Submit,
        KeyCode::Esc => InputResult::Action(Action::Back),
        _ => InputResult::Continue,
    }
}
