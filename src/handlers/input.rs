use crate::event::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Entries skipped by `J`/`K`
pub const JUMP_STEP: isize = 20;

/// What a key press asks for: a navigator command or a UI-only toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Navigate(Command),
    ShowHelp,
    HideHelp,
}

/// Handle keyboard input and return the corresponding action.
/// Does not touch navigator state; `page` is the current list height.
pub fn handle_input_event(key: KeyEvent, show_help: bool, page: usize) -> Option<InputAction> {
    if show_help {
        return Some(handle_help_mode(key));
    }
    handle_normal_mode(key, page)
}

/// Any key closes the help overlay, except Ctrl+C which still quits
fn handle_help_mode(key: KeyEvent) -> InputAction {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            InputAction::Navigate(Command::Quit)
        }
        _ => InputAction::HideHelp,
    }
}

fn handle_normal_mode(key: KeyEvent, page: usize) -> Option<InputAction> {
    let page = page.max(1) as isize;
    let command = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Command::Quit,
        KeyCode::Char('q') | KeyCode::Esc => Command::Close,
        KeyCode::Down | KeyCode::Char('j') => Command::MoveBy(1),
        KeyCode::Up | KeyCode::Char('k') => Command::MoveBy(-1),
        KeyCode::Char('J') => Command::MoveBy(JUMP_STEP),
        KeyCode::Char('K') => Command::MoveBy(-JUMP_STEP),
        KeyCode::PageDown => Command::MoveBy(page),
        KeyCode::PageUp => Command::MoveBy(-page),
        KeyCode::Char('g') | KeyCode::Home => Command::JumpToStart,
        KeyCode::Char('G') | KeyCode::End => Command::JumpToEnd,
        KeyCode::Enter => Command::OpenContext,
        KeyCode::Char('?') => return Some(InputAction::ShowHelp),
        _ => return None,
    };
    Some(InputAction::Navigate(command))
}
