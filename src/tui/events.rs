use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// User actions from keyboard events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Submit,
    InsertNewline,
    Input(char),
    DeleteChar,
    Dismiss,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    ToggleFocus,
    NewChat,
    ClearChat,
    DeleteSession,
    DownloadChat,
    CopyMessage,
    ToggleTheme,
    ToggleSidebar,
    RefreshSessions,
    QuickQuestion(usize),
    None,
}

/// Poll for keyboard events and convert to actions
pub fn poll_event(timeout: Duration) -> anyhow::Result<Action> {
    if event::poll(timeout)?
        && let Event::Key(key) = event::read()?
        && key.kind == KeyEventKind::Press
    {
        return Ok(key_to_action(key));
    }
    Ok(Action::None)
}

fn key_to_action(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        // Quit
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Char('q'), KeyModifiers::CONTROL) => Action::Quit,

        // Conversation
        (KeyCode::Enter, KeyModifiers::ALT) => Action::InsertNewline,
        (KeyCode::Enter, _) => Action::Submit,
        (KeyCode::Char('n'), KeyModifiers::CONTROL) => Action::NewChat,
        (KeyCode::Char('l'), KeyModifiers::CONTROL) => Action::ClearChat,
        (KeyCode::Char('d'), KeyModifiers::CONTROL) => Action::DeleteSession,
        (KeyCode::Delete, _) => Action::DeleteSession,
        (KeyCode::Char('s'), KeyModifiers::CONTROL) => Action::DownloadChat,
        (KeyCode::Char('y'), KeyModifiers::CONTROL) => Action::CopyMessage,
        (KeyCode::Char('r'), KeyModifiers::CONTROL) => Action::RefreshSessions,
        (KeyCode::F(n @ 1..=4), _) => Action::QuickQuestion(usize::from(n - 1)),

        // View
        (KeyCode::Char('t'), KeyModifiers::CONTROL) => Action::ToggleTheme,
        (KeyCode::Char('b'), KeyModifiers::CONTROL) => Action::ToggleSidebar,
        (KeyCode::Tab, _) => Action::ToggleFocus,
        (KeyCode::Esc, _) => Action::Dismiss,

        // Navigation
        (KeyCode::Up, _) => Action::MoveUp,
        (KeyCode::Down, _) => Action::MoveDown,
        (KeyCode::PageUp, _) => Action::PageUp,
        (KeyCode::PageDown, _) => Action::PageDown,

        // Message input
        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            Action::Input(c)
        }
        (KeyCode::Backspace, _) => Action::DeleteChar,

        _ => Action::None,
    }
}
