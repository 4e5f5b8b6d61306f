//! Key event handling

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// A classified user action
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    Quit,
    TogglePlay,
    Next,
    Previous,
    ToggleShuffle,
    CycleRepeat,
    ToggleAutoplay,
    FocusNext,
    FocusPrev,
    EnterSearch,
    MoveUp,
    MoveDown,
    Activate,
    VolumeUp,
    VolumeDown,
    SeekForward,
    SeekBackward,
    NextDevice,
    SearchInput(char),
    SearchBackspace,
    SearchExit,
    SearchSubmit,
}

/// Map a key press to an intent. `searching` switches to the search-mode
/// keymap where printable characters are text.
pub fn classify(key: KeyEvent, searching: bool) -> Option<Intent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Intent::Quit);
    }

    if searching {
        return match key.code {
            KeyCode::Esc => Some(Intent::SearchExit),
            KeyCode::Enter => Some(Intent::SearchSubmit),
            KeyCode::Backspace => Some(Intent::SearchBackspace),
            KeyCode::Up => Some(Intent::MoveUp),
            KeyCode::Down => Some(Intent::MoveDown),
            KeyCode::Char(c) => Some(Intent::SearchInput(c)),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Some(Intent::Quit),
        KeyCode::Char(' ') => Some(Intent::TogglePlay),
        KeyCode::Char('n') => Some(Intent::Next),
        KeyCode::Char('p') => Some(Intent::Previous),
        KeyCode::Char('s') => Some(Intent::ToggleShuffle),
        KeyCode::Char('r') => Some(Intent::CycleRepeat),
        KeyCode::Char('a') => Some(Intent::ToggleAutoplay),
        KeyCode::Char('d') => Some(Intent::NextDevice),
        KeyCode::Char('/') => Some(Intent::EnterSearch),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Intent::VolumeUp),
        KeyCode::Char('-') => Some(Intent::VolumeDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Intent::MoveUp),
        KeyCode::Char('j') | KeyCode::Down => Some(Intent::MoveDown),
        KeyCode::Right => Some(Intent::SeekForward),
        KeyCode::Left => Some(Intent::SeekBackward),
        KeyCode::Enter => Some(Intent::Activate),
        KeyCode::BackTab => Some(Intent::FocusPrev),
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => Some(Intent::FocusPrev),
        KeyCode::Tab => Some(Intent::FocusNext),
        _ => None,
    }
}
