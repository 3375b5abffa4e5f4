//! Input events as the host reports them

use crate::supsub::mark::Mark;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    Enter,
    Char(char),
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub ctrl: bool,
    pub shift: bool,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            shift: false,
        }
    }

    pub fn ctrl(c: char) -> Self {
        Self {
            key: Key::Char(c),
            ctrl: true,
            shift: false,
        }
    }

    pub fn shift(c: char) -> Self {
        Self {
            key: Key::Char(c),
            ctrl: false,
            shift: true,
        }
    }

    /// The mark this key toggles: the vertical arrows, or `^`/`_` typed with shift.
    pub fn mark_hotkey(&self) -> Option<Mark> {
        match self.key {
            Key::ArrowUp => Some(Mark::Superscript),
            Key::ArrowDown => Some(Mark::Subscript),
            Key::Char('^') if self.shift => Some(Mark::Superscript),
            Key::Char('_') if self.shift => Some(Mark::Subscript),
            _ => None,
        }
    }

    pub fn is_ctrl_char(&self, c: char) -> bool {
        self.ctrl && self.key == Key::Char(c)
    }
}

/// What the host should do with the key after the editor saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The editor handled the key; suppress the default action.
    Handled,
    /// Let the default action (typing, caret movement) happen.
    Default,
}

/// Clipboard content of a paste event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardPayload {
    pub html: Option<String>,
    pub text: Option<String>,
}

impl ClipboardPayload {
    pub fn html(html: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
            text: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            html: None,
            text: Some(text.into()),
        }
    }
}
