//! Form, editor and cursor actions produced by the keyboard middleware

use crate::state::{Confirm, StatusKind};

/// One edit applied to a text field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEdit {
    Char(char),
    Backspace,
    Clear,
}

impl TextEdit {
    pub fn apply(self, text: &mut String) {
        match self {
            Self::Char(c) => text.push(c),
            Self::Backspace => {
                text.pop();
            }
            Self::Clear => text.clear(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    StartRename,
    FolderName(TextEdit),
    TorrentField(TextEdit),
    NextField,
    Cancel,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    CursorNext,
    CursorPrevious,
    SignInInput(TextEdit),
    SignInNextField,
    StartNewFolder,
    NewFolderInput(TextEdit),
    CancelNewFolder,
    Ask(Confirm),
    DismissConfirm,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatusBarAction {
    Push {
        kind: StatusKind,
        message: String,
        source: String,
    },
}

impl StatusBarAction {
    pub fn success(message: impl Into<String>, source: impl Into<String>) -> Self {
        Self::Push {
            kind: StatusKind::Success,
            message: message.into(),
            source: source.into(),
        }
    }

    pub fn error(message: impl Into<String>, source: impl Into<String>) -> Self {
        Self::Push {
            kind: StatusKind::Error,
            message: message.into(),
            source: source.into(),
        }
    }

    pub fn info(message: impl Into<String>, source: impl Into<String>) -> Self {
        Self::Push {
            kind: StatusKind::Info,
            message: message.into(),
            source: source.into(),
        }
    }
}
