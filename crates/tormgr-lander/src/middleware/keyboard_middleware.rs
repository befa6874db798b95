//! KeyboardMiddleware - translates keyboard events into context-aware actions
//!
//! ## Layer 1: Priority keys
//! Ctrl+C quits from anywhere. An open confirmation prompt takes every other
//! key.
//!
//! ## Layer 2: Text input
//! Screens with a focused text field get characters, Backspace, Tab, Enter
//! and Esc.
//!
//! ## Layer 3: Screen keymap
//! Everything else is looked up in the keymap of the current route.

use crate::actions::{
    Action, Command, EditorAction, FolderAction, FoldersAction, GlobalAction, TextEdit, UiAction,
};
use crate::dispatcher::Dispatcher;
use crate::middleware::Middleware;
use crate::routes::{Route, NEW_TORRENT};
use crate::state::{AppState, Confirm};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Text field that currently has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTarget {
    SignIn,
    NewFolder,
    FolderName,
    Torrent,
}

impl TextTarget {
    /// Focused text field for `state`, if any
    pub fn of(state: &AppState) -> Option<Self> {
        match &state.route {
            Route::SignIn { .. } => Some(Self::SignIn),
            Route::Folders if state.ui.new_folder.is_some() => Some(Self::NewFolder),
            Route::Folder(_) if state.editor.renaming => Some(Self::FolderName),
            Route::Torrent(..) if state.editor.torrent.value().is_some() => Some(Self::Torrent),
            _ => None,
        }
    }

    fn edit(self, edit: TextEdit) -> Action {
        match self {
            Self::SignIn => Action::Ui(UiAction::SignInInput(edit)),
            Self::NewFolder => Action::Ui(UiAction::NewFolderInput(edit)),
            Self::FolderName => Action::Editor(EditorAction::FolderName(edit)),
            Self::Torrent => Action::Editor(EditorAction::TorrentField(edit)),
        }
    }
}

pub struct KeyboardMiddleware;

impl KeyboardMiddleware {
    pub fn new() -> Self {
        Self
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState, dispatcher: &Dispatcher) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // Layer 1
        if ctrl && key.code == KeyCode::Char('c') {
            log::debug!("Ctrl+C - dispatching Quit");
            dispatcher.dispatch(Action::Global(GlobalAction::Quit));
            return;
        }
        if let Some(confirm) = &state.ui.confirm {
            handle_confirm(key, confirm, dispatcher);
            return;
        }

        // Layer 2
        if let Some(target) = TextTarget::of(state) {
            handle_text_input(key, target, state, dispatcher);
            return;
        }

        // Layer 3
        if key.code == KeyCode::Char('q') {
            dispatcher.dispatch(Action::Global(GlobalAction::Quit));
            return;
        }
        match &state.route {
            Route::Folders => handle_folders_key(key, state, dispatcher),
            Route::Folder(id) => handle_folder_key(key, id, state, dispatcher),
            Route::Torrent(folder_id, _) => {
                if key.code == KeyCode::Esc {
                    dispatcher.dispatch(Action::navigate(Route::Folder(folder_id.clone())));
                }
            }
            Route::Root | Route::SignIn { .. } => {}
        }
    }
}

impl Middleware for KeyboardMiddleware {
    fn handle(&mut self, action: &Action, state: &AppState, dispatcher: &Dispatcher) -> bool {
        if let Action::Global(GlobalAction::KeyPressed(key)) = action {
            self.handle_key(*key, state, dispatcher);
            return false;
        }
        true
    }
}

fn handle_confirm(key: KeyEvent, confirm: &Confirm, dispatcher: &Dispatcher) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => {
            let command = match confirm.clone() {
                Confirm::DeleteFolder(folder) => Command::DeleteFolder(folder),
                Confirm::DeleteTorrent { folder, item } => Command::DeleteTorrent { folder, item },
            };
            dispatcher.dispatch(Action::Ui(UiAction::DismissConfirm));
            dispatcher.dispatch(Action::command(command));
        }
        KeyCode::Char('n') | KeyCode::Esc => {
            dispatcher.dispatch(Action::Ui(UiAction::DismissConfirm));
        }
        _ => {}
    }
}

fn handle_text_input(key: KeyEvent, target: TextTarget, state: &AppState, dispatcher: &Dispatcher) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::Char('u') if ctrl => dispatcher.dispatch(target.edit(TextEdit::Clear)),
        KeyCode::Char('s') if ctrl && target == TextTarget::SignIn => {
            if state.ui.signin.is_complete() {
                dispatcher.dispatch(Action::command(Command::SignUp(
                    state.ui.signin.credentials(),
                )));
            }
        }
        KeyCode::Char(c) if !ctrl && !alt => dispatcher.dispatch(target.edit(TextEdit::Char(c))),
        KeyCode::Backspace => dispatcher.dispatch(target.edit(TextEdit::Backspace)),
        KeyCode::Tab => match target {
            TextTarget::SignIn => dispatcher.dispatch(Action::Ui(UiAction::SignInNextField)),
            TextTarget::Torrent => dispatcher.dispatch(Action::Editor(EditorAction::NextField)),
            TextTarget::NewFolder | TextTarget::FolderName => {}
        },
        KeyCode::Enter => submit(target, state, dispatcher),
        KeyCode::Esc => match target {
            TextTarget::SignIn => {}
            TextTarget::NewFolder => dispatcher.dispatch(Action::Ui(UiAction::CancelNewFolder)),
            TextTarget::FolderName => dispatcher.dispatch(Action::Editor(EditorAction::Cancel)),
            TextTarget::Torrent => {
                dispatcher.dispatch(Action::Editor(EditorAction::Cancel));
                if let Some(id) = state.route.folder_id() {
                    dispatcher.dispatch(Action::navigate(Route::Folder(id.to_string())));
                }
            }
        },
        _ => {}
    }
}

/// Enter on a focused text field
fn submit(target: TextTarget, state: &AppState, dispatcher: &Dispatcher) {
    match target {
        TextTarget::SignIn => {
            let form = &state.ui.signin;
            if !form.is_complete() {
                return;
            }
            let next = match &state.route {
                Route::SignIn { next } => next.clone(),
                _ => None,
            };
            dispatcher.dispatch(Action::command(Command::SignIn {
                creds: form.credentials(),
                next,
            }));
        }
        TextTarget::NewFolder => {
            let name = state.ui.new_folder.as_deref().unwrap_or_default().trim();
            if name.is_empty() {
                return;
            }
            dispatcher.dispatch(Action::command(Command::CreateFolder(name.to_string())));
            dispatcher.dispatch(Action::Ui(UiAction::CancelNewFolder));
        }
        TextTarget::FolderName => match state.editor.folder.value() {
            Some(folder) if state.editor.folder.is_dirty() => {
                dispatcher.dispatch(Action::command(Command::SaveFolder(folder.clone())));
            }
            _ => dispatcher.dispatch(Action::Editor(EditorAction::Cancel)),
        },
        TextTarget::Torrent => {
            let Route::Torrent(folder_id, torrent_id) = &state.route else {
                return;
            };
            let Some(item) = state.editor.torrent.value() else {
                return;
            };
            if torrent_id == NEW_TORRENT {
                let source = item.url.as_deref().or(item.link.as_deref()).unwrap_or_default();
                if source.trim().is_empty() {
                    return;
                }
                dispatcher.dispatch(Action::command(Command::AddTorrent {
                    folder_id: folder_id.clone(),
                    url_or_info_hash: source.trim().to_string(),
                }));
            } else if state.editor.torrent.is_dirty() {
                let Some(folder) = state.folder.current.clone() else {
                    return;
                };
                dispatcher.dispatch(Action::command(Command::SaveTorrent {
                    folder,
                    item: item.clone(),
                }));
                dispatcher.dispatch(Action::navigate(Route::Folder(folder_id.clone())));
            }
        }
    }
}

fn handle_folders_key(key: KeyEvent, state: &AppState, dispatcher: &Dispatcher) {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => dispatcher.dispatch(Action::Ui(UiAction::CursorNext)),
        KeyCode::Up | KeyCode::Char('k') => {
            dispatcher.dispatch(Action::Ui(UiAction::CursorPrevious))
        }
        KeyCode::Enter => {
            if let Some(folder) = state.folders.folders.get(state.ui.cursor) {
                dispatcher.dispatch(Action::navigate(Route::Folder(folder.id.clone())));
            }
        }
        KeyCode::Char('n') => dispatcher.dispatch(Action::Ui(UiAction::StartNewFolder)),
        KeyCode::Char('r') => {
            dispatcher.dispatch(Action::Folders(FoldersAction::FetchInvalidate));
            dispatcher.dispatch(Action::command(Command::FetchFoldersIfNeeded));
        }
        KeyCode::Char('o') => dispatcher.dispatch(Action::command(Command::SignOut)),
        _ => {}
    }
}

fn handle_folder_key(key: KeyEvent, id: &str, state: &AppState, dispatcher: &Dispatcher) {
    let current = state.folder.current.as_ref().filter(|f| f.id == id);
    let item = current.and_then(|f| f.items.get(state.ui.cursor));

    match key.code {
        KeyCode::Down | KeyCode::Char('j') => dispatcher.dispatch(Action::Ui(UiAction::CursorNext)),
        KeyCode::Up | KeyCode::Char('k') => {
            dispatcher.dispatch(Action::Ui(UiAction::CursorPrevious))
        }
        KeyCode::Enter => {
            if let Some(item) = item {
                dispatcher.dispatch(Action::navigate(Route::Torrent(
                    id.to_string(),
                    item.id.clone(),
                )));
            }
        }
        KeyCode::Char('a') => dispatcher.dispatch(Action::navigate(Route::Torrent(
            id.to_string(),
            NEW_TORRENT.to_string(),
        ))),
        KeyCode::Char('e') => dispatcher.dispatch(Action::Editor(EditorAction::StartRename)),
        KeyCode::Char('d') => {
            if let Some(folder) = current {
                dispatcher.dispatch(Action::Ui(UiAction::Ask(Confirm::DeleteFolder(
                    folder.clone(),
                ))));
            }
        }
        KeyCode::Char('x') => {
            if let (Some(folder), Some(item)) = (current, item) {
                dispatcher.dispatch(Action::Ui(UiAction::Ask(Confirm::DeleteTorrent {
                    folder: folder.clone(),
                    item: item.clone(),
                })));
            }
        }
        KeyCode::Char('r') => {
            dispatcher.dispatch(Action::Folder(FolderAction::FetchInvalidate));
            dispatcher.dispatch(Action::command(Command::FetchFolderIfNeeded(id.to_string())));
        }
        KeyCode::Char('o') => dispatcher.dispatch(Action::command(Command::SignOut)),
        KeyCode::Esc => dispatcher.dispatch(Action::navigate(Route::Folders)),
        _ => {}
    }
}
