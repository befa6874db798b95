//! Application State

pub mod editor;
pub mod fetch;
pub mod folders;
pub mod status_bar;
pub mod ui;

pub use editor::{EditorState, TorrentField};
pub use fetch::{AsyncState, FetchState, OpId};
pub use folders::{FolderState, FoldersState};
pub use status_bar::{StatusBarState, StatusKind, StatusMessage};
pub use ui::{Confirm, SignInField, SignInForm, UiState};

use crate::routes::Route;
use std::collections::HashMap;
use tormgr_client::{FolderId, TorrentItem};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub signed_in: bool,
    pub email: Option<String>,
    /// Last sign-in/sign-up failure, shown under the form
    pub err: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub running: bool,
    pub route: Route,
    pub async_state: AsyncState,
    pub folders: FoldersState,
    pub folder: FolderState,
    pub torrents_by_folder: HashMap<FolderId, Vec<TorrentItem>>,
    pub auth: AuthState,
    pub editor: EditorState,
    pub ui: UiState,
    pub status_bar: StatusBarState,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            running: true,
            route: Route::default(),
            async_state: AsyncState::default(),
            folders: FoldersState::default(),
            folder: FolderState::default(),
            torrents_by_folder: HashMap::new(),
            auth: AuthState::default(),
            editor: EditorState::default(),
            ui: UiState::default(),
            status_bar: StatusBarState::default(),
        }
    }
}
