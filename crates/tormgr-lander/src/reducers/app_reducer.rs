use crate::actions::{Action, AuthAction, GlobalAction, StatusBarAction};
use crate::reducers::{editor_reducer, folders_reducer, session_reducer, ui_reducer};
use crate::routes::Route;
use crate::state::{AppState, FolderState, FoldersState, StatusMessage};

/// Reducer - pure function that produces new state from current state + action
/// This is the root reducer that orchestrates all sub-reducers
pub fn reduce(mut state: AppState, action: &Action) -> AppState {
    match action {
        Action::Global(GlobalAction::Quit) => {
            state.running = false;
            return state;
        }
        Action::Navigate(route) => {
            log::debug!("Route: {}", route.path());
            state.route = route.clone();
        }
        Action::Auth(AuthAction::SignedOut) => {
            // cached data belongs to the previous user
            state.folders = FoldersState::default();
            state.folder = FolderState::default();
            state.torrents_by_folder.clear();
        }
        Action::StatusBar(StatusBarAction::Push {
            kind,
            message,
            source,
        }) => {
            state
                .status_bar
                .push(StatusMessage::new(*kind, message.clone(), source.clone()));
        }
        _ => {}
    }

    state.async_state = session_reducer::reduce_async(state.async_state, action);
    state.auth = session_reducer::reduce_auth(state.auth, action);
    state.folders = folders_reducer::reduce_folders(state.folders, action);
    state.folder = folders_reducer::reduce_folder(state.folder, action);
    state.torrents_by_folder =
        folders_reducer::reduce_torrents_by_folder(state.torrents_by_folder, action);
    state.editor = editor_reducer::reduce(state.editor, action, &state.folder, &state.route);

    let list_len = visible_list_len(&state);
    state.ui = ui_reducer::reduce(state.ui, action, list_len);

    state
}

/// Rows of the list the cursor moves over on the current route
pub fn visible_list_len(state: &AppState) -> usize {
    match state.route {
        Route::Folders => state.folders.folders.len(),
        Route::Folder(_) | Route::Torrent(..) => state
            .folder
            .current
            .as_ref()
            .map_or(0, |folder| folder.items.len()),
        Route::Root | Route::SignIn { .. } => 0,
    }
}
