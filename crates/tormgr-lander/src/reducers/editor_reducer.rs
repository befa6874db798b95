use crate::actions::{Action, EditorAction, FolderAction};
use crate::domain_models::EditState;
use crate::routes::{Route, NEW_TORRENT};
use crate::state::{EditorState, FolderState, TorrentField};
use tormgr_client::{Folder, TorrentItem};

/// Editor reducer
///
/// Runs after the folder slice has been reduced; `folder` and `route` are
/// the already updated slices.
pub fn reduce(
    mut state: EditorState,
    action: &Action,
    folder: &FolderState,
    route: &Route,
) -> EditorState {
    match action {
        Action::Navigate(next) => {
            state.renaming = false;
            state.torrent = torrent_for_route(next, folder.current.as_ref());
            state.field = match next {
                Route::Torrent(_, id) if id == NEW_TORRENT => TorrentField::Url,
                _ => TorrentField::default(),
            };
        }
        Action::Folder(
            FolderAction::Create(value) | FolderAction::Select(value) | FolderAction::Update(value),
        ) => {
            // optimistic update of the edit in progress, or its rollback
            let saved = match &state.folder {
                EditState::Dirty { value: edited, .. } if edited == value => Some(true),
                EditState::Dirty { original, .. } if original == value => Some(false),
                _ => None,
            };
            state.folder = match saved {
                Some(true) => state.folder.save_succeeded(),
                Some(false) => state.folder.save_failed(),
                None => state.folder.loaded(value.clone()),
            };
            state.renaming = false;
            if let Some(item) = routed_item(route, value) {
                state.torrent = state.torrent.loaded(item);
            }
        }
        Action::Folder(FolderAction::FetchComplete { err: None, .. }) => {
            if let (Some(current), EditState::Loading) = (&folder.current, &state.torrent) {
                if let Some(item) = routed_item(route, current) {
                    state.torrent = EditState::Clean(item);
                }
            }
        }
        Action::Folder(FolderAction::Deselect) => {
            state.folder = EditState::Loading;
            state.renaming = false;
        }
        Action::Editor(action) => match action {
            EditorAction::StartRename => {
                state.renaming = state.folder.value().is_some();
            }
            EditorAction::FolderName(edit) => {
                state.folder = state.folder.edit(|f| edit.apply(&mut f.name));
            }
            EditorAction::TorrentField(edit) => {
                let field = state.field;
                state.torrent = state.torrent.edit(|t| edit.apply(field.text_mut(t)));
            }
            EditorAction::NextField => {
                state.field = state.field.next();
            }
            EditorAction::Cancel => {
                state.folder = state.folder.cancel();
                state.torrent = state.torrent.cancel();
                state.renaming = false;
            }
        },
        _ => {}
    }
    state
}

fn routed_item(route: &Route, folder: &Folder) -> Option<TorrentItem> {
    match route {
        Route::Torrent(folder_id, id) if *folder_id == folder.id && id != NEW_TORRENT => {
            folder.items.iter().find(|i| i.id == *id).cloned()
        }
        _ => None,
    }
}

fn torrent_for_route(route: &Route, current: Option<&Folder>) -> EditState<TorrentItem> {
    match route {
        Route::Torrent(_, id) if id == NEW_TORRENT => EditState::new_entity(TorrentItem::default()),
        Route::Torrent(..) => current
            .and_then(|folder| routed_item(route, folder))
            .map(EditState::Clean)
            .unwrap_or_default(),
        _ => EditState::Loading,
    }
}
