use crate::actions::{Action, FolderAction, FoldersAction};
use crate::state::{FetchState, FolderState, FoldersState};
use std::collections::HashMap;
use tormgr_client::{FolderId, TorrentItem};

/// Folder list reducer
pub fn reduce_folders(mut state: FoldersState, action: &Action) -> FoldersState {
    let Action::Folders(action) = action else {
        return state;
    };

    match action {
        FoldersAction::FetchBegin => {
            state.fetch = state.fetch.begin();
        }
        FoldersAction::FetchInvalidate => {
            state.fetch = state.fetch.invalidate();
        }
        FoldersAction::FetchComplete { folders, err } => {
            state.folders = folders.clone();
            state.fetch = state.fetch.complete(err.clone());
        }
        FoldersAction::Update(folder) => state.upsert(folder.clone()),
        FoldersAction::Delete(folder) => state.remove(&folder.id),
    }
    state
}

/// Current folder reducer
pub fn reduce_folder(mut state: FolderState, action: &Action) -> FolderState {
    match action {
        Action::Navigate(route) => {
            // torrents belong to one folder; showing another one makes them stale
            if let Some(id) = route.folder_id() {
                if state.folder_id.as_deref() != Some(id) {
                    state.folder_id = Some(id.to_string());
                    state.fetch = FetchState::default();
                    state.torrents.clear();
                }
            }
        }
        Action::Folder(action) => match action {
            FolderAction::FetchBegin(id) => {
                state.folder_id = Some(id.clone());
                state.fetch = state.fetch.begin();
            }
            FolderAction::FetchInvalidate => {
                state.fetch = state.fetch.invalidate();
            }
            FolderAction::FetchComplete {
                folder_id,
                torrents,
                err,
            } => {
                if state.folder_id.as_ref() != Some(folder_id) {
                    log::debug!("Dropping torrents of folder {folder_id}: no longer shown");
                    return state;
                }
                state.fetch = state.fetch.complete(err.clone());
                state.torrents = torrents.clone();
                if err.is_none() {
                    if let Some(current) = state.current.as_mut().filter(|f| f.id == *folder_id) {
                        current.items = torrents.clone();
                    }
                }
            }
            FolderAction::Select(folder) => {
                let mut folder = folder.clone();
                // torrents may have arrived before the folder list
                if state.folder_id.as_ref() == Some(&folder.id)
                    && !state.fetch.should_fetch()
                    && state.fetch.err.is_none()
                {
                    folder.items = state.torrents.clone();
                }
                state.current = Some(folder);
            }
            FolderAction::Create(folder) | FolderAction::Update(folder) => {
                state.current = Some(folder.clone());
            }
            FolderAction::Deselect => {
                state.current = None;
            }
            FolderAction::TorrentDelete { folder, item } => {
                state.current = Some(folder.without_item(item));
                state.torrents.retain(|t| t != item);
            }
        },
        _ => {}
    }
    state
}

/// Last torrents loaded per folder
pub fn reduce_torrents_by_folder(
    mut state: HashMap<FolderId, Vec<TorrentItem>>,
    action: &Action,
) -> HashMap<FolderId, Vec<TorrentItem>> {
    match action {
        Action::Folder(FolderAction::FetchComplete {
            folder_id,
            torrents,
            err: None,
        }) => {
            state.insert(folder_id.clone(), torrents.clone());
        }
        Action::Folder(FolderAction::TorrentDelete { folder, item }) => {
            if let Some(torrents) = state.get_mut(&folder.id) {
                torrents.retain(|t| t != item);
            }
        }
        _ => {}
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::Route;
    use pretty_assertions::assert_eq;
    use tormgr_client::Folder;

    fn item(id: &str) -> TorrentItem {
        TorrentItem {
            id: id.to_string(),
            title: id.to_uppercase(),
            ..TorrentItem::default()
        }
    }

    #[test]
    fn test_invalidate_is_idempotent() {
        let state = reduce_folders(
            FoldersState::default(),
            &Action::Folders(FoldersAction::FetchComplete {
                folders: vec![Folder::new("1", "A")],
                err: None,
            }),
        );
        let invalidate = Action::Folders(FoldersAction::FetchInvalidate);

        let once = reduce_folders(state, &invalidate);
        let twice = reduce_folders(once.clone(), &invalidate);

        assert_eq!(once, twice);
        assert!(once.fetch.did_invalidate);
    }

    #[test]
    fn test_fetch_complete_replaces_list() {
        let mut state = FoldersState::default();
        state.upsert(Folder::new("9", "Old"));
        let state = reduce_folders(state, &Action::Folders(FoldersAction::FetchBegin));
        assert!(state.fetch.is_fetching);

        let state = reduce_folders(
            state,
            &Action::Folders(FoldersAction::FetchComplete {
                folders: vec![],
                err: Some("Unexpected status 500".to_string()),
            }),
        );

        assert!(state.folders.is_empty());
        assert!(!state.fetch.is_fetching);
        assert!(!state.fetch.did_invalidate);
        assert_eq!(state.fetch.err.as_deref(), Some("Unexpected status 500"));
    }

    #[test]
    fn test_unrelated_actions_are_identity() {
        let state = FoldersState::default();
        let next = reduce_folders(state.clone(), &Action::Folder(FolderAction::Deselect));
        assert_eq!(next, state);

        let folder = FolderState::default();
        let next = reduce_folder(folder.clone(), &Action::Folders(FoldersAction::FetchBegin));
        assert_eq!(next, folder);
    }

    #[test]
    fn test_navigating_to_other_folder_makes_torrents_stale() {
        let state = FolderState {
            folder_id: Some("1".to_string()),
            fetch: FetchState::default().begin().complete(None),
            torrents: vec![item("a")],
            ..FolderState::default()
        };

        let same = reduce_folder(state.clone(), &Action::Navigate(Route::Folder("1".to_string())));
        assert_eq!(same, state);

        let other = reduce_folder(state, &Action::Navigate(Route::Folder("2".to_string())));
        assert_eq!(other.folder_id.as_deref(), Some("2"));
        assert!(other.fetch.should_fetch());
        assert!(other.torrents.is_empty());
    }

    #[test]
    fn test_fetch_complete_fills_current_folder() {
        let state = FolderState {
            current: Some(Folder::new("1", "A")),
            ..FolderState::default()
        };
        let state = reduce_folder(state, &Action::Folder(FolderAction::FetchBegin("1".to_string())));
        let complete = Action::Folder(FolderAction::FetchComplete {
            folder_id: "1".to_string(),
            torrents: vec![item("a"), item("b")],
            err: None,
        });

        let state = reduce_folder(state, &complete);
        let by_folder = reduce_torrents_by_folder(HashMap::new(), &complete);

        assert_eq!(state.current.map(|f| f.items.len()), Some(2));
        assert_eq!(by_folder.get("1").map(Vec::len), Some(2));
    }

    #[test]
    fn test_select_picks_up_loaded_torrents() {
        let state = FolderState {
            folder_id: Some("1".to_string()),
            fetch: FetchState::default().begin().complete(None),
            torrents: vec![item("a")],
            ..FolderState::default()
        };

        let state = reduce_folder(state, &Action::Folder(FolderAction::Select(Folder::new("1", "A"))));

        assert_eq!(state.current.map(|f| f.items), Some(vec![item("a")]));
    }

    #[test]
    fn test_stale_completion_is_dropped() {
        let state = FolderState {
            folder_id: Some("2".to_string()),
            ..FolderState::default()
        };
        let next = reduce_folder(
            state.clone(),
            &Action::Folder(FolderAction::FetchComplete {
                folder_id: "1".to_string(),
                torrents: vec![item("a")],
                err: None,
            }),
        );
        assert_eq!(next, state);
    }

    #[test]
    fn test_torrent_delete_keeps_other_items() {
        let mut folder = Folder::new("1", "A");
        folder.items = vec![item("a"), item("b")];

        let state = reduce_folder(
            FolderState::default(),
            &Action::Folder(FolderAction::TorrentDelete {
                folder: folder.clone(),
                item: item("a"),
            }),
        );

        assert_eq!(state.current.map(|f| f.items), Some(vec![item("b")]));
    }
}
