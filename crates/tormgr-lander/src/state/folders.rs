//! Folder list and current folder slices

use super::FetchState;
use tormgr_client::{Folder, FolderId, TorrentItem};

/// All folders, keyed by id, in server order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FoldersState {
    pub fetch: FetchState,
    pub folders: Vec<Folder>,
}

impl FoldersState {
    pub fn get(&self, id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    /// Replace the folder with the same id in place, or append it
    pub fn upsert(&mut self, folder: Folder) {
        match self.folders.iter_mut().find(|f| f.id == folder.id) {
            Some(existing) => *existing = folder,
            None => self.folders.push(folder),
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.folders.retain(|f| f.id != id);
    }
}

/// Folder currently shown and the torrents loaded for it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FolderState {
    pub current: Option<Folder>,
    /// Folder the `fetch` gate and `torrents` belong to
    pub folder_id: Option<FolderId>,
    pub fetch: FetchState,
    pub torrents: Vec<TorrentItem>,
}
