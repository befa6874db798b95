//! Plain actions for the folder slices
//!
//! These are what reducers see. Anything that talks to the server is a
//! [`Command`](super::Command) instead.

use crate::state::OpId;
use tormgr_client::{Folder, FolderId, TorrentItem};

/// Begin/complete markers of one async operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsyncAction {
    Begin { op: OpId, label: String },
    Complete(OpId),
}

/// Folder list slice
#[derive(Debug, Clone, PartialEq)]
pub enum FoldersAction {
    FetchBegin,
    FetchInvalidate,
    FetchComplete {
        folders: Vec<Folder>,
        err: Option<String>,
    },
    Update(Folder),
    Delete(Folder),
}

/// Current folder slice
#[derive(Debug, Clone, PartialEq)]
pub enum FolderAction {
    FetchBegin(FolderId),
    FetchInvalidate,
    FetchComplete {
        folder_id: FolderId,
        torrents: Vec<TorrentItem>,
        err: Option<String>,
    },
    Create(Folder),
    Select(Folder),
    Deselect,
    Update(Folder),
    TorrentDelete { folder: Folder, item: TorrentItem },
}
