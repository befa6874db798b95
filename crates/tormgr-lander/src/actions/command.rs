//! Commands - actions that need the server
//!
//! Commands never reach a reducer. The API middleware consumes them, reads
//! the state snapshot, and dispatches plain actions before and after the
//! network call.

use tormgr_client::{Credentials, Folder, FolderId, TorrentItem};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FetchFoldersIfNeeded,
    FetchFolderIfNeeded(FolderId),
    /// Make sure folders are loaded, then select this one (or leave)
    FetchCurrentFolderIfNeeded(FolderId),
    CreateFolder(String),
    /// Optimistic rename with rollback
    SaveFolder(Folder),
    /// Optimistic item update with rollback
    SaveTorrent { folder: Folder, item: TorrentItem },
    DeleteFolder(Folder),
    DeleteTorrent { folder: Folder, item: TorrentItem },
    AddTorrent {
        folder_id: FolderId,
        url_or_info_hash: String,
    },
    SignIn {
        creds: Credentials,
        next: Option<String>,
    },
    SignUp(Credentials),
    SignOut,
}

impl Command {
    /// Label shown while the command is in flight
    pub fn label(&self) -> &'static str {
        match self {
            Self::FetchFoldersIfNeeded => "Loading folders",
            Self::FetchFolderIfNeeded(_) => "Loading torrents",
            Self::FetchCurrentFolderIfNeeded(_) => "Loading folder",
            Self::CreateFolder(_) => "Creating folder",
            Self::SaveFolder(_) => "Saving folder",
            Self::SaveTorrent { .. } => "Saving torrent",
            Self::DeleteFolder(_) => "Deleting folder",
            Self::DeleteTorrent { .. } => "Deleting torrent",
            Self::AddTorrent { .. } => "Adding torrent",
            Self::SignIn { .. } => "Signing in",
            Self::SignUp(_) => "Signing up",
            Self::SignOut => "Signing out",
        }
    }
}
