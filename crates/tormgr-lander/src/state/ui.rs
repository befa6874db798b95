//! Transient view state: cursor, forms, confirmation prompt

use tormgr_client::{Credentials, Folder, TorrentItem};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignInField {
    #[default]
    Email,
    Password,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
    pub field: SignInField,
}

impl SignInForm {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.email.trim(), self.password.clone())
    }

    /// Both fields are required
    pub fn is_complete(&self) -> bool {
        !self.email.trim().is_empty() && !self.password.is_empty()
    }
}

/// Destructive action waiting for a yes/no answer
#[derive(Debug, Clone, PartialEq)]
pub enum Confirm {
    DeleteFolder(Folder),
    DeleteTorrent { folder: Folder, item: TorrentItem },
}

impl Confirm {
    pub fn prompt(&self) -> String {
        match self {
            Self::DeleteFolder(folder) => format!(
                "Delete folder {}? This action cannot be undone. (y/n)",
                folder.name
            ),
            Self::DeleteTorrent { item, .. } => format!("Delete torrent {}? (y/n)", item.title),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    /// Selected row of the list on screen
    pub cursor: usize,
    pub signin: SignInForm,
    /// Name typed for a folder being created
    pub new_folder: Option<String>,
    pub confirm: Option<Confirm>,
}
