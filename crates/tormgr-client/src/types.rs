//! Domain types exchanged with the tormgr API

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type FolderId = String;
pub type TorrentId = String;

/// A named collection of torrent items, exposed as an RSS-like feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    /// Feed URL of this folder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default)]
    pub items: Vec<TorrentItem>,
}

impl Folder {
    pub fn new(id: impl Into<FolderId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            link: None,
            items: Vec::new(),
        }
    }

    /// Copy of this folder with `item` replacing any item of the same id
    ///
    /// The replaced item moves to the end of the list (filter, then append).
    pub fn with_item(&self, item: TorrentItem) -> Self {
        let mut items: Vec<TorrentItem> = self
            .items
            .iter()
            .filter(|existing| existing.id != item.id)
            .cloned()
            .collect();
        items.push(item);
        Self {
            items,
            ..self.clone()
        }
    }

    /// Copy of this folder without items equal to `item`
    pub fn without_item(&self, item: &TorrentItem) -> Self {
        Self {
            items: self
                .items
                .iter()
                .filter(|existing| *existing != item)
                .cloned()
                .collect(),
            ..self.clone()
        }
    }
}

/// One entry within a folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TorrentItem {
    pub id: TorrentId,
    /// Owning folder; the only field the API persists on update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<FolderId>,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<String>,
}

/// Request body for adding a torrent to a folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTorrent {
    pub folder: FolderId,
    pub url_or_info_hash: String,
}

/// Signed-in user as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Email/password pair for sign-up and sign-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Session payload returned by sign-up and sign-in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SessionData {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}
