//! Context menu offered on links
//!
//! Signed-in users get one "add to <folder>" entry per folder; everyone else
//! gets a single sign-in entry. The menu is rebuilt whenever the bridge host
//! reports a successful call.

use regex::Regex;
use std::sync::{OnceLock, PoisonError};
use tormgr_client::{ApiError, Endpoints, Folder, FolderId, NewTorrent, TorrentItem};
use tormgr_config::SharedSession;

pub const SIGNIN_ITEM_ID: &str = "signin";
pub const LINK_CONTEXT: &str = "link";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub id: String,
    pub title: String,
    pub contexts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuClick {
    AddTo(FolderId),
    SignIn,
}

pub fn build_menu(signed_in: bool, folders: &[Folder]) -> Vec<MenuItem> {
    if !signed_in {
        return vec![MenuItem {
            id: SIGNIN_ITEM_ID.to_string(),
            title: "Sign in to add folders".to_string(),
            contexts: vec![LINK_CONTEXT.to_string()],
        }];
    }

    folders
        .iter()
        .map(|folder| MenuItem {
            id: format!("folders.{}", folder.id),
            title: format!("add to {}", folder.name),
            contexts: vec![LINK_CONTEXT.to_string()],
        })
        .collect()
}

/// Map a clicked menu id back to its meaning
pub fn parse_click(menu_item_id: &str) -> Option<MenuClick> {
    if menu_item_id == SIGNIN_ITEM_ID {
        return Some(MenuClick::SignIn);
    }
    static FOLDER_ITEM_ID: OnceLock<Regex> = OnceLock::new();

    let re = FOLDER_ITEM_ID.get_or_init(|| Regex::new(r"^folders\.(.+)$").unwrap());
    re.captures(menu_item_id)
        .and_then(|caps| caps.get(1))
        .map(|id| MenuClick::AddTo(id.as_str().to_string()))
}

#[derive(Clone)]
pub struct MenuController {
    endpoints: Endpoints,
    session: SharedSession,
}

impl MenuController {
    pub fn new(endpoints: Endpoints, session: SharedSession) -> Self {
        Self { endpoints, session }
    }

    fn signed_in(&self) -> bool {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_signed_in()
    }

    /// Current menu; a failed folder fetch yields an empty menu
    pub async fn refresh(&self) -> Vec<MenuItem> {
        if !self.signed_in() {
            return build_menu(false, &[]);
        }
        match self.endpoints.folders.get_all().await {
            Ok(folders) => build_menu(true, &folders),
            Err(e) => {
                log::warn!("menu: failed to load folders: {e}");
                Vec::new()
            }
        }
    }

    /// Handle a click on `menu_item_id` for the link at `link_url`
    ///
    /// Returns the created item for folder entries, `None` otherwise.
    pub async fn on_click(
        &self,
        menu_item_id: &str,
        link_url: &str,
    ) -> Result<Option<TorrentItem>, ApiError> {
        match parse_click(menu_item_id) {
            Some(MenuClick::AddTo(folder)) => {
                let torrent = NewTorrent {
                    folder,
                    url_or_info_hash: link_url.to_string(),
                };
                let item = self.endpoints.torrents.create(&torrent).await?;
                log::info!("menu: added {} to folder {}", link_url, torrent.folder);
                Ok(Some(item))
            }
            Some(MenuClick::SignIn) => {
                log::debug!("menu: sign-in requested");
                Ok(None)
            }
            None => {
                log::debug!("menu: ignoring click on '{menu_item_id}'");
                Ok(None)
            }
        }
    }
}
