//! Routes and the access guard
//!
//! ```text
//! /                          -> /folders
//! /signin[?next=<path>]      anonymous
//! /folders                   folder list
//! /folders/:id               one folder with its torrents
//! /folders/:id/:torrent_id   torrent detail (`new` adds a torrent)
//! ```

use tormgr_client::{FolderId, TorrentId};

/// Torrent id segment that opens the add form instead of an existing item
pub const NEW_TORRENT: &str = "new";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Route {
    #[default]
    Root,
    SignIn { next: Option<String> },
    Folders,
    Folder(FolderId),
    Torrent(FolderId, TorrentId),
}

impl Route {
    pub fn parse(path: &str) -> Option<Self> {
        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path, None),
        };
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Some(Self::Root),
            ["signin"] => Some(Self::SignIn {
                next: query.and_then(|q| {
                    q.split('&')
                        .find_map(|pair| pair.strip_prefix("next="))
                        .filter(|next| !next.is_empty())
                        .map(str::to_string)
                }),
            }),
            ["folders"] => Some(Self::Folders),
            ["folders", id] => Some(Self::Folder(id.to_string())),
            ["folders", id, torrent] => Some(Self::Torrent(id.to_string(), torrent.to_string())),
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Root => "/".to_string(),
            Self::SignIn { next: None } => "/signin".to_string(),
            Self::SignIn { next: Some(next) } => format!("/signin?next={next}"),
            Self::Folders => "/folders".to_string(),
            Self::Folder(id) => format!("/folders/{id}"),
            Self::Torrent(id, torrent) => format!("/folders/{id}/{torrent}"),
        }
    }

    /// Routes reachable without a session
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::SignIn { .. })
    }

    /// Folder shown by this route, if any
    pub fn folder_id(&self) -> Option<&str> {
        match self {
            Self::Folder(id) | Self::Torrent(id, _) => Some(id),
            _ => None,
        }
    }
}

/// Where a navigation to `route` actually lands
///
/// `/` always forwards to `/folders`. Signed-out users asking for a
/// protected route are sent to `/signin?next=<path>`; signed-in users
/// asking for the sign-in form go home.
pub fn resolve(route: Route, signed_in: bool) -> Route {
    let route = match route {
        Route::Root => Route::Folders,
        route => route,
    };

    if !signed_in && !route.is_anonymous() {
        return Route::SignIn {
            next: Some(route.path()),
        };
    }
    if signed_in && route.is_anonymous() {
        return Route::Folders;
    }
    route
}
