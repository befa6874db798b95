//! Actions module
//!
//! Tagged by slice. Plain actions are reduced; [`Command`]s are consumed by
//! the API middleware and turn into plain actions around a network call.

pub mod command;
pub mod folders;
pub mod global;
pub mod input;

pub use command::Command;
pub use folders::{AsyncAction, FolderAction, FoldersAction};
pub use global::GlobalAction;
pub use input::{EditorAction, StatusBarAction, TextEdit, UiAction};

use crate::routes::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    /// Session state found at startup
    Restored {
        signed_in: bool,
        email: Option<String>,
    },
    SignedIn { email: Option<String> },
    Failed(String),
    /// Local session cleared (explicit sign-out or rejected token)
    SignedOut,
}

/// Root action enum - tagged by slice
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Global(GlobalAction),
    Async(AsyncAction),
    Folders(FoldersAction),
    Folder(FolderAction),
    Auth(AuthAction),
    /// Go to a route; the navigation middleware applies the access guard
    Navigate(Route),
    Command(Command),
    Editor(EditorAction),
    Ui(UiAction),
    StatusBar(StatusBarAction),
}

impl Action {
    pub fn navigate(route: Route) -> Action {
        Action::Navigate(route)
    }

    pub fn command(command: Command) -> Action {
        Action::Command(command)
    }
}
