//! Navigation Middleware
//!
//! Applies the route guard to every `Navigate` and starts the loaders a
//! route needs. A guarded navigation is consumed and re-dispatched with the
//! route it resolves to.

use crate::actions::{Action, AuthAction, Command};
use crate::dispatcher::Dispatcher;
use crate::middleware::Middleware;
use crate::routes::{resolve, Route};
use crate::state::AppState;
use std::sync::PoisonError;
use tormgr_config::SharedSession;

pub struct NavigationMiddleware {
    session: SharedSession,
}

impl NavigationMiddleware {
    pub fn new(session: SharedSession) -> Self {
        Self { session }
    }

    fn signed_in(&self) -> bool {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_signed_in()
    }
}

impl Middleware for NavigationMiddleware {
    fn handle(&mut self, action: &Action, state: &AppState, dispatcher: &Dispatcher) -> bool {
        match action {
            Action::Navigate(route) => {
                let resolved = resolve(route.clone(), self.signed_in());
                if resolved != *route {
                    log::debug!("Redirecting {} to {}", route.path(), resolved.path());
                    dispatcher.dispatch(Action::navigate(resolved));
                    return false;
                }

                match route {
                    Route::Folders => {
                        dispatcher.dispatch(Action::command(Command::FetchFoldersIfNeeded));
                    }
                    Route::Folder(id) | Route::Torrent(id, _) => {
                        dispatcher.dispatch(Action::command(Command::FetchCurrentFolderIfNeeded(
                            id.clone(),
                        )));
                        dispatcher.dispatch(Action::command(Command::FetchFolderIfNeeded(
                            id.clone(),
                        )));
                    }
                    Route::Root | Route::SignIn { .. } => {}
                }
                true
            }
            Action::Auth(AuthAction::SignedOut) => {
                if !state.route.is_anonymous() {
                    dispatcher.dispatch(Action::navigate(Route::SignIn { next: None }));
                }
                true
            }
            _ => true,
        }
    }
}
