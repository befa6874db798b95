use crate::actions::{Action, Command};
use crate::dispatcher::Dispatcher;
use crate::middleware::Middleware;
use crate::state::AppState;

/// LoggingMiddleware - logs all actions passing through
pub struct LoggingMiddleware;

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl Middleware for LoggingMiddleware {
    fn handle(&mut self, action: &Action, _state: &AppState, _dispatcher: &Dispatcher) -> bool {
        match action {
            // Never write passwords to the log file
            Action::Command(Command::SignIn { creds, next }) => {
                log::debug!("Action: SignIn {{ email: {:?}, next: {:?} }}", creds.email, next);
            }
            Action::Command(Command::SignUp(creds)) => {
                log::debug!("Action: SignUp {{ email: {:?} }}", creds.email);
            }
            Action::Ui(crate::actions::UiAction::SignInInput(_)) => {
                log::trace!("Action: SignInInput");
            }
            _ => log::debug!("Action: {:?}", action),
        }

        true // Always pass action through
    }
}
