//! Auth and async-operation reducers

use crate::actions::{Action, AsyncAction, AuthAction};
use crate::state::{AsyncState, AuthState};

pub fn reduce_auth(mut state: AuthState, action: &Action) -> AuthState {
    let Action::Auth(action) = action else {
        return state;
    };

    match action {
        AuthAction::Restored { signed_in, email } => {
            state.signed_in = *signed_in;
            state.email = email.clone();
        }
        AuthAction::SignedIn { email } => {
            state.signed_in = true;
            state.email = email.clone();
            state.err = None;
        }
        AuthAction::Failed(err) => {
            state.err = Some(err.clone());
        }
        AuthAction::SignedOut => {
            state.signed_in = false;
            state.email = None;
        }
    }
    state
}

/// Tracks every operation between its begin and complete markers
pub fn reduce_async(mut state: AsyncState, action: &Action) -> AsyncState {
    match action {
        Action::Async(AsyncAction::Begin { op, label }) => {
            state.pending.insert(*op, label.clone());
        }
        Action::Async(AsyncAction::Complete(op)) => {
            if state.pending.remove(op).is_none() {
                log::warn!("Completed unknown operation {op:?}");
            }
        }
        _ => {}
    }
    state
}
