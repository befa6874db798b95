use crate::actions::{Action, AuthAction, UiAction};
use crate::state::{SignInField, UiState};

/// UI reducer; `list_len` is the length of the list on screen
pub fn reduce(mut state: UiState, action: &Action, list_len: usize) -> UiState {
    match action {
        Action::Navigate(_) => {
            state.cursor = 0;
            state.new_folder = None;
            state.confirm = None;
        }
        Action::Auth(AuthAction::SignedIn { .. }) => {
            state.signin = Default::default();
        }
        Action::Auth(AuthAction::Failed(_)) => {
            state.signin.password.clear();
        }
        Action::Ui(action) => match action {
            UiAction::CursorNext => {
                state.cursor = (state.cursor + 1).min(list_len.saturating_sub(1));
            }
            UiAction::CursorPrevious => {
                state.cursor = state.cursor.saturating_sub(1);
            }
            UiAction::SignInInput(edit) => {
                let text = match state.signin.field {
                    SignInField::Email => &mut state.signin.email,
                    SignInField::Password => &mut state.signin.password,
                };
                edit.apply(text);
            }
            UiAction::SignInNextField => {
                state.signin.field = match state.signin.field {
                    SignInField::Email => SignInField::Password,
                    SignInField::Password => SignInField::Email,
                };
            }
            UiAction::StartNewFolder => {
                state.new_folder = Some(String::new());
            }
            UiAction::NewFolderInput(edit) => {
                if let Some(name) = state.new_folder.as_mut() {
                    edit.apply(name);
                }
            }
            UiAction::CancelNewFolder => {
                state.new_folder = None;
            }
            UiAction::Ask(confirm) => {
                state.confirm = Some(confirm.clone());
            }
            UiAction::DismissConfirm => {
                state.confirm = None;
            }
        },
        _ => {}
    }

    // lists shrink on delete and refetch
    state.cursor = state.cursor.min(list_len.saturating_sub(1));
    state
}
