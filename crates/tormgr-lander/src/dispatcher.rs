//! Dispatcher for middleware action dispatch
//!
//! Actions dispatched here re-enter the store from the beginning of the
//! middleware chain. Middleware uses it for follow-up actions, and tasks
//! spawned on the runtime use a clone to report completions.

use crate::actions::Action;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone)]
pub struct Dispatcher {
    action_tx: UnboundedSender<Action>,
}

impl Dispatcher {
    pub fn new(action_tx: UnboundedSender<Action>) -> Self {
        Self { action_tx }
    }

    pub fn dispatch(&self, action: Action) {
        if let Err(e) = self.action_tx.send(action) {
            log::error!("Dispatcher: failed to send action: {}", e);
        }
    }
}
