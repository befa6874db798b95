use crate::actions::Action;
use crate::dispatcher::Dispatcher;
use crate::middleware::Middleware;
use crate::reducers::app_reducer::reduce;
use crate::state::AppState;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

/// Store - holds application state and manages the Redux loop
///
/// Single writer: state only changes inside [`Store::dispatch`] and
/// [`Store::drain`], on the thread that owns the store.
pub struct Store {
    state: AppState,
    middleware: Vec<Box<dyn Middleware>>,
    dispatcher: Dispatcher,
    action_rx: UnboundedReceiver<Action>,
}

impl Store {
    pub fn new(initial_state: AppState) -> Self {
        let (action_tx, action_rx) = unbounded_channel();
        Self {
            state: initial_state,
            middleware: Vec::new(),
            dispatcher: Dispatcher::new(action_tx),
            action_rx,
        }
    }

    /// Add middleware to the store; they run in insertion order
    pub fn add_middleware(&mut self, middleware: Box<dyn Middleware>) {
        self.middleware.push(middleware);
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Process an action and everything it dispatches synchronously
    ///
    /// Actions that middleware dispatched while handling `action` (such as
    /// begin markers) are reduced before this returns.
    pub fn dispatch(&mut self, action: Action) {
        self.process(action);
        self.drain();
    }

    /// Process every queued action, including completions from spawned tasks
    pub fn drain(&mut self) {
        while let Ok(action) = self.action_rx.try_recv() {
            self.process(action);
        }
    }

    /// Wait for completions until no async operation is pending
    pub async fn run_until_idle(&mut self) {
        self.drain();
        while self.state.async_state.in_progress() {
            match self.action_rx.recv().await {
                Some(action) => {
                    self.process(action);
                    self.drain();
                }
                None => break,
            }
        }
    }

    fn process(&mut self, action: Action) {
        let mut should_reduce = true;

        for middleware in &mut self.middleware {
            if !middleware.handle(&action, &self.state, &self.dispatcher) {
                should_reduce = false;
                break;
            }
        }

        if should_reduce {
            self.state = reduce(std::mem::take(&mut self.state), &action);
        }
    }
}
