//! API Middleware
//!
//! Runs every [`Command`]: reads the state snapshot, dispatches the plain
//! actions that go before the network call, and spawns the call on the
//! runtime. Each call is bracketed by an async begin/complete pair so the
//! status bar knows something is in flight.
//!
//! Fetch commands are gated on [`FetchState::should_fetch`]. The gate reads
//! the snapshot the command was handled with, so two fetch commands queued
//! in the same batch can both pass it; sequential callers collapse to one
//! request.

use crate::actions::{
    Action, AsyncAction, AuthAction, Command, FolderAction, FoldersAction, StatusBarAction,
};
use crate::dispatcher::Dispatcher;
use crate::domain_models::adjacent_folder;
use crate::middleware::Middleware;
use crate::routes::{Route, NEW_TORRENT};
use crate::state::{AppState, FetchState, OpId};
use std::future::Future;
use tokio::runtime::Handle;
use tormgr_client::{ApiError, Credentials, Endpoints, Folder, FolderId, NewTorrent, TorrentItem};

pub struct ApiMiddleware {
    endpoints: Endpoints,
    runtime: Handle,
    next_op: u64,
    /// Folder to select once the folder list arrives
    pending_select: Option<FolderId>,
}

impl ApiMiddleware {
    pub fn new(endpoints: Endpoints, runtime: Handle) -> Self {
        Self {
            endpoints,
            runtime,
            next_op: 0,
            pending_select: None,
        }
    }

    /// Dispatch the begin marker of a new operation
    fn begin(&mut self, label: &str, dispatcher: &Dispatcher) -> OpId {
        self.next_op += 1;
        let op = OpId(self.next_op);
        dispatcher.dispatch(Action::Async(AsyncAction::Begin {
            op,
            label: label.to_string(),
        }));
        op
    }

    /// Run `task` on the runtime, then dispatch the complete marker of `op`
    fn spawn<F>(&self, op: OpId, dispatcher: &Dispatcher, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let dispatcher = dispatcher.clone();
        self.runtime.spawn(async move {
            task.await;
            dispatcher.dispatch(Action::Async(AsyncAction::Complete(op)));
        });
    }

    fn run(&mut self, command: &Command, state: &AppState, dispatcher: &Dispatcher) {
        let label = command.label();
        match command {
            Command::FetchFoldersIfNeeded => self.fetch_folders(state, dispatcher),
            Command::FetchFolderIfNeeded(id) => self.fetch_folder(id, state, dispatcher),
            Command::FetchCurrentFolderIfNeeded(id) => {
                let folders = &state.folders.fetch;
                if folders.is_fetching || folders.should_fetch() {
                    self.pending_select = Some(id.clone());
                    self.fetch_folders(state, dispatcher);
                } else {
                    select_folder(id, &state.folders.folders, state, dispatcher);
                }
            }
            Command::CreateFolder(name) => {
                let api = self.endpoints.folders.clone();
                let name = name.clone();
                let d = dispatcher.clone();
                let op = self.begin(label, dispatcher);
                self.spawn(op, dispatcher, async move {
                    match api.create(&name).await {
                        Ok(folder) => {
                            log::info!("Created folder {} ({})", folder.name, folder.id);
                            let route = Route::Folder(folder.id.clone());
                            d.dispatch(Action::Folder(FolderAction::Create(folder.clone())));
                            d.dispatch(Action::Folders(FoldersAction::Update(folder)));
                            d.dispatch(Action::navigate(route));
                        }
                        Err(e) => report(&d, label, &e),
                    }
                });
            }
            Command::SaveFolder(folder) => {
                let rollback = rollback_actions(state, folder);
                dispatcher.dispatch(Action::Folder(FolderAction::Update(folder.clone())));
                dispatcher.dispatch(Action::Folders(FoldersAction::Update(folder.clone())));

                let api = self.endpoints.folders.clone();
                let folder = folder.clone();
                let d = dispatcher.clone();
                let op = self.begin(label, dispatcher);
                self.spawn(op, dispatcher, async move {
                    match api.update(&folder).await {
                        Ok(()) => d.dispatch(Action::StatusBar(StatusBarAction::success(
                            format!("Saved folder {}", folder.name),
                            label,
                        ))),
                        Err(e) => {
                            rollback.into_iter().for_each(|action| d.dispatch(action));
                            report(&d, label, &e);
                        }
                    }
                });
            }
            Command::SaveTorrent { folder, item } => {
                let rollback = rollback_actions(state, folder);
                let updated = folder.with_item(item.clone());
                dispatcher.dispatch(Action::Folder(FolderAction::Update(updated.clone())));
                dispatcher.dispatch(Action::Folders(FoldersAction::Update(updated)));

                let api = self.endpoints.torrents.clone();
                let item = TorrentItem {
                    folder: item.folder.clone().or_else(|| Some(folder.id.clone())),
                    ..item.clone()
                };
                let d = dispatcher.clone();
                let op = self.begin(label, dispatcher);
                self.spawn(op, dispatcher, async move {
                    match api.update(&item).await {
                        Ok(()) => d.dispatch(Action::StatusBar(StatusBarAction::success(
                            format!("Saved {}", item.title),
                            label,
                        ))),
                        Err(e) => {
                            rollback.into_iter().for_each(|action| d.dispatch(action));
                            report(&d, label, &e);
                        }
                    }
                });
            }
            Command::DeleteFolder(folder) => {
                let adjacent = adjacent_folder(&state.folders.folders, folder);
                let api = self.endpoints.folders.clone();
                let folder = folder.clone();
                let d = dispatcher.clone();
                let op = self.begin(label, dispatcher);
                self.spawn(op, dispatcher, async move {
                    if let Err(e) = api.delete(&folder).await {
                        report(&d, label, &e);
                        return;
                    }
                    log::info!("Deleted folder {} ({})", folder.name, folder.id);
                    d.dispatch(Action::Folders(FoldersAction::Delete(folder.clone())));
                    match adjacent {
                        Some(next) => {
                            let route = Route::Folder(next.id.clone());
                            d.dispatch(Action::Folder(FolderAction::Select(next)));
                            d.dispatch(Action::navigate(route));
                        }
                        None => {
                            d.dispatch(Action::Folder(FolderAction::Deselect));
                            d.dispatch(Action::navigate(Route::Folders));
                        }
                    }
                    d.dispatch(Action::StatusBar(StatusBarAction::success(
                        format!("Deleted folder {}", folder.name),
                        label,
                    )));
                });
            }
            Command::DeleteTorrent { folder, item } => {
                let api = self.endpoints.torrents.clone();
                let folder = folder.clone();
                let item = item.clone();
                let d = dispatcher.clone();
                let op = self.begin(label, dispatcher);
                self.spawn(op, dispatcher, async move {
                    if let Err(e) = api.delete_item(&item).await {
                        report(&d, label, &e);
                        return;
                    }
                    let route = Route::Folder(folder.id.clone());
                    d.dispatch(Action::Folder(FolderAction::TorrentDelete { folder, item }));
                    d.dispatch(Action::navigate(route));
                });
            }
            Command::AddTorrent {
                folder_id,
                url_or_info_hash,
            } => {
                // leave the "new torrent" form once the item exists
                let leave_form = matches!(
                    &state.route,
                    Route::Torrent(f, t) if f == folder_id && t == NEW_TORRENT
                );
                let shown = state.route.folder_id() == Some(folder_id.as_str());

                let api = self.endpoints.torrents.clone();
                let torrent = NewTorrent {
                    folder: folder_id.clone(),
                    url_or_info_hash: url_or_info_hash.clone(),
                };
                let d = dispatcher.clone();
                let op = self.begin(label, dispatcher);
                self.spawn(op, dispatcher, async move {
                    match api.create(&torrent).await {
                        Ok(item) => {
                            log::info!("Added torrent {} to folder {}", item.id, torrent.folder);
                            if shown {
                                d.dispatch(Action::Folder(FolderAction::FetchInvalidate));
                            }
                            if leave_form {
                                d.dispatch(Action::navigate(Route::Folder(torrent.folder)));
                            } else if shown {
                                d.dispatch(Action::command(Command::FetchFolderIfNeeded(
                                    torrent.folder,
                                )));
                            }
                        }
                        Err(e) => report(&d, label, &e),
                    }
                });
            }
            Command::SignIn { creds, next } => {
                let next = next
                    .as_deref()
                    .and_then(Route::parse)
                    .unwrap_or(Route::Folders);
                self.authenticate(label, creds, false, next, dispatcher);
            }
            Command::SignUp(creds) => {
                self.authenticate(label, creds, true, Route::Folders, dispatcher);
            }
            Command::SignOut => {
                let api = self.endpoints.users.clone();
                let d = dispatcher.clone();
                let op = self.begin(label, dispatcher);
                self.spawn(op, dispatcher, async move {
                    match api.signout().await {
                        // the client's sign-out hook reports the cleared session
                        Ok(()) => d.dispatch(Action::StatusBar(StatusBarAction::info(
                            "Signed out",
                            label,
                        ))),
                        Err(ApiError::NotSignedIn) => {
                            d.dispatch(Action::Auth(AuthAction::SignedOut));
                        }
                        Err(e) => report(&d, label, &e),
                    }
                });
            }
        }
    }

    fn fetch_folders(&mut self, state: &AppState, dispatcher: &Dispatcher) {
        let label = Command::FetchFoldersIfNeeded.label();
        if !gate(&state.folders.fetch, label) {
            return;
        }
        dispatcher.dispatch(Action::Folders(FoldersAction::FetchBegin));

        let api = self.endpoints.folders.clone();
        let d = dispatcher.clone();
        let op = self.begin(label, dispatcher);
        self.spawn(op, dispatcher, async move {
            let complete = match api.get_all().await {
                Ok(folders) => FoldersAction::FetchComplete { folders, err: None },
                Err(e) => {
                    log::error!("{}: {}", label, e);
                    FoldersAction::FetchComplete {
                        folders: Vec::new(),
                        err: Some(e.to_string()),
                    }
                }
            };
            d.dispatch(Action::Folders(complete));
        });
    }

    fn fetch_folder(&mut self, id: &FolderId, state: &AppState, dispatcher: &Dispatcher) {
        let label = Command::FetchFolderIfNeeded(id.clone()).label();
        // torrents cached for another folder are stale, a running fetch still blocks
        let fetch = if state.folder.folder_id.as_ref() == Some(id) {
            state.folder.fetch.clone()
        } else {
            state.folder.fetch.clone().invalidate()
        };
        if !gate(&fetch, label) {
            return;
        }
        dispatcher.dispatch(Action::Folder(FolderAction::FetchBegin(id.clone())));

        let api = self.endpoints.torrents.clone();
        let folder_id = id.clone();
        let d = dispatcher.clone();
        let op = self.begin(label, dispatcher);
        self.spawn(op, dispatcher, async move {
            let (torrents, err) = match api.get_by_folder(&folder_id).await {
                Ok(torrents) => (torrents, None),
                Err(e) => {
                    log::error!("{}: {}", label, e);
                    (Vec::new(), Some(e.to_string()))
                }
            };
            d.dispatch(Action::Folder(FolderAction::FetchComplete {
                folder_id,
                torrents,
                err,
            }));
        });
    }

    fn authenticate(
        &mut self,
        label: &'static str,
        creds: &Credentials,
        sign_up: bool,
        next: Route,
        dispatcher: &Dispatcher,
    ) {
        let api = self.endpoints.users.clone();
        let creds = creds.clone();
        let d = dispatcher.clone();
        let op = self.begin(label, dispatcher);
        self.spawn(op, dispatcher, async move {
            let result = if sign_up {
                api.signup(&creds).await
            } else {
                api.signin(&creds).await
            };
            match result {
                Ok(session) => {
                    let email = session.user.map(|user| user.email).or(Some(creds.email));
                    log::info!("Signed in as {:?}", email);
                    d.dispatch(Action::Auth(AuthAction::SignedIn { email }));
                    d.dispatch(Action::navigate(next));
                }
                Err(e) => {
                    log::warn!("{}: {}", label, e);
                    d.dispatch(Action::Auth(AuthAction::Failed(e.to_string())));
                }
            }
        });
    }
}

impl Middleware for ApiMiddleware {
    fn handle(&mut self, action: &Action, state: &AppState, dispatcher: &Dispatcher) -> bool {
        match action {
            Action::Command(command) => {
                self.run(command, state, dispatcher);
                false
            }
            Action::Folders(FoldersAction::FetchComplete { folders, .. }) => {
                if let Some(id) = self.pending_select.take() {
                    // the user may have moved on while the list was loading
                    if state.route.folder_id() == Some(id.as_str()) {
                        select_folder(&id, folders, state, dispatcher);
                    }
                }
                true
            }
            _ => true,
        }
    }
}

/// Whether a fetch should start; logs the skip otherwise
fn gate(fetch: &FetchState, label: &str) -> bool {
    let should = fetch.should_fetch();
    if !should {
        log::debug!(
            "{}: skipped (is_fetching: {}, did_invalidate: {})",
            label,
            fetch.is_fetching,
            fetch.did_invalidate
        );
    }
    should
}

/// Select folder `id` from `folders`, or go back to the list when it is gone
fn select_folder(id: &str, folders: &[Folder], state: &AppState, dispatcher: &Dispatcher) {
    if state.folder.current.as_ref().is_some_and(|f| f.id == id) {
        return;
    }
    match folders.iter().find(|f| f.id == id) {
        Some(folder) => dispatcher.dispatch(Action::Folder(FolderAction::Select(folder.clone()))),
        None => {
            log::warn!("Folder {} not found", id);
            dispatcher.dispatch(Action::navigate(Route::Folders));
        }
    }
}

/// Actions that put both folder slices back the way `state` has them
fn rollback_actions(state: &AppState, folder: &Folder) -> Vec<Action> {
    let current = match &state.folder.current {
        Some(original) => FolderAction::Update(original.clone()),
        None => FolderAction::Deselect,
    };
    let listed = match state.folders.get(&folder.id) {
        Some(original) => FoldersAction::Update(original.clone()),
        None => FoldersAction::Delete(folder.clone()),
    };
    vec![Action::Folder(current), Action::Folders(listed)]
}

fn report(dispatcher: &Dispatcher, source: &str, err: &ApiError) {
    log::error!("{}: {}", source, err);
    dispatcher.dispatch(Action::StatusBar(StatusBarAction::error(
        err.to_string(),
        source,
    )));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StatusKind;
    use crate::store::Store;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};
    use tormgr_client::{FoldersApi, SessionData, TorrentItem, TorrentsApi, UsersApi};

    #[derive(Default)]
    struct MockApi {
        folders: Vec<Folder>,
        torrents: Vec<TorrentItem>,
        fail: AtomicBool,
        no_session: bool,
        calls: Mutex<Vec<&'static str>>,
        saved: Mutex<Vec<TorrentItem>>,
    }

    impl MockApi {
        fn with_folders(folders: Vec<Folder>) -> Arc<Self> {
            Arc::new(Self {
                folders,
                ..Self::default()
            })
        }

        fn failing() -> Arc<Self> {
            let api = Self::default();
            api.fail.store(true, Ordering::SeqCst);
            Arc::new(api)
        }

        fn answer<T>(&self, call: &'static str, value: T) -> Result<T, ApiError> {
            self.calls.lock().unwrap().push(call);
            if self.fail.load(Ordering::SeqCst) {
                Err(ApiError::Remote("boom".to_string()))
            } else {
                Ok(value)
            }
        }

        fn count(&self, call: &str) -> usize {
            self.calls.lock().unwrap().iter().filter(|c| **c == call).count()
        }
    }

    #[async_trait]
    impl UsersApi for MockApi {
        async fn signup(&self, _creds: &Credentials) -> Result<SessionData, ApiError> {
            self.answer("users.signup", SessionData::default())
        }
        async fn signin(&self, _creds: &Credentials) -> Result<SessionData, ApiError> {
            self.answer("users.signin", SessionData::default())
        }
        async fn signout(&self) -> Result<(), ApiError> {
            if self.no_session {
                self.calls.lock().unwrap().push("users.signout");
                return Err(ApiError::NotSignedIn);
            }
            self.answer("users.signout", ())
        }
    }

    #[async_trait]
    impl FoldersApi for MockApi {
        async fn get_all(&self) -> Result<Vec<Folder>, ApiError> {
            self.answer("folders.getAll", self.folders.clone())
        }
        async fn get(&self, id: &str) -> Result<Folder, ApiError> {
            self.answer("folders.get", Folder::new(id, "Fetched"))
        }
        async fn create(&self, name: &str) -> Result<Folder, ApiError> {
            self.answer("folders.create", Folder::new("new-id", name))
        }
        async fn update(&self, _folder: &Folder) -> Result<(), ApiError> {
            self.answer("folders.update", ())
        }
        async fn delete(&self, _folder: &Folder) -> Result<(), ApiError> {
            self.answer("folders.delete", ())
        }
    }

    #[async_trait]
    impl TorrentsApi for MockApi {
        async fn get_by_folder(&self, _folder_id: &str) -> Result<Vec<TorrentItem>, ApiError> {
            self.answer("torrents.getByFolder", self.torrents.clone())
        }
        async fn get(&self, id: &str) -> Result<TorrentItem, ApiError> {
            self.answer("torrents.get", item(id))
        }
        async fn create(&self, _torrent: &NewTorrent) -> Result<TorrentItem, ApiError> {
            self.answer("torrents.create", item("added"))
        }
        async fn update(&self, item: &TorrentItem) -> Result<(), ApiError> {
            self.saved.lock().unwrap().push(item.clone());
            self.answer("torrents.update", ())
        }
        async fn delete_item(&self, _item: &TorrentItem) -> Result<(), ApiError> {
            self.answer("torrents.deleteItem", ())
        }
    }

    /// Counts folder list completions passing through
    struct CompletionCounter(Arc<Mutex<usize>>);

    impl Middleware for CompletionCounter {
        fn handle(&mut self, action: &Action, _: &AppState, _: &Dispatcher) -> bool {
            if matches!(action, Action::Folders(FoldersAction::FetchComplete { .. })) {
                *self.0.lock().unwrap() += 1;
            }
            true
        }
    }

    fn item(id: &str) -> TorrentItem {
        TorrentItem {
            id: id.to_string(),
            title: id.to_uppercase(),
            ..TorrentItem::default()
        }
    }

    fn setup(api: &Arc<MockApi>, state: AppState) -> Store {
        let endpoints = Endpoints {
            users: api.clone(),
            folders: api.clone(),
            torrents: api.clone(),
        };
        let mut store = Store::new(state);
        store.add_middleware(Box::new(ApiMiddleware::new(endpoints, Handle::current())));
        store
    }

    /// State with `folders` loaded and `current` selected
    fn loaded(folders: Vec<Folder>, current: Option<&str>) -> AppState {
        let mut state = AppState::default();
        state.folders.fetch = FetchState::default().begin().complete(None);
        state.folder.current = current.and_then(|id| folders.iter().find(|f| f.id == id).cloned());
        if let Some(id) = current {
            state.route = Route::Folder(id.to_string());
            state.folder.folder_id = Some(id.to_string());
        }
        state.folders.folders = folders;
        state
    }

    fn abc() -> Vec<Folder> {
        vec![
            Folder::new("1", "A"),
            Folder::new("2", "B"),
            Folder::new("3", "C"),
        ]
    }

    fn run(command: Command) -> Action {
        Action::command(command)
    }

    #[tokio::test]
    async fn test_fetch_folders_is_gated() {
        let api = MockApi::with_folders(abc());
        let mut store = setup(&api, AppState::default());

        store.dispatch(run(Command::FetchFoldersIfNeeded));
        assert!(store.state().folders.fetch.is_fetching);
        assert!(store.state().async_state.in_progress());

        // already in flight
        store.dispatch(run(Command::FetchFoldersIfNeeded));
        store.run_until_idle().await;
        assert_eq!(api.count("folders.getAll"), 1);
        assert_eq!(store.state().folders.folders, abc());

        // fresh
        store.dispatch(run(Command::FetchFoldersIfNeeded));
        store.run_until_idle().await;
        assert_eq!(api.count("folders.getAll"), 1);

        store.dispatch(Action::Folders(FoldersAction::FetchInvalidate));
        store.dispatch(run(Command::FetchFoldersIfNeeded));
        store.run_until_idle().await;
        assert_eq!(api.count("folders.getAll"), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_completes_exactly_once() {
        let api = MockApi::failing();
        let completions = Arc::new(Mutex::new(0));
        let mut store = setup(&api, AppState::default());
        store.add_middleware(Box::new(CompletionCounter(completions.clone())));

        store.dispatch(run(Command::FetchFoldersIfNeeded));
        store.run_until_idle().await;

        let fetch = &store.state().folders.fetch;
        assert_eq!(*completions.lock().unwrap(), 1);
        assert!(!fetch.is_fetching);
        assert_eq!(fetch.err.as_deref(), Some("boom"));
        assert!(!store.state().async_state.in_progress());
    }

    #[tokio::test]
    async fn test_fetch_folder_skips_fresh_torrents() {
        let api = Arc::new(MockApi {
            torrents: vec![item("a")],
            ..MockApi::default()
        });
        let mut store = setup(&api, loaded(abc(), Some("1")));

        store.dispatch(run(Command::FetchFolderIfNeeded("1".to_string())));
        store.run_until_idle().await;
        store.dispatch(run(Command::FetchFolderIfNeeded("1".to_string())));
        store.run_until_idle().await;

        assert_eq!(api.count("torrents.getByFolder"), 1);
        assert_eq!(store.state().folder.torrents, vec![item("a")]);
        assert_eq!(
            store.state().folder.current.as_ref().map(|f| f.items.clone()),
            Some(vec![item("a")])
        );
    }

    #[tokio::test]
    async fn test_deleting_first_folder_selects_next_remaining() {
        let api = MockApi::with_folders(abc());
        let mut store = setup(&api, loaded(abc(), Some("1")));

        store.dispatch(run(Command::DeleteFolder(Folder::new("1", "A"))));
        store.run_until_idle().await;

        let state = store.state();
        let ids: Vec<&str> = state.folders.folders.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);
        assert_eq!(state.folder.current.as_ref().map(|f| f.id.as_str()), Some("3"));
        assert_eq!(state.route, Route::Folder("3".to_string()));
    }

    #[tokio::test]
    async fn test_deleting_middle_folder_selects_previous() {
        let api = MockApi::with_folders(abc());
        let mut store = setup(&api, loaded(abc(), Some("2")));

        store.dispatch(run(Command::DeleteFolder(Folder::new("2", "B"))));
        store.run_until_idle().await;

        assert_eq!(store.state().route, Route::Folder("1".to_string()));
    }

    #[tokio::test]
    async fn test_deleting_last_folder_deselects() {
        let only = vec![Folder::new("1", "A")];
        let api = MockApi::with_folders(only.clone());
        let mut store = setup(&api, loaded(only, Some("1")));

        store.dispatch(run(Command::DeleteFolder(Folder::new("1", "A"))));
        store.run_until_idle().await;

        assert_eq!(store.state().folder.current, None);
        assert_eq!(store.state().route, Route::Folders);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_folder() {
        let api = MockApi::failing();
        let mut store = setup(&api, loaded(abc(), Some("1")));

        store.dispatch(run(Command::DeleteFolder(Folder::new("1", "A"))));
        store.run_until_idle().await;

        assert_eq!(store.state().folders.folders, abc());
        let latest = store.state().status_bar.latest().unwrap();
        assert_eq!(latest.kind, StatusKind::Error);
        assert_eq!(latest.message, "boom");
    }

    #[tokio::test]
    async fn test_failed_save_restores_both_slices() {
        let api = MockApi::failing();
        let before = loaded(abc(), Some("1"));
        let mut store = setup(&api, before.clone());

        store.dispatch(run(Command::SaveFolder(Folder::new("1", "Renamed"))));

        // optimistic
        assert_eq!(store.state().folders.get("1").map(|f| f.name.as_str()), Some("Renamed"));
        assert_eq!(
            store.state().folder.current.as_ref().map(|f| f.name.as_str()),
            Some("Renamed")
        );

        store.run_until_idle().await;

        assert_eq!(store.state().folder, before.folder);
        assert_eq!(store.state().folders, before.folders);
        assert_eq!(api.count("folders.update"), 1);
    }

    #[tokio::test]
    async fn test_failed_save_of_unknown_folder_removes_it_again() {
        let api = MockApi::failing();
        let before = loaded(Vec::new(), None);
        let mut store = setup(&api, before.clone());

        store.dispatch(run(Command::SaveFolder(Folder::new("7", "Ghost"))));
        store.run_until_idle().await;

        assert_eq!(store.state().folder, before.folder);
        assert_eq!(store.state().folders, before.folders);
    }

    #[tokio::test]
    async fn test_save_torrent_moves_item_to_end() {
        let api = Arc::new(MockApi::default());
        let mut folder = Folder::new("1", "A");
        folder.items = vec![item("a"), item("b")];
        let mut store = setup(&api, loaded(vec![folder.clone()], Some("1")));

        let renamed = TorrentItem {
            title: "Renamed".to_string(),
            ..item("a")
        };
        store.dispatch(run(Command::SaveTorrent {
            folder,
            item: renamed.clone(),
        }));
        store.run_until_idle().await;

        let items = store.state().folder.current.as_ref().map(|f| f.items.clone());
        assert_eq!(items, Some(vec![item("b"), renamed]));
        assert_eq!(store.state().status_bar.latest().map(|m| m.kind), Some(StatusKind::Success));

        // the request names the owning folder
        let sent = api.saved.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].folder.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_failed_torrent_save_restores_folder() {
        let api = MockApi::failing();
        let mut folder = Folder::new("1", "A");
        folder.items = vec![item("a"), item("b")];
        let before = loaded(vec![folder.clone()], Some("1"));
        let mut store = setup(&api, before.clone());

        store.dispatch(run(Command::SaveTorrent {
            folder,
            item: item("a"),
        }));
        store.run_until_idle().await;

        assert_eq!(store.state().folder, before.folder);
        assert_eq!(store.state().folders, before.folders);
    }

    #[tokio::test]
    async fn test_current_folder_is_selected_once_list_loads() {
        let api = MockApi::with_folders(abc());
        let state = AppState {
            route: Route::Folder("2".to_string()),
            ..AppState::default()
        };
        let mut store = setup(&api, state);

        store.dispatch(run(Command::FetchCurrentFolderIfNeeded("2".to_string())));
        store.run_until_idle().await;

        assert_eq!(
            store.state().folder.current.as_ref().map(|f| f.name.as_str()),
            Some("B")
        );
    }

    #[tokio::test]
    async fn test_unknown_current_folder_goes_back_to_list() {
        let api = MockApi::with_folders(abc());
        let mut store = setup(&api, loaded(abc(), None));

        store.dispatch(run(Command::FetchCurrentFolderIfNeeded("9".to_string())));
        store.run_until_idle().await;

        assert_eq!(store.state().route, Route::Folders);
        assert_eq!(api.count("folders.getAll"), 0);
    }

    #[tokio::test]
    async fn test_create_folder_opens_it() {
        let api = Arc::new(MockApi::default());
        let mut store = setup(&api, loaded(Vec::new(), None));

        store.dispatch(run(Command::CreateFolder("Movies".to_string())));
        store.run_until_idle().await;

        assert_eq!(store.state().route, Route::Folder("new-id".to_string()));
        assert_eq!(store.state().folders.get("new-id").map(|f| f.name.as_str()), Some("Movies"));
        assert_eq!(
            store.state().folder.current.as_ref().map(|f| f.id.as_str()),
            Some("new-id")
        );
    }

    #[tokio::test]
    async fn test_add_torrent_leaves_form_and_invalidates() {
        let api = Arc::new(MockApi::default());
        let mut state = loaded(abc(), Some("1"));
        state.folder.fetch = FetchState::default().begin().complete(None);
        state.route = Route::Torrent("1".to_string(), NEW_TORRENT.to_string());
        let mut store = setup(&api, state);

        store.dispatch(run(Command::AddTorrent {
            folder_id: "1".to_string(),
            url_or_info_hash: "magnet:?xt=urn:btih:abc".to_string(),
        }));
        store.run_until_idle().await;

        assert_eq!(api.count("torrents.create"), 1);
        assert_eq!(store.state().route, Route::Folder("1".to_string()));
        assert!(store.state().folder.fetch.should_fetch());
    }

    #[tokio::test]
    async fn test_sign_in_failure_is_recorded() {
        let api = MockApi::failing();
        let mut store = setup(&api, AppState::default());

        store.dispatch(run(Command::SignIn {
            creds: Credentials::new("me@example.com", "wrong"),
            next: None,
        }));
        store.run_until_idle().await;

        assert!(!store.state().auth.signed_in);
        assert_eq!(store.state().auth.err.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn test_sign_in_follows_next() {
        let api = Arc::new(MockApi::default());
        let mut store = setup(&api, AppState::default());

        store.dispatch(run(Command::SignIn {
            creds: Credentials::new("me@example.com", "secret"),
            next: Some("/folders/3".to_string()),
        }));
        store.run_until_idle().await;

        assert!(store.state().auth.signed_in);
        assert_eq!(store.state().auth.email.as_deref(), Some("me@example.com"));
        assert_eq!(store.state().route, Route::Folder("3".to_string()));
    }

    #[tokio::test]
    async fn test_fetch_folder_waits_for_running_fetch_of_other_folder() {
        let api = Arc::new(MockApi::default());
        let mut state = loaded(abc(), Some("1"));
        state.folder.fetch = FetchState::default().begin();
        let mut store = setup(&api, state);

        store.dispatch(run(Command::FetchFolderIfNeeded("2".to_string())));
        store.run_until_idle().await;

        assert_eq!(api.count("torrents.getByFolder"), 0);
        assert_eq!(store.state().folder.folder_id.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_fresh_torrents_of_other_folder_do_not_block_fetch() {
        let api = Arc::new(MockApi::default());
        let mut state = loaded(abc(), Some("1"));
        state.folder.fetch = FetchState::default().begin().complete(None);
        let mut store = setup(&api, state);

        store.dispatch(run(Command::FetchFolderIfNeeded("2".to_string())));
        store.run_until_idle().await;

        assert_eq!(api.count("torrents.getByFolder"), 1);
        assert_eq!(store.state().folder.folder_id.as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_sign_out_reports_success() {
        let api = Arc::new(MockApi::default());
        let mut state = loaded(abc(), None);
        state.auth.signed_in = true;
        let mut store = setup(&api, state);

        store.dispatch(run(Command::SignOut));
        store.run_until_idle().await;

        assert_eq!(api.count("users.signout"), 1);
        let latest = store.state().status_bar.latest().unwrap();
        assert_eq!(latest.kind, StatusKind::Info);
        assert_eq!(latest.message, "Signed out");
    }

    #[tokio::test]
    async fn test_sign_out_without_token_still_signs_out() {
        let api = Arc::new(MockApi {
            no_session: true,
            ..MockApi::default()
        });
        let mut state = loaded(abc(), None);
        state.auth.signed_in = true;
        state.auth.email = Some("me@example.com".to_string());
        let mut store = setup(&api, state);

        store.dispatch(run(Command::SignOut));
        store.run_until_idle().await;

        assert_eq!(api.count("users.signout"), 1);
        assert!(!store.state().auth.signed_in);
        assert_eq!(store.state().auth.email, None);
        assert!(store.state().folders.folders.is_empty());
        assert_ne!(
            store.state().status_bar.latest().map(|m| m.kind),
            Some(StatusKind::Error)
        );
    }

    #[tokio::test]
    async fn test_delete_torrent_returns_to_folder() {
        let api = Arc::new(MockApi::default());
        let mut folder = Folder::new("1", "A");
        folder.items = vec![item("a"), item("b")];
        let mut state = loaded(vec![folder.clone()], Some("1"));
        state.route = Route::Torrent("1".to_string(), "a".to_string());
        let mut store = setup(&api, state);

        store.dispatch(run(Command::DeleteTorrent {
            folder,
            item: item("a"),
        }));
        store.run_until_idle().await;

        assert_eq!(api.count("torrents.deleteItem"), 1);
        assert_eq!(
            store.state().folder.current.as_ref().map(|f| f.items.clone()),
            Some(vec![item("b")])
        );
        assert_eq!(store.state().route, Route::Folder("1".to_string()));
    }

    #[tokio::test]
    async fn test_failed_torrent_delete_changes_nothing() {
        let api = MockApi::failing();
        let mut folder = Folder::new("1", "A");
        folder.items = vec![item("a"), item("b")];
        let mut before = loaded(vec![folder.clone()], Some("1"));
        before.route = Route::Torrent("1".to_string(), "a".to_string());
        let mut store = setup(&api, before.clone());

        store.dispatch(run(Command::DeleteTorrent {
            folder,
            item: item("a"),
        }));
        store.run_until_idle().await;

        assert_eq!(store.state().folder, before.folder);
        assert_eq!(store.state().folders, before.folders);
        assert_eq!(store.state().route, before.route);
        assert_eq!(
            store.state().status_bar.latest().map(|m| m.kind),
            Some(StatusKind::Error)
        );
    }

    #[tokio::test]
    async fn test_unauthorized_command_signs_out_and_shows_signin() {
        use crate::middleware::navigation_middleware::NavigationMiddleware;
        use httpmock::prelude::*;
        use tormgr_client::ApiClient;
        use tormgr_config::SessionStore;

        let server = MockServer::start_async().await;
        let folders = server.mock(|when, then| {
            when.method(GET).path("/folders");
            then.status(401);
        });
        let session = SessionStore::in_memory().shared();
        session
            .lock()
            .unwrap()
            .set_value("token", serde_json::json!("abc"))
            .unwrap();

        let mut store = Store::new(AppState {
            route: Route::Folders,
            ..AppState::default()
        });
        let hook = store.dispatcher().clone();
        let client = ApiClient::new(server.base_url(), session.clone())
            .unwrap()
            .with_sign_out_hook(Arc::new(move || {
                hook.dispatch(Action::Auth(AuthAction::SignedOut))
            }));
        store.add_middleware(Box::new(NavigationMiddleware::new(session.clone())));
        store.add_middleware(Box::new(ApiMiddleware::new(
            Endpoints::http(client),
            Handle::current(),
        )));

        store.dispatch(run(Command::FetchFoldersIfNeeded));
        store.run_until_idle().await;

        folders.assert();
        assert!(!session.lock().unwrap().is_signed_in());
        assert!(!store.state().auth.signed_in);
        assert_eq!(store.state().route.path(), "/signin");
    }
}
