//! Privileged side of the bridge
//!
//! The host owns the real endpoints. Each incoming message is decoded into an
//! [`ApiCall`], run through [`dispatch`], and answered with a
//! [`BridgeResponse`]. Successful calls also emit an update notification so
//! that auxiliary UI (the context menu) can refresh.

use crate::error::BridgeError;
use crate::protocol::{ApiCall, BridgeRequest, BridgeResponse, FoldersCall, TorrentsCall, UsersCall};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{broadcast, mpsc, oneshot};
use tormgr_client::{ApiError, Endpoints};

/// Raw message plus the slot its reply goes to
#[derive(Debug)]
pub struct Envelope {
    pub message: String,
    pub reply: oneshot::Sender<String>,
}

/// Message channel between proxies and a host
pub fn channel(capacity: usize) -> (mpsc::Sender<Envelope>, mpsc::Receiver<Envelope>) {
    mpsc::channel(capacity)
}

fn to_value<T: Serialize>(value: T) -> Result<Value, ApiError> {
    Ok(serde_json::to_value(value)?)
}

/// Run one call against the endpoints
pub async fn dispatch(endpoints: &Endpoints, call: ApiCall) -> Result<Value, ApiError> {
    match call {
        ApiCall::Users(UsersCall::Signup(creds)) => to_value(endpoints.users.signup(&creds).await?),
        ApiCall::Users(UsersCall::Signin(creds)) => to_value(endpoints.users.signin(&creds).await?),
        ApiCall::Users(UsersCall::Signout) => to_value(endpoints.users.signout().await?),
        ApiCall::Folders(FoldersCall::GetAll) => to_value(endpoints.folders.get_all().await?),
        ApiCall::Folders(FoldersCall::Get(id)) => to_value(endpoints.folders.get(&id).await?),
        ApiCall::Folders(FoldersCall::Create(name)) => {
            to_value(endpoints.folders.create(&name).await?)
        }
        ApiCall::Folders(FoldersCall::Update(folder)) => {
            to_value(endpoints.folders.update(&folder).await?)
        }
        ApiCall::Folders(FoldersCall::Delete(folder)) => {
            to_value(endpoints.folders.delete(&folder).await?)
        }
        ApiCall::Torrents(TorrentsCall::GetByFolder(id)) => {
            to_value(endpoints.torrents.get_by_folder(&id).await?)
        }
        ApiCall::Torrents(TorrentsCall::Get(id)) => to_value(endpoints.torrents.get(&id).await?),
        ApiCall::Torrents(TorrentsCall::Create(torrent)) => {
            to_value(endpoints.torrents.create(&torrent).await?)
        }
        ApiCall::Torrents(TorrentsCall::Update(item)) => {
            to_value(endpoints.torrents.update(&item).await?)
        }
        ApiCall::Torrents(TorrentsCall::DeleteItem(item)) => {
            to_value(endpoints.torrents.delete_item(&item).await?)
        }
    }
}

#[derive(Clone)]
pub struct BridgeHost {
    endpoints: Endpoints,
    updates: broadcast::Sender<()>,
}

impl BridgeHost {
    pub fn new(endpoints: Endpoints) -> Self {
        let (updates, _) = broadcast::channel(16);
        Self { endpoints, updates }
    }

    /// Notified after every successful call
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.updates.subscribe()
    }

    /// Answer one raw message
    ///
    /// Always produces a reply; bridge and endpoint failures both become
    /// `{"err": ...}`. Endpoint failures also carry their kind when the
    /// caller can act on it.
    pub async fn handle(&self, message: &str) -> String {
        let response = match self.handle_request(message).await {
            Ok(response) | Err(response) => response,
        };
        serde_json::to_string(&response)
            .unwrap_or_else(|e| format!("{{\"err\":\"failed to encode reply: {e}\"}}"))
    }

    async fn handle_request(&self, message: &str) -> Result<BridgeResponse, BridgeResponse> {
        let call = decode(message).map_err(|e| {
            log::warn!("bridge: rejected message: {e}");
            BridgeResponse::err(e.to_string())
        })?;
        let name = format!("{}.{}", call.endpoint(), call.method());

        match dispatch(&self.endpoints, call).await {
            Ok(value) => {
                log::info!("api:{name} successful");
                // nobody listening is fine
                let _ = self.updates.send(());
                Ok(BridgeResponse::res(value))
            }
            Err(e) => {
                log::error!("api:{name} failed: {e}");
                Err(BridgeResponse::from_api_error(&e))
            }
        }
    }

    /// Answer messages until every sender is dropped
    pub async fn serve(self, mut rx: mpsc::Receiver<Envelope>) {
        log::debug!("bridge: host listening");
        while let Some(envelope) = rx.recv().await {
            let host = self.clone();
            tokio::spawn(async move {
                let reply = host.handle(&envelope.message).await;
                if envelope.reply.send(reply).is_err() {
                    log::debug!("bridge: caller went away before reply");
                }
            });
        }
        log::debug!("bridge: host stopped");
    }
}

fn decode(message: &str) -> Result<ApiCall, BridgeError> {
    let BridgeRequest::Api(msg) = serde_json::from_str(message)?;
    ApiCall::try_from(msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use tormgr_client::{
        Credentials, Folder, FoldersApi, NewTorrent, SessionData, TorrentItem, TorrentsApi,
        UsersApi,
    };

    #[derive(Default)]
    struct MockApi {
        calls: Mutex<Vec<String>>,
    }

    impl MockApi {
        fn record(&self, call: &str) {
            self.calls.lock().unwrap().push(call.to_string());
        }
    }

    #[async_trait]
    impl UsersApi for MockApi {
        async fn signup(&self, _creds: &Credentials) -> Result<SessionData, ApiError> {
            self.record("signup");
            Ok(SessionData::default())
        }
        async fn signin(&self, _creds: &Credentials) -> Result<SessionData, ApiError> {
            self.record("signin");
            Err(ApiError::Status {
                status: 401,
                url: "/users/tokens".to_string(),
                body: String::new(),
            })
        }
        async fn signout(&self) -> Result<(), ApiError> {
            self.record("signout");
            Ok(())
        }
    }

    #[async_trait]
    impl FoldersApi for MockApi {
        async fn get_all(&self) -> Result<Vec<Folder>, ApiError> {
            self.record("getAll");
            Ok(vec![Folder::new("1", "A"), Folder::new("2", "B")])
        }
        async fn get(&self, id: &str) -> Result<Folder, ApiError> {
            self.record("get");
            Ok(Folder::new(id, "A"))
        }
        async fn create(&self, name: &str) -> Result<Folder, ApiError> {
            self.record("create");
            Ok(Folder::new("3", name))
        }
        async fn update(&self, _folder: &Folder) -> Result<(), ApiError> {
            self.record("update");
            Ok(())
        }
        async fn delete(&self, _folder: &Folder) -> Result<(), ApiError> {
            self.record("delete");
            Ok(())
        }
    }

    #[async_trait]
    impl TorrentsApi for MockApi {
        async fn get_by_folder(&self, _folder_id: &str) -> Result<Vec<TorrentItem>, ApiError> {
            self.record("getByFolder");
            Ok(vec![])
        }
        async fn get(&self, id: &str) -> Result<TorrentItem, ApiError> {
            self.record("torrents.get");
            Ok(TorrentItem {
                id: id.to_string(),
                ..TorrentItem::default()
            })
        }
        async fn create(&self, torrent: &NewTorrent) -> Result<TorrentItem, ApiError> {
            self.record("torrents.create");
            Ok(TorrentItem {
                id: "t1".to_string(),
                url: Some(torrent.url_or_info_hash.clone()),
                ..TorrentItem::default()
            })
        }
        async fn update(&self, _item: &TorrentItem) -> Result<(), ApiError> {
            self.record("torrents.update");
            Ok(())
        }
        async fn delete_item(&self, _item: &TorrentItem) -> Result<(), ApiError> {
            self.record("deleteItem");
            Ok(())
        }
    }

    fn host() -> (BridgeHost, Arc<MockApi>) {
        let api = Arc::new(MockApi::default());
        let endpoints = Endpoints {
            users: api.clone(),
            folders: api.clone(),
            torrents: api.clone(),
        };
        (BridgeHost::new(endpoints), api)
    }

    fn request(endpoint: &str, method: &str, params: Value) -> String {
        json!({"type": "api", "msg": {"endpoint": endpoint, "method": method, "params": params}})
            .to_string()
    }

    #[tokio::test]
    async fn test_handle_returns_result() {
        let (host, api) = host();

        let reply = host.handle(&request("Folders", "getAll", json!([]))).await;

        let reply: Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(reply["res"][1]["name"], json!("B"));
        assert_eq!(*api.calls.lock().unwrap(), vec!["getAll".to_string()]);
    }

    #[tokio::test]
    async fn test_torrents_get_reaches_torrents_endpoint() {
        let (host, api) = host();

        host.handle(&request("Torrents", "get", json!(["t9"]))).await;

        assert_eq!(*api.calls.lock().unwrap(), vec!["torrents.get".to_string()]);
    }

    #[tokio::test]
    async fn test_handle_reports_endpoint_error() {
        let (host, _api) = host();

        let reply = host
            .handle(&request(
                "Users",
                "signin",
                json!([{"email": "a@b.c", "password": "x"}]),
            ))
            .await;

        let reply: Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(reply, json!({"err": "Unexpected status 401", "kind": {"status": 401}}));
    }

    #[tokio::test]
    async fn test_unknown_method_never_reaches_endpoints() {
        let (host, api) = host();

        let reply = host.handle(&request("Folders", "explode", json!([]))).await;

        let reply: Value = serde_json::from_str(&reply).unwrap();
        assert!(reply["err"].as_str().unwrap().contains("Folders.explode"));
        assert!(api.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_message() {
        let (host, _api) = host();

        let reply = host.handle("not json").await;

        let reply: Value = serde_json::from_str(&reply).unwrap();
        assert!(reply.get("err").is_some());
    }

    #[tokio::test]
    async fn test_success_emits_update() {
        let (host, _api) = host();
        let mut updates = host.subscribe();

        host.handle(&request("Folders", "create", json!(["C"]))).await;
        assert!(updates.try_recv().is_ok());

        host.handle(&request("Folders", "explode", json!([]))).await;
        assert!(updates.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_serve_replies_over_channel() {
        let (host, _api) = host();
        let (tx, rx) = channel(4);
        tokio::spawn(host.serve(rx));

        let (reply_tx, reply_rx) = oneshot::channel();
        tx.send(Envelope {
            message: request("Folders", "get", json!(["7"])),
            reply: reply_tx,
        })
        .await
        .unwrap();

        let reply: Value = serde_json::from_str(&reply_rx.await.unwrap()).unwrap();
        assert_eq!(reply["res"]["id"], json!("7"));
    }
}
