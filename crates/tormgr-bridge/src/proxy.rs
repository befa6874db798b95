//! Caller side of the bridge
//!
//! [`ApiProxy`] implements the endpoint traits by forwarding every call to a
//! [`BridgeHost`](crate::BridgeHost), so UI code is written against the same
//! traits whether it talks HTTP directly or goes through the bridge.

use crate::error::BridgeError;
use crate::host::Envelope;
use crate::protocol::{ApiCall, BridgeRequest, BridgeResponse, FoldersCall, TorrentsCall, UsersCall};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tormgr_client::{
    ApiError, Credentials, Endpoints, Folder, FoldersApi, NewTorrent, SessionData, TorrentItem,
    TorrentsApi, UsersApi,
};

#[derive(Debug, Clone)]
pub struct ApiProxy {
    tx: mpsc::Sender<Envelope>,
}

impl ApiProxy {
    pub fn new(tx: mpsc::Sender<Envelope>) -> Self {
        Self { tx }
    }

    /// All three endpoints served by this proxy
    pub fn endpoints(self) -> Endpoints {
        let proxy = Arc::new(self);
        Endpoints {
            users: proxy.clone(),
            folders: proxy.clone(),
            torrents: proxy,
        }
    }

    async fn call<T: DeserializeOwned>(&self, call: ApiCall) -> Result<T, ApiError> {
        let name = format!("{}.{}", call.endpoint(), call.method());
        let reply = self.round_trip(call).await.map_err(|e| {
            log::error!("bridge: {name} failed: {e}");
            ApiError::Remote(e.to_string())
        })?;

        match serde_json::from_str(&reply).map_err(BridgeError::from) {
            Ok(BridgeResponse::Res { res }) => {
                serde_json::from_value(res).map_err(|source| ApiError::Decode { url: name, source })
            }
            Ok(BridgeResponse::Err { err, kind: Some(kind) }) => Err(kind.into_error(name, err)),
            Ok(BridgeResponse::Err { err, kind: None }) => Err(ApiError::Remote(err)),
            Err(e) => Err(ApiError::Remote(e.to_string())),
        }
    }

    async fn round_trip(&self, call: ApiCall) -> Result<String, BridgeError> {
        let request = BridgeRequest::Api(call.to_message()?);
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Envelope {
                message: serde_json::to_string(&request)?,
                reply: reply_tx,
            })
            .await
            .map_err(|_| BridgeError::HostUnavailable)?;
        reply_rx.await.map_err(|_| BridgeError::HostUnavailable)
    }
}

#[async_trait]
impl UsersApi for ApiProxy {
    async fn signup(&self, creds: &Credentials) -> Result<SessionData, ApiError> {
        self.call(ApiCall::Users(UsersCall::Signup(creds.clone()))).await
    }

    async fn signin(&self, creds: &Credentials) -> Result<SessionData, ApiError> {
        self.call(ApiCall::Users(UsersCall::Signin(creds.clone()))).await
    }

    async fn signout(&self) -> Result<(), ApiError> {
        self.call(ApiCall::Users(UsersCall::Signout)).await
    }
}

#[async_trait]
impl FoldersApi for ApiProxy {
    async fn get_all(&self) -> Result<Vec<Folder>, ApiError> {
        self.call(ApiCall::Folders(FoldersCall::GetAll)).await
    }

    async fn get(&self, id: &str) -> Result<Folder, ApiError> {
        self.call(ApiCall::Folders(FoldersCall::Get(id.to_string()))).await
    }

    async fn create(&self, name: &str) -> Result<Folder, ApiError> {
        self.call(ApiCall::Folders(FoldersCall::Create(name.to_string()))).await
    }

    async fn update(&self, folder: &Folder) -> Result<(), ApiError> {
        self.call(ApiCall::Folders(FoldersCall::Update(folder.clone()))).await
    }

    async fn delete(&self, folder: &Folder) -> Result<(), ApiError> {
        self.call(ApiCall::Folders(FoldersCall::Delete(folder.clone()))).await
    }
}

#[async_trait]
impl TorrentsApi for ApiProxy {
    async fn get_by_folder(&self, folder_id: &str) -> Result<Vec<TorrentItem>, ApiError> {
        self.call(ApiCall::Torrents(TorrentsCall::GetByFolder(folder_id.to_string())))
            .await
    }

    async fn get(&self, id: &str) -> Result<TorrentItem, ApiError> {
        self.call(ApiCall::Torrents(TorrentsCall::Get(id.to_string()))).await
    }

    async fn create(&self, torrent: &NewTorrent) -> Result<TorrentItem, ApiError> {
        self.call(ApiCall::Torrents(TorrentsCall::Create(torrent.clone()))).await
    }

    async fn update(&self, item: &TorrentItem) -> Result<(), ApiError> {
        self.call(ApiCall::Torrents(TorrentsCall::Update(item.clone()))).await
    }

    async fn delete_item(&self, item: &TorrentItem) -> Result<(), ApiError> {
        self.call(ApiCall::Torrents(TorrentsCall::DeleteItem(item.clone())))
            .await
    }
}
