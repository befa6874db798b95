//! Domain endpoints
//!
//! Each endpoint is a trait with one HTTP implementation bound to an
//! [`ApiClient`]. Every method issues exactly one request; nothing is retried
//! or cached here.

use crate::client::{ApiClient, Auth, RequestOptions};
use crate::error::ApiError;
use crate::types::{Credentials, Folder, NewTorrent, SessionData, TorrentItem};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::{Arc, PoisonError};

#[async_trait]
pub trait UsersApi: Send + Sync {
    /// Create an account; the returned session is persisted
    async fn signup(&self, creds: &Credentials) -> Result<SessionData, ApiError>;

    /// Exchange credentials for a token; the returned session is persisted
    async fn signin(&self, creds: &Credentials) -> Result<SessionData, ApiError>;

    /// Revoke the token and clear the local session
    ///
    /// Local sign-out always completes, even when the server call fails.
    async fn signout(&self) -> Result<(), ApiError>;
}

#[async_trait]
pub trait FoldersApi: Send + Sync {
    async fn get_all(&self) -> Result<Vec<Folder>, ApiError>;
    async fn get(&self, id: &str) -> Result<Folder, ApiError>;
    async fn create(&self, name: &str) -> Result<Folder, ApiError>;
    async fn update(&self, folder: &Folder) -> Result<(), ApiError>;
    async fn delete(&self, folder: &Folder) -> Result<(), ApiError>;
}

#[async_trait]
pub trait TorrentsApi: Send + Sync {
    async fn get_by_folder(&self, folder_id: &str) -> Result<Vec<TorrentItem>, ApiError>;
    async fn get(&self, id: &str) -> Result<TorrentItem, ApiError>;
    async fn create(&self, torrent: &NewTorrent) -> Result<TorrentItem, ApiError>;
    async fn update(&self, item: &TorrentItem) -> Result<(), ApiError>;
    async fn delete_item(&self, item: &TorrentItem) -> Result<(), ApiError>;
}

/// All domain endpoints behind shared trait objects
#[derive(Clone)]
pub struct Endpoints {
    pub users: Arc<dyn UsersApi>,
    pub folders: Arc<dyn FoldersApi>,
    pub torrents: Arc<dyn TorrentsApi>,
}

impl Endpoints {
    /// HTTP endpoints sharing one client
    pub fn http(client: ApiClient) -> Self {
        Self {
            users: Arc::new(HttpUsers::new(client.clone())),
            folders: Arc::new(HttpFolders::new(client.clone())),
            torrents: Arc::new(HttpTorrents::new(client)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpUsers {
    api: ApiClient,
}

impl HttpUsers {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Persist every returned key into the session
    fn store_session(&self, user_data: Map<String, Value>) -> Result<SessionData, ApiError> {
        {
            let mut session = self
                .api
                .session()
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            session
                .set(&user_data)
                .map_err(|e| ApiError::Session(format!("{:#}", e)))?;
        }
        serde_json::from_value(Value::Object(user_data)).map_err(|source| ApiError::Decode {
            url: "/users".to_string(),
            source,
        })
    }
}

#[async_trait]
impl UsersApi for HttpUsers {
    async fn signup(&self, creds: &Credentials) -> Result<SessionData, ApiError> {
        let response = self
            .api
            .post("/users", RequestOptions::new().data(creds)?)
            .await?;
        self.store_session(response.json()?)
    }

    async fn signin(&self, creds: &Credentials) -> Result<SessionData, ApiError> {
        let response = self
            .api
            .post(
                "/users/tokens",
                RequestOptions::new().auth(Auth::Basic(creds.clone())),
            )
            .await?;
        self.store_session(response.json()?)
    }

    async fn signout(&self) -> Result<(), ApiError> {
        let token = {
            let session = self
                .api
                .session()
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            session.token().map(str::to_string)
        };
        let Some(token) = token else {
            return Err(ApiError::NotSignedIn);
        };

        // Clear first so a 401 on the revoke call does not start a second sign-out
        self.api.sign_out_locally();

        let url = format!("/users/tokens/{}", token);
        if let Err(e) = self
            .api
            .delete(&url, RequestOptions::new().auth(Auth::Token(token)))
            .await
        {
            log::warn!("Failed to revoke token on server: {}", e);
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct HttpFolders {
    api: ApiClient,
}

impl HttpFolders {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[derive(Serialize)]
struct FolderBody<'a> {
    name: &'a str,
}

#[async_trait]
impl FoldersApi for HttpFolders {
    async fn get_all(&self) -> Result<Vec<Folder>, ApiError> {
        self.api.get("/folders", RequestOptions::new()).await?.json()
    }

    async fn get(&self, id: &str) -> Result<Folder, ApiError> {
        self.api
            .get(&format!("/folders/{}", id), RequestOptions::new())
            .await?
            .json()
    }

    async fn create(&self, name: &str) -> Result<Folder, ApiError> {
        self.api
            .post("/folders", RequestOptions::new().data(&FolderBody { name })?)
            .await?
            .json()
    }

    async fn update(&self, folder: &Folder) -> Result<(), ApiError> {
        let data = FolderBody { name: &folder.name };
        self.api
            .put(
                &format!("/folders/{}", folder.id),
                RequestOptions::new().data(&data)?,
            )
            .await?;
        Ok(())
    }

    async fn delete(&self, folder: &Folder) -> Result<(), ApiError> {
        self.api
            .delete(&format!("/folders/{}", folder.id), RequestOptions::new())
            .await?;
        Ok(())
    }
}

#[derive(Serialize)]
struct TorrentBody<'a> {
    folder: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct HttpTorrents {
    api: ApiClient,
}

impl HttpTorrents {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl TorrentsApi for HttpTorrents {
    async fn get_by_folder(&self, folder_id: &str) -> Result<Vec<TorrentItem>, ApiError> {
        self.api
            .get(
                &format!("/folders/{}/torrents", folder_id),
                RequestOptions::new(),
            )
            .await?
            .json()
    }

    async fn get(&self, id: &str) -> Result<TorrentItem, ApiError> {
        self.api
            .get(&format!("/torrents/{}", id), RequestOptions::new())
            .await?
            .json()
    }

    async fn create(&self, torrent: &NewTorrent) -> Result<TorrentItem, ApiError> {
        self.api
            .post("/torrents", RequestOptions::new().data(torrent)?)
            .await?
            .json()
    }

    async fn update(&self, item: &TorrentItem) -> Result<(), ApiError> {
        let data = TorrentBody {
            folder: item.folder.as_deref(),
        };
        self.api
            .put(
                &format!("/torrents/{}", item.id),
                RequestOptions::new().data(&data)?,
            )
            .await?;
        Ok(())
    }

    async fn delete_item(&self, item: &TorrentItem) -> Result<(), ApiError> {
        self.api
            .delete(&format!("/torrents/{}", item.id), RequestOptions::new())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tormgr_config::SessionStore;

    fn endpoints(server: &MockServer) -> (Endpoints, ApiClient) {
        let client =
            ApiClient::new(server.base_url(), SessionStore::in_memory().shared()).unwrap();
        (Endpoints::http(client.clone()), client)
    }

    #[tokio::test]
    async fn test_signin_uses_basic_auth_and_persists_session() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/users/tokens")
                .header("authorization", "Basic YUBiLmM6c2VjcmV0");
            then.status(200)
                .json_body(json!({"token": "abc", "user": {"email": "a@b.c"}}));
        });

        let (endpoints, client) = endpoints(&server);
        let session = endpoints
            .users
            .signin(&Credentials::new("a@b.c", "secret"))
            .await
            .unwrap();

        mock.assert();
        assert_eq!(session.token.as_deref(), Some("abc"));
        assert_eq!(session.user.unwrap().email, "a@b.c");
        assert_eq!(client.session().lock().unwrap().token(), Some("abc"));
    }

    #[tokio::test]
    async fn test_signup_posts_credentials() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/users")
                .json_body(json!({"email": "a@b.c", "password": "secret"}));
            then.status(201).json_body(json!({"token": "new"}));
        });

        let (endpoints, client) = endpoints(&server);
        endpoints
            .users
            .signup(&Credentials::new("a@b.c", "secret"))
            .await
            .unwrap();

        mock.assert();
        assert!(client.session().lock().unwrap().is_signed_in());
    }

    #[tokio::test]
    async fn test_signout_clears_session_even_when_server_fails() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(DELETE).path("/users/tokens/abc");
            then.status(500);
        });

        let calls = Arc::new(AtomicUsize::new(0));
        let hook_calls = Arc::clone(&calls);
        let client = ApiClient::new(server.base_url(), SessionStore::in_memory().shared())
            .unwrap()
            .with_sign_out_hook(Arc::new(move || {
                hook_calls.fetch_add(1, Ordering::SeqCst);
            }));
        client
            .session()
            .lock()
            .unwrap()
            .set_value("token", json!("abc"))
            .unwrap();

        HttpUsers::new(client.clone()).signout().await.unwrap();

        mock.assert();
        assert!(!client.session().lock().unwrap().is_signed_in());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_signout_without_token_fails() {
        let server = MockServer::start_async().await;
        let (endpoints, _) = endpoints(&server);
        let err = endpoints.users.signout().await.unwrap_err();
        assert!(matches!(err, ApiError::NotSignedIn));
    }

    #[tokio::test]
    async fn test_folder_rest_mapping() {
        let server = MockServer::start_async().await;
        let list = server.mock(|when, then| {
            when.method(GET).path("/folders");
            then.status(200)
                .json_body(json!([{"id": "1", "name": "A"}, {"id": "2", "name": "B"}]));
        });
        let create = server.mock(|when, then| {
            when.method(POST).path("/folders").json_body(json!({"name": "C"}));
            then.status(201).json_body(json!({"id": "3", "name": "C"}));
        });
        let update = server.mock(|when, then| {
            when.method(PUT).path("/folders/3").json_body(json!({"name": "D"}));
            then.status(204);
        });
        let delete = server.mock(|when, then| {
            when.method(DELETE).path("/folders/3");
            then.status(204);
        });

        let (endpoints, _) = endpoints(&server);
        let folders = endpoints.folders.get_all().await.unwrap();
        assert_eq!(folders, vec![Folder::new("1", "A"), Folder::new("2", "B")]);

        let mut created = endpoints.folders.create("C").await.unwrap();
        assert_eq!(created, Folder::new("3", "C"));

        created.name = "D".to_string();
        endpoints.folders.update(&created).await.unwrap();
        endpoints.folders.delete(&created).await.unwrap();

        list.assert();
        create.assert();
        update.assert();
        delete.assert();
    }

    #[tokio::test]
    async fn test_torrent_rest_mapping() {
        let server = MockServer::start_async().await;
        let by_folder = server.mock(|when, then| {
            when.method(GET).path("/folders/1/torrents");
            then.status(200)
                .json_body(json!([{"id": "t1", "title": "Debian"}]));
        });
        let create = server.mock(|when, then| {
            when.method(POST)
                .path("/torrents")
                .json_body(json!({"folder": "1", "urlOrInfoHash": "magnet:?xt=abc"}));
            then.status(201).json_body(json!({"id": "t2", "title": "magnet"}));
        });
        let delete = server.mock(|when, then| {
            when.method(DELETE).path("/torrents/t2");
            then.status(204);
        });
        let update = server.mock(|when, then| {
            when.method(PUT)
                .path("/torrents/t1")
                .json_body(json!({"folder": "2"}));
            then.status(204);
        });

        let (endpoints, _) = endpoints(&server);
        let items = endpoints.torrents.get_by_folder("1").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Debian");

        let created = endpoints
            .torrents
            .create(&NewTorrent {
                folder: "1".to_string(),
                url_or_info_hash: "magnet:?xt=abc".to_string(),
            })
            .await
            .unwrap();
        endpoints.torrents.delete_item(&created).await.unwrap();

        // only the owning folder goes over the wire
        let moved = TorrentItem {
            folder: Some("2".to_string()),
            ..items[0].clone()
        };
        endpoints.torrents.update(&moved).await.unwrap();

        by_folder.assert();
        create.assert();
        delete.assert();
        update.assert();
    }
}
