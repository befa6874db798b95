//! tormgr API client
//!
//! This crate provides the HTTP client for the tormgr API and the domain
//! endpoints built on top of it. Endpoints are trait-based so callers can
//! swap the HTTP implementation for a proxy (extension bridge) or a mock.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │   UsersApi / FoldersApi / TorrentsApi traits  │
//! └───────────────────────────────────────────────┘
//!                        │
//!        ┌───────────────┴───────────────┐
//!        ▼                               ▼
//! ┌─────────────────┐         ┌─────────────────────┐
//! │ Http* endpoints │         │ bridge ApiProxy     │
//! │ (ApiClient)     │         │ (message channel)   │
//! └─────────────────┘         └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use tormgr_client::{ApiClient, Endpoints};
//! use tormgr_config::SessionStore;
//!
//! # async fn example() -> Result<(), tormgr_client::ApiError> {
//! let session = SessionStore::in_memory().shared();
//! let client = ApiClient::new("https://api.example.com", session)?;
//! let endpoints = Endpoints::http(client);
//!
//! let folders = endpoints.folders.get_all().await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod endpoints;
pub mod error;
pub mod types;

pub use client::{
    ApiClient, Auth, NoopSignOutHook, PreparedRequest, RequestOptions, Response, SignOutHook,
    MIME_JSON,
};
pub use endpoints::{
    Endpoints, FoldersApi, HttpFolders, HttpTorrents, HttpUsers, TorrentsApi, UsersApi,
};
pub use error::ApiError;
pub use types::{Credentials, Folder, FolderId, NewTorrent, SessionData, TorrentId, TorrentItem, User};
