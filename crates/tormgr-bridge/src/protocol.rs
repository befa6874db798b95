//! Bridge wire format and the statically declared call table

use crate::error::BridgeError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tormgr_client::{ApiError, Credentials, Folder, FolderId, NewTorrent, TorrentId, TorrentItem};

/// Message sent to the bridge host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "msg", rename_all = "lowercase")]
pub enum BridgeRequest {
    Api(ApiMessage),
}

/// Endpoint call as it travels over the channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiMessage {
    pub endpoint: String,
    pub method: String,
    #[serde(default)]
    pub params: Vec<Value>,
}

/// Reply from the bridge host: `{"res": ...}` or `{"err": "...", "kind": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BridgeResponse {
    Res {
        res: Value,
    },
    Err {
        err: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kind: Option<ErrorKind>,
    },
}

impl BridgeResponse {
    pub fn res(value: Value) -> Self {
        Self::Res { res: value }
    }

    /// Error reply with no kind the caller can act on
    pub fn err(message: impl Into<String>) -> Self {
        Self::Err {
            err: message.into(),
            kind: None,
        }
    }

    pub fn from_api_error(err: &ApiError) -> Self {
        Self::Err {
            err: err.to_string(),
            kind: ErrorKind::of(err),
        }
    }
}

/// Endpoint failures the caller reacts to, kept intact across the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotSignedIn,
    Status(u16),
}

impl ErrorKind {
    pub fn of(err: &ApiError) -> Option<Self> {
        match err {
            ApiError::NotSignedIn => Some(Self::NotSignedIn),
            ApiError::Status { status, .. } => Some(Self::Status(*status)),
            _ => None,
        }
    }

    /// Rebuild the endpoint error on the caller side
    pub fn into_error(self, url: String, message: String) -> ApiError {
        match self {
            Self::NotSignedIn => ApiError::NotSignedIn,
            Self::Status(status) => ApiError::Status {
                status,
                url,
                body: message,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UsersCall {
    Signup(Credentials),
    Signin(Credentials),
    Signout,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FoldersCall {
    GetAll,
    Get(FolderId),
    Create(String),
    Update(Folder),
    Delete(Folder),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TorrentsCall {
    GetByFolder(FolderId),
    Get(TorrentId),
    Create(NewTorrent),
    Update(TorrentItem),
    DeleteItem(TorrentItem),
}

/// Every endpoint method that may cross the bridge
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    Users(UsersCall),
    Folders(FoldersCall),
    Torrents(TorrentsCall),
}

const USERS: &str = "Users";
const FOLDERS: &str = "Folders";
const TORRENTS: &str = "Torrents";

impl ApiCall {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Users(_) => USERS,
            Self::Folders(_) => FOLDERS,
            Self::Torrents(_) => TORRENTS,
        }
    }

    pub fn method(&self) -> &'static str {
        match self {
            Self::Users(UsersCall::Signup(_)) => "signup",
            Self::Users(UsersCall::Signin(_)) => "signin",
            Self::Users(UsersCall::Signout) => "signout",
            Self::Folders(FoldersCall::GetAll) => "getAll",
            Self::Folders(FoldersCall::Get(_)) => "get",
            Self::Folders(FoldersCall::Create(_)) => "create",
            Self::Folders(FoldersCall::Update(_)) => "update",
            Self::Folders(FoldersCall::Delete(_)) => "delete",
            Self::Torrents(TorrentsCall::GetByFolder(_)) => "getByFolder",
            Self::Torrents(TorrentsCall::Get(_)) => "get",
            Self::Torrents(TorrentsCall::Create(_)) => "create",
            Self::Torrents(TorrentsCall::Update(_)) => "update",
            Self::Torrents(TorrentsCall::DeleteItem(_)) => "deleteItem",
        }
    }

    /// Encode into the wire message
    pub fn to_message(&self) -> Result<ApiMessage, BridgeError> {
        let params = match self {
            Self::Users(UsersCall::Signup(creds)) | Self::Users(UsersCall::Signin(creds)) => {
                vec![serde_json::to_value(creds)?]
            }
            Self::Users(UsersCall::Signout) | Self::Folders(FoldersCall::GetAll) => vec![],
            Self::Folders(FoldersCall::Get(id))
            | Self::Folders(FoldersCall::Create(id))
            | Self::Torrents(TorrentsCall::GetByFolder(id))
            | Self::Torrents(TorrentsCall::Get(id)) => vec![Value::String(id.clone())],
            Self::Folders(FoldersCall::Update(folder))
            | Self::Folders(FoldersCall::Delete(folder)) => vec![serde_json::to_value(folder)?],
            Self::Torrents(TorrentsCall::Create(torrent)) => vec![serde_json::to_value(torrent)?],
            Self::Torrents(TorrentsCall::Update(item))
            | Self::Torrents(TorrentsCall::DeleteItem(item)) => vec![serde_json::to_value(item)?],
        };
        Ok(ApiMessage {
            endpoint: self.endpoint().to_string(),
            method: self.method().to_string(),
            params,
        })
    }
}

impl TryFrom<ApiMessage> for ApiCall {
    type Error = BridgeError;

    fn try_from(msg: ApiMessage) -> Result<Self, Self::Error> {
        let p = Params { msg: &msg };
        let call = match (msg.endpoint.as_str(), msg.method.as_str()) {
            (USERS, "signup") => Self::Users(UsersCall::Signup(p.at(0)?)),
            (USERS, "signin") => Self::Users(UsersCall::Signin(p.at(0)?)),
            (USERS, "signout") => Self::Users(UsersCall::Signout),
            (FOLDERS, "getAll") => Self::Folders(FoldersCall::GetAll),
            (FOLDERS, "get") => Self::Folders(FoldersCall::Get(p.at(0)?)),
            (FOLDERS, "create") => Self::Folders(FoldersCall::Create(p.at(0)?)),
            (FOLDERS, "update") => Self::Folders(FoldersCall::Update(p.at(0)?)),
            (FOLDERS, "delete") => Self::Folders(FoldersCall::Delete(p.at(0)?)),
            (TORRENTS, "getByFolder") => Self::Torrents(TorrentsCall::GetByFolder(p.at(0)?)),
            (TORRENTS, "get") => Self::Torrents(TorrentsCall::Get(p.at(0)?)),
            (TORRENTS, "create") => Self::Torrents(TorrentsCall::Create(p.at(0)?)),
            (TORRENTS, "update") => Self::Torrents(TorrentsCall::Update(p.at(0)?)),
            (TORRENTS, "deleteItem") => Self::Torrents(TorrentsCall::DeleteItem(p.at(0)?)),
            (USERS | FOLDERS | TORRENTS, method) => {
                return Err(BridgeError::UnknownMethod {
                    endpoint: msg.endpoint.clone(),
                    method: method.to_string(),
                })
            }
            (endpoint, _) => return Err(BridgeError::UnknownEndpoint(endpoint.to_string())),
        };
        Ok(call)
    }
}

struct Params<'a> {
    msg: &'a ApiMessage,
}

impl Params<'_> {
    fn at<T: DeserializeOwned>(&self, idx: usize) -> Result<T, BridgeError> {
        let value = self.msg.params.get(idx).cloned().unwrap_or(Value::Null);
        serde_json::from_value(value).map_err(|source| BridgeError::InvalidParams {
            endpoint: self.msg.endpoint.clone(),
            method: self.msg.method.clone(),
            source,
        })
    }
}
