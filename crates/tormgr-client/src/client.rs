//! HTTP client for the tormgr API
//!
//! Every call goes through [`ApiClient::send`], which runs the same pipeline:
//!
//! 1. normalize the URL against the configured base URL
//! 2. merge default JSON headers with caller headers (caller wins)
//! 3. resolve authorization (explicit auth, else the session token)
//! 4. encode the JSON `data` payload into the body
//! 5. execute exactly one request and classify the response
//!
//! A 401 while the session is signed in clears the session and notifies the
//! [`SignOutHook`] before the error is returned to the caller.

use crate::error::ApiError;
use crate::types::Credentials;
use base64::{engine::general_purpose, Engine as _};
use log::{debug, error, info};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError};
use std::time::Duration;
use tormgr_config::SharedSession;

pub const MIME_JSON: &str = "application/json";
const AUTHORIZATION: &str = "authorization";
const CONTENT_TYPE: &str = "content-type";

/// Callback run after a forced or explicit sign-out
///
/// The application uses it to schedule the redirect to the sign-in screen.
pub trait SignOutHook: Send + Sync {
    fn signed_out(&self);
}

impl<F> SignOutHook for F
where
    F: Fn() + Send + Sync,
{
    fn signed_out(&self) {
        self()
    }
}

/// Hook that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSignOutHook;

impl SignOutHook for NoopSignOutHook {
    fn signed_out(&self) {}
}

/// Explicit authorization for a single request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    /// `Token token="<token>"`
    Token(String),
    /// `Basic base64(email:password)`
    Basic(Credentials),
}

impl Auth {
    pub fn header_value(&self) -> String {
        match self {
            Self::Token(token) => format!("Token token=\"{}\"", token),
            Self::Basic(creds) => {
                let encoded = general_purpose::STANDARD
                    .encode(format!("{}:{}", creds.email, creds.password));
                format!("Basic {}", encoded)
            }
        }
    }
}

/// Per-request options
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    headers: Vec<(String, String)>,
    auth: Option<Auth>,
    data: Option<Value>,
    body: Option<String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn auth(mut self, auth: Auth) -> Self {
        self.auth = Some(auth);
        self
    }

    /// JSON payload, serialized into the body when the content type is JSON
    pub fn data<T: Serialize + ?Sized>(mut self, data: &T) -> Result<Self, ApiError> {
        self.data = Some(serde_json::to_value(data)?);
        Ok(self)
    }

    /// Raw body, sent as-is
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Request after the pipeline ran, ready to execute
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: String,
    /// Header names are lowercase
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
    /// Payload left over when it could not be encoded into the body
    pub data: Option<Value>,
}

/// Successful response with its body read
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    url: String,
    body: String,
}

impl Response {
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn text(&self) -> &str {
        &self.body
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|source| ApiError::Decode {
            url: self.url.clone(),
            source,
        })
    }
}

/// tormgr API client
///
/// Cheap to clone; clones share the HTTP connection pool, the session and the hook.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SharedSession,
    sign_out_hook: Arc<dyn SignOutHook>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for `base_url` with the default timeout
    pub fn new(base_url: impl Into<String>, session: SharedSession) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, session, Duration::from_secs(30))
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        session: SharedSession,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ApiError::Transport {
                url: String::new(),
                source,
            })?;
        let base_url = base_url.into();
        info!("api:baseUrl: {}", base_url);
        Ok(Self {
            http,
            base_url,
            session,
            sign_out_hook: Arc::new(NoopSignOutHook),
        })
    }

    /// Replace the hook notified after sign-out
    pub fn with_sign_out_hook(mut self, hook: Arc<dyn SignOutHook>) -> Self {
        self.sign_out_hook = hook;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    pub async fn get(&self, url: &str, opts: RequestOptions) -> Result<Response, ApiError> {
        self.send(Method::GET, url, opts).await
    }

    pub async fn post(&self, url: &str, opts: RequestOptions) -> Result<Response, ApiError> {
        self.send(Method::POST, url, opts).await
    }

    pub async fn put(&self, url: &str, opts: RequestOptions) -> Result<Response, ApiError> {
        self.send(Method::PUT, url, opts).await
    }

    pub async fn delete(&self, url: &str, opts: RequestOptions) -> Result<Response, ApiError> {
        self.send(Method::DELETE, url, opts).await
    }

    pub async fn send(
        &self,
        method: Method,
        url: &str,
        opts: RequestOptions,
    ) -> Result<Response, ApiError> {
        let request = self.prepare(method, url, opts)?;
        self.exec(request).await
    }

    /// Run the request pipeline without touching the network
    pub fn prepare(
        &self,
        method: Method,
        url: &str,
        opts: RequestOptions,
    ) -> Result<PreparedRequest, ApiError> {
        let RequestOptions {
            headers: caller_headers,
            auth,
            data,
            body,
        } = opts;

        let url = self.normalize_url(url);

        let mut headers = BTreeMap::new();
        headers.insert("accept".to_string(), MIME_JSON.to_string());
        headers.insert(CONTENT_TYPE.to_string(), MIME_JSON.to_string());
        for (name, value) in caller_headers {
            headers.insert(name.to_ascii_lowercase(), value);
        }

        let auth = auth.or_else(|| self.session_token().map(Auth::Token));
        if let Some(auth) = auth {
            headers
                .entry(AUTHORIZATION.to_string())
                .or_insert_with(|| auth.header_value());
        }

        let (body, data) = match (body, data) {
            (None, Some(data))
                if is_json(headers.get(CONTENT_TYPE).map(String::as_str))
                    && matches!(data, Value::Object(_) | Value::Array(_)) =>
            {
                (Some(serde_json::to_string(&data)?), None)
            }
            (body, data) => (body, data),
        };

        Ok(PreparedRequest {
            method,
            url,
            headers,
            body,
            data,
        })
    }

    fn normalize_url(&self, url: &str) -> String {
        if url.starts_with("http:") || url.starts_with("https:") {
            url.to_string()
        } else {
            format!("{}{}", self.base_url, url)
        }
    }

    fn session_token(&self) -> Option<String> {
        let session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        session.token().map(str::to_string)
    }

    async fn exec(&self, request: PreparedRequest) -> Result<Response, ApiError> {
        let PreparedRequest {
            method,
            url,
            headers,
            body,
            ..
        } = request;
        debug!("api:request {} {}", method, url);

        let mut header_map = HeaderMap::new();
        for (name, value) in &headers {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| ApiError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|e| ApiError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            header_map.insert(header_name, header_value);
        }

        let mut builder = self.http.request(method.clone(), &url).headers(header_map);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let result = match builder.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                if status >= 400 {
                    Err(ApiError::Status {
                        status,
                        url: url.clone(),
                        body,
                    })
                } else {
                    debug!("api:response {} {} -> {}", method, url, status);
                    Ok(Response {
                        status,
                        url: url.clone(),
                        body,
                    })
                }
            }
            Err(source) => Err(ApiError::Transport {
                url: url.clone(),
                source,
            }),
        };

        if let Err(err) = &result {
            if err.is_unauthorized() && self.is_signed_in() {
                info!("invalid token, signout");
                self.sign_out_locally();
            }
            error!("request failed: {} ({} {})", err, method, url);
        }
        result
    }

    fn is_signed_in(&self) -> bool {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_signed_in()
    }

    /// Clear the local session and notify the sign-out hook
    ///
    /// Storage failures are logged; local sign-out always completes.
    pub fn sign_out_locally(&self) {
        {
            let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
            if let Err(e) = session.clear() {
                error!("Failed to clear session: {:#}", e);
            }
        }
        self.sign_out_hook.signed_out();
    }
}

fn is_json(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case(MIME_JSON))
        .unwrap_or(false)
}
