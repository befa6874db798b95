use thiserror::Error;

/// Failures of the bridge itself (not of the proxied call)
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("unknown endpoint '{0}'")]
    UnknownEndpoint(String),

    #[error("unknown method '{endpoint}.{method}'")]
    UnknownMethod { endpoint: String, method: String },

    #[error("invalid params for '{endpoint}.{method}': {source}")]
    InvalidParams {
        endpoint: String,
        method: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed bridge message: {0}")]
    Protocol(#[from] serde_json::Error),

    #[error("bridge host unavailable")]
    HostUnavailable,
}
