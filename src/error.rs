//! Error taxonomy for request building and execution.

use reqwest::Method;
use std::fmt;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Serialization format of a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    Json,
    Xml,
}

impl BodyFormat {
    /// Media type sent in the `Content-Type` header for this format.
    pub fn content_type(self) -> &'static str {
        match self {
            BodyFormat::Json => "application/json",
            BodyFormat::Xml => "application/xml",
        }
    }
}

impl fmt::Display for BodyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyFormat::Json => write!(f, "JSON"),
            BodyFormat::Xml => write!(f, "XML"),
        }
    }
}

/// Why a round trip did not produce a response.
#[derive(Debug, Error)]
pub enum NetworkFailure {
    /// DNS, connect, TLS, or timeout failure reported by the transport.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    /// The request context was cancelled before the response arrived.
    #[error("request cancelled")]
    Cancelled,
    /// The request context deadline passed before the response arrived.
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

#[derive(Debug, Error)]
pub enum Error {
    /// The base URL, or the URL after merging query parameters, does not parse.
    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The outbound request could not be assembled (bad header name or value).
    #[error("failed to construct {method} request to {url}: {reason}")]
    RequestConstruction {
        method: Method,
        url: String,
        reason: String,
    },

    /// The body passed to `set_json_body` / `set_xml_body` could not be serialized.
    #[error("failed to encode {format} request body: {message}")]
    Encoding { format: BodyFormat, message: String },

    #[error("http {method} {url} failed: {source}")]
    Network {
        method: Method,
        url: String,
        #[source]
        source: NetworkFailure,
    },

    #[error("failed to read response body of {method} {url}: {source}")]
    BodyRead {
        method: Method,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body does not match the expected envelope (strict decoding only).
    #[error("failed to decode response body: {0}")]
    Unmarshal(#[from] serde_json::Error),

    /// The server answered with a 5xx status.
    #[error("http {method} {url} -> {status}")]
    Server {
        method: Method,
        url: String,
        status: u16,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true for transport-level failures, including cancellation.
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network { .. })
    }

    /// Returns true if the round trip was cut short by a timeout or deadline.
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Network {
                source: NetworkFailure::Transport(e),
                ..
            } => e.is_timeout(),
            Error::Network {
                source: NetworkFailure::DeadlineExceeded,
                ..
            } => true,
            _ => false,
        }
    }
}
