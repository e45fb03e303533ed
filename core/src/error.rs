//! Error types for the request executor.
//!
//! # Design
//! A call produces exactly one outcome. Caller errors (`MissingParam`,
//! `UnsupportedMethod`, `UnknownRoute`, `NoTransport`, `Serialization`) are
//! raised before the transport is touched. The remaining three variants are
//! the failure outcomes of a dispatched request: the transport could not
//! deliver it, the server answered with a non-2xx status, or the server
//! answered 2xx with something that is not JSON.

use serde_json::Value;
use thiserror::Error;

use crate::http::HttpMethod;

/// Errors returned by `RestClient::execute` and its per-method helpers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required `:name` token had no value.
    #[error("missing required path parameter: {name}")]
    MissingParam { name: String },

    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// A route registry is attached and does not declare this path+method.
    #[error("no route registered for {method} {path}")]
    UnknownRoute { method: HttpMethod, path: String },

    #[error("no transport configured")]
    NoTransport,

    /// The request body could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The transport failed before a response was obtained.
    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),

    /// The server returned a non-2xx status.
    #[error(transparent)]
    Http(Box<HttpFailure>),

    /// The server returned 2xx but the body was not acceptable JSON.
    #[error(transparent)]
    Parse(Box<ParseFailure>),
}

impl ApiError {
    /// HTTP status for failures that carry a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http(failure) => Some(failure.status),
            ApiError::Parse(failure) => Some(failure.status),
            _ => None,
        }
    }
}

impl From<HttpFailure> for ApiError {
    fn from(failure: HttpFailure) -> Self {
        ApiError::Http(Box::new(failure))
    }
}

impl From<ParseFailure> for ApiError {
    fn from(failure: ParseFailure) -> Self {
        ApiError::Parse(Box::new(failure))
    }
}

/// Error reported by a `Transport`. Only the message is kept; timeouts, DNS
/// and connection failures are not told apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        TransportError::new(err.to_string())
    }
}

/// Body of a non-2xx response, decoded on a best-effort basis.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    /// JSON content type and the body parsed.
    Json(Value),
    /// Anything else that was not empty.
    Text(String),
    Empty,
}

impl ErrorBody {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ErrorBody::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ErrorBody::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ErrorBody::Empty)
    }
}

/// The server said no.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct HttpFailure {
    pub message: String,
    pub status: u16,
    pub status_text: String,
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: ErrorBody,
}

impl HttpFailure {
    pub fn header(&self, name: &str) -> Option<&str> {
        crate::http::find_header(&self.headers, name)
    }
}

/// The server said yes but did not send JSON.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseFailure {
    pub message: String,
    pub status: u16,
    pub status_text: String,
    pub url: String,
    pub method: HttpMethod,
    pub content_type: Option<String>,
    /// Raw body text; `None` when the body was empty.
    pub body_text: Option<String>,
}
