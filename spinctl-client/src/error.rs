//! Error types for the Gate client

use reqwest::{Method, StatusCode};
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the Gate client
#[derive(Debug, Error)]
pub enum ClientError {
    /// No bearer token was supplied
    #[error("access token not provided")]
    MissingCredential,

    /// The bearer token can't be sent as an HTTP header value
    #[error("access token is not a valid header value")]
    InvalidCredential,

    /// The Gate base URL could not be parsed
    #[error("invalid gate URL {url}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The underlying HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// A request could not be built, sent, or was answered with an error
    #[error(transparent)]
    Request(#[from] RequestError),
}

impl ClientError {
    /// The request error, if this error came from a request
    pub fn as_request(&self) -> Option<&RequestError> {
        match self {
            ClientError::Request(err) => Some(err),
            _ => None,
        }
    }

    /// Check if the request was abandoned because the caller cancelled it
    pub fn is_canceled(&self) -> bool {
        self.as_request().is_some_and(RequestError::is_canceled)
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        self.as_request().is_some_and(RequestError::is_not_found)
    }
}

/// A failed request against Gate
///
/// Carries the originating method and path so the message reads like
/// `DELETE /pipelines/01H: 404 execution not found`. The status is present
/// whenever Gate answered, which lets callers tell an API rejection apart
/// from a request that never got a response.
#[derive(Debug)]
pub struct RequestError {
    method: Method,
    path: String,
    status: Option<StatusCode>,
    kind: ErrorKind,
}

impl RequestError {
    pub fn new(method: Method, path: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            method,
            path: path.into(),
            status: None,
            kind,
        }
    }

    /// Attach the status of the response that caused this error
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path of the request URL
    pub fn path(&self) -> &str {
        &self.path
    }

    /// HTTP status of the response, if one was received
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// What went wrong
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self.kind, ErrorKind::Canceled)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(StatusCode::NOT_FOUND)
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        self.status.is_some_and(|status| status.is_client_error())
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        self.status.is_some_and(|status| status.is_server_error())
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:", self.method, self.path)?;
        if let Some(status) = self.status {
            write!(f, " {}", status.as_u16())?;
        }
        write!(f, " {}", self.kind)
    }
}

impl std::error::Error for RequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.kind)
    }
}

/// Cause of a [`RequestError`]
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// The caller's cancellation token fired before the request finished
    #[error("request canceled")]
    Canceled,

    /// Connection or protocol failure
    #[error("{0}")]
    Transport(#[source] reqwest::Error),

    /// The path could not be resolved against the base URL
    #[error("invalid URL: {0}")]
    Url(#[source] url::ParseError),

    #[error("failed to build request: {0}")]
    RequestBuild(#[source] reqwest::Error),

    /// The request body could not be serialized
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// A successful response carried a malformed body
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The body of an error response could not be read
    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    /// An error response with an HTML body, kept as raw text
    #[error("{0}")]
    Html(String),

    /// An error response, with whatever Gate's JSON envelope told us
    #[error("{0}")]
    Api(ApiError),
}

/// Gate's JSON error envelope
///
/// Decoding is best effort, so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let error = self.error.as_deref().filter(|e| !e.is_empty());
        let message = self.message.as_deref().filter(|m| !m.is_empty());
        match (error, message) {
            (Some(error), Some(message)) => write!(f, "{}: {}", error, message),
            (Some(text), None) | (None, Some(text)) => f.write_str(text),
            (None, None) => f.write_str("unexpected error response"),
        }
    }
}
