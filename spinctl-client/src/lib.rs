//! spinctl HTTP Client
//!
//! A small, typed REST client for the Gate API.
//!
//! [`GateClient`] is bound to a base URL. It builds requests from a path,
//! query parameters and an optional JSON body, executes them under a
//! caller-supplied [`CancellationToken`], decodes JSON responses, and turns
//! error responses into a structured [`RequestError`]. It knows nothing about
//! Gate's resources or authentication; that lives one layer up.
//!
//! # Example
//!
//! ```no_run
//! use reqwest::Method;
//! use serde_json::Value;
//! use spinctl_client::GateClient;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> spinctl_client::Result<()> {
//!     let client = GateClient::new("https://gate.example.com")?;
//!     let cancel = CancellationToken::new();
//!
//!     let request = client.new_request(Method::GET, "/applications", &[])?;
//!     let applications: Option<Value> = client.execute(&cancel, request).await?;
//!
//!     println!("{:?}", applications);
//!     Ok(())
//! }
//! ```

pub mod error;

pub use error::{ApiError, ClientError, ErrorKind, RequestError, Result};

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Client, Method, Request, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

/// HTTP client bound to a Gate base URL
///
/// Cloning is cheap and clones share the underlying connection pool, so one
/// client can serve many concurrent requests.
#[derive(Debug, Clone)]
pub struct GateClient {
    /// Base URL every request path is resolved against
    base_url: Url,
    /// HTTP client instance
    client: Client,
}

impl GateClient {
    /// Create a new Gate client
    ///
    /// The underlying HTTP client keeps a cookie store, so a session cookie
    /// handed out by Gate is replayed on later requests.
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the Gate API (e.g., "https://gate.example.com")
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(ClientError::HttpClient)?;

        Self::with_client(base_url, client)
    }

    /// Create a new Gate client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use reqwest::Client;
    /// use spinctl_client::GateClient;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = GateClient::with_client("https://gate.example.com", http_client).unwrap();
    /// assert_eq!(client.base_url().as_str(), "https://gate.example.com/");
    /// ```
    pub fn with_client(base_url: &str, client: Client) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|source| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;

        Ok(Self { base_url, client })
    }

    /// Get the base URL of the Gate API
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // =============================================================================
    // Request Building
    // =============================================================================

    /// Build a request without a body
    ///
    /// `path` is resolved against the base URL the way a browser resolves a
    /// link, so an absolute path replaces the base URL's path. A non-empty
    /// `query` replaces the URL's query string.
    pub fn new_request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Request> {
        self.build_request(method, path, query, None)
    }

    /// Build a request carrying `body` serialized as JSON
    pub fn new_json_request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: &B,
    ) -> Result<Request> {
        let body = serde_json::to_vec(body)
            .map_err(|e| RequestError::new(method.clone(), path, ErrorKind::Encode(e)))?;

        self.build_request(method, path, query, Some(body))
    }

    fn build_request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<Vec<u8>>,
    ) -> Result<Request> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| RequestError::new(method.clone(), path, ErrorKind::Url(e)))?;

        if !query.is_empty() {
            url.query_pairs_mut().clear().extend_pairs(query);
        }

        let url_path = url.path().to_string();
        let mut builder = self.client.request(method.clone(), url);
        if let Some(body) = body {
            builder = builder
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(body);
        }

        builder
            .build()
            .map_err(|e| RequestError::new(method, url_path, ErrorKind::RequestBuild(e)).into())
    }

    // =============================================================================
    // Request Execution
    // =============================================================================

    /// Send a request and classify the response
    ///
    /// Returns the response untouched when its status is below 400. For
    /// anything else the body is read and turned into a [`RequestError`]
    /// carrying the status: HTML bodies are kept as raw text, anything else
    /// is decoded as Gate's JSON error envelope on a best effort basis.
    ///
    /// If `cancel` fires before the exchange completes, the in-flight call is
    /// dropped and the error kind is [`ErrorKind::Canceled`], even when the
    /// transport also reported a failure.
    pub async fn send(&self, cancel: &CancellationToken, request: Request) -> Result<Response> {
        let method = request.method().clone();
        let path = request.url().path().to_string();

        debug!("{} {}", method, path);

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(RequestError::new(method, path, ErrorKind::Canceled).into());
            }
            result = self.client.execute(request) => result,
        };

        let response = match result {
            Ok(response) => response,
            Err(_) if cancel.is_cancelled() => {
                return Err(RequestError::new(method, path, ErrorKind::Canceled).into());
            }
            Err(e) => {
                return Err(RequestError::new(method, path, ErrorKind::Transport(e)).into());
            }
        };

        let status = response.status();
        debug!("{} {} -> {}", method, path, status.as_u16());

        if status.as_u16() < 400 {
            return Ok(response);
        }

        let is_html = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|content_type| content_type.starts_with("text/html"));

        let kind = match read_body(cancel, response).await {
            Ok(body) if is_html => ErrorKind::Html(String::from_utf8_lossy(&body).into_owned()),
            Ok(body) => ErrorKind::Api(serde_json::from_slice(&body).unwrap_or_default()),
            Err(kind) => kind,
        };

        Err(RequestError::new(method, path, kind)
            .with_status(status)
            .into())
    }

    /// Send a request and decode the JSON response body
    ///
    /// An empty body is not an error: it yields `Ok(None)`. Only the first
    /// JSON value in the body is decoded.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        request: Request,
    ) -> Result<Option<T>> {
        let method = request.method().clone();
        let path = request.url().path().to_string();

        let response = self.send(cancel, request).await?;
        let status = response.status();

        let body = read_body(cancel, response)
            .await
            .map_err(|kind| fail(&method, &path, status, kind))?;

        match decode_first(&body) {
            Ok(value) => Ok(value),
            Err(e) => Err(fail(&method, &path, status, ErrorKind::Decode(e))),
        }
    }
}

// =============================================================================
// Response Handlers
// =============================================================================

/// Read a whole response body, giving up if `cancel` fires first
async fn read_body(
    cancel: &CancellationToken,
    response: Response,
) -> std::result::Result<Vec<u8>, ErrorKind> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ErrorKind::Canceled),
        body = response.bytes() => body.map(|body| body.to_vec()).map_err(ErrorKind::Body),
    }
}

/// Decode the first JSON value in `body`, treating an empty body as no value
fn decode_first<T: DeserializeOwned>(body: &[u8]) -> serde_json::Result<Option<T>> {
    serde_json::Deserializer::from_slice(body)
        .into_iter::<T>()
        .next()
        .transpose()
}

fn fail(method: &Method, path: &str, status: StatusCode, kind: ErrorKind) -> ClientError {
    RequestError::new(method.clone(), path, kind)
        .with_status(status)
        .into()
}
