//! HTTP transport seam.
//!
//! The catalog client and the credential manager never touch `reqwest`
//! directly; they hand an [`HttpRequest`] to an [`HttpTransport`] and get the
//! raw status, `Retry-After` header and body back. Production code uses
//! [`ReqwestTransport`], tests use the scripted transport in
//! `catalog::traits::mocks`.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, RETRY_AFTER};

/// User agent string sent with every request
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// HTTP method used by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Authorization attached to a request
#[derive(Clone, PartialEq, Eq)]
pub enum Authorization {
    /// `Authorization: Bearer <token>`
    Bearer(String),
    /// `Authorization: Basic base64(client_id:client_secret)`
    Basic {
        client_id: String,
        client_secret: String,
    },
}

impl fmt::Debug for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Authorization::Bearer(_) => f.write_str("Bearer(<redacted>)"),
            Authorization::Basic { client_id, .. } => f
                .debug_struct("Basic")
                .field("client_id", client_id)
                .field("client_secret", &"<redacted>")
                .finish(),
        }
    }
}

/// A request as the catalog layer describes it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub authorization: Authorization,
    /// Form fields (`application/x-www-form-urlencoded`), POST only
    pub form: Vec<(String, String)>,
}

impl HttpRequest {
    /// Authenticated GET expecting a JSON body
    pub fn get(url: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            authorization: Authorization::Bearer(bearer_token.into()),
            form: Vec::new(),
        }
    }

    /// Form POST authenticated with client credentials
    pub fn post_form(
        url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        form: Vec<(String, String)>,
    ) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            authorization: Authorization::Basic {
                client_id: client_id.into(),
                client_secret: client_secret.into(),
            },
            form,
        }
    }

    /// The bearer token this request carries, if any
    pub fn bearer_token(&self) -> Option<&str> {
        match &self.authorization {
            Authorization::Bearer(token) => Some(token),
            Authorization::Basic { .. } => None,
        }
    }
}

/// What came back from the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: StatusCode,
    /// Raw `Retry-After` header value
    pub retry_after: Option<String>,
    pub body: String,
}

impl HttpResponse {
    /// Build a response without a `Retry-After` header
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            retry_after: None,
            body: body.into(),
        }
    }
}

/// Network-level failures (no HTTP response was obtained)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out")]
    Timeout,

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl TransportError {
    /// Whether retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            TransportError::Connect(_) | TransportError::Timeout | TransportError::Body(_)
        )
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else if e.is_body() || e.is_decode() {
            TransportError::Body(e.to_string())
        } else {
            TransportError::Request(e.to_string())
        }
    }
}

/// Sends HTTP requests on behalf of the catalog layer.
///
/// Implement this trait to substitute the network in tests.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send a request and return the raw response
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Production transport backed by `reqwest`
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with the given per-request timeout
    ///
    /// The client is configured to:
    /// - Accept gzip-compressed responses
    /// - Send a User-Agent header identifying the application
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let builder = match request.method {
            Method::Get => self.http_client.get(&request.url),
            Method::Post => self.http_client.post(&request.url),
        };

        let mut builder = match &request.authorization {
            Authorization::Bearer(token) => builder.bearer_auth(token),
            Authorization::Basic {
                client_id,
                client_secret,
            } => builder.basic_auth(client_id, Some(client_secret)),
        }
        .header(ACCEPT, "application/json");

        if !request.form.is_empty() {
            builder = builder.form(&request.form);
        }

        let response = builder.send().await?;
        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await?;

        Ok(HttpResponse {
            status,
            retry_after,
            body,
        })
    }
}
