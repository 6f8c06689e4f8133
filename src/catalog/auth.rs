//! Client-credentials token management.
//!
//! The catalog only accepts bearer tokens, which are obtained by exchanging
//! the application's client id and secret at the accounts service. Tokens
//! are short-lived, but no local clock is kept: a token is used until the
//! catalog answers 401, at which point it is invalidated and re-acquired.

use std::fmt;

use super::domain::CatalogError;
use super::dto;
use super::retry::{RetryPolicy, send_with_retry};
use super::transport::{HttpRequest, HttpTransport};

/// Application credentials for the client-credentials flow
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    client_id: String,
    client_secret: String,
}

impl ClientCredentials {
    /// Validate and wrap the client id and secret.
    ///
    /// Fails fast if either is missing or blank; nothing is retried.
    pub fn new(
        client_id: Option<String>,
        client_secret: Option<String>,
    ) -> Result<Self, CatalogError> {
        let client_id = client_id
            .filter(|id| !id.trim().is_empty())
            .ok_or(CatalogError::MissingCredentials("client id"))?;
        let client_secret = client_secret
            .filter(|secret| !secret.trim().is_empty())
            .ok_or(CatalogError::MissingCredentials("client secret"))?;

        Ok(Self {
            client_id,
            client_secret,
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Owns the cached bearer token
pub struct CredentialManager {
    credentials: ClientCredentials,
    token_url: String,
    retry: RetryPolicy,
    token: Option<String>,
    acquisitions: u32,
}

impl CredentialManager {
    /// Create a manager; no token is requested until first use
    pub fn new(credentials: ClientCredentials, token_url: impl Into<String>) -> Self {
        Self {
            credentials,
            token_url: token_url.into(),
            retry: RetryPolicy::default(),
            token: None,
            acquisitions: 0,
        }
    }

    /// Override the transient-failure retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Current bearer token, acquiring one if none is cached
    pub async fn bearer<T: HttpTransport + ?Sized>(
        &mut self,
        transport: &T,
    ) -> Result<String, CatalogError> {
        match &self.token {
            Some(token) => Ok(token.clone()),
            None => self.acquire(transport).await,
        }
    }

    /// Drop the cached token so the next [`bearer`](Self::bearer) call re-acquires it
    pub fn invalidate(&mut self) {
        if self.token.take().is_some() {
            tracing::debug!(target: "catalog::auth", "Access token invalidated");
        }
    }

    pub fn client_id(&self) -> &str {
        self.credentials.client_id()
    }

    /// Whether a token is currently cached
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Number of tokens obtained so far
    pub fn acquisitions(&self) -> u32 {
        self.acquisitions
    }

    /// Exchange the client credentials for a new token and cache it
    pub async fn acquire<T: HttpTransport + ?Sized>(
        &mut self,
        transport: &T,
    ) -> Result<String, CatalogError> {
        let request = HttpRequest::post_form(
            &self.token_url,
            &self.credentials.client_id,
            &self.credentials.client_secret,
            vec![("grant_type".to_string(), "client_credentials".to_string())],
        );

        let response = send_with_retry(transport, &request, &self.retry).await?;

        if !response.status.is_success() {
            let message = serde_json::from_str::<dto::AuthErrorResponse>(&response.body)
                .map(|e| match e.error_description {
                    Some(description) => format!("{}: {}", e.error, description),
                    None => e.error,
                })
                .unwrap_or_else(|_| response.body.chars().take(200).collect());
            return Err(CatalogError::Authentication {
                status: response.status.as_u16(),
                message,
            });
        }

        let token: dto::TokenResponse =
            serde_json::from_str(&response.body).map_err(|e| CatalogError::Authentication {
                status: response.status.as_u16(),
                message: format!("malformed token response: {}", e),
            })?;

        self.acquisitions += 1;
        tracing::info!(
            target: "catalog::auth",
            client_id = %self.credentials.client_id,
            expires_in = ?token.expires_in,
            "Acquired access token"
        );

        self.token = Some(token.access_token.clone());
        Ok(token.access_token)
    }
}
