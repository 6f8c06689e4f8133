//! Catalog HTTP client
//!
//! Handles communication with the Spotify Web API.
//! See: https://developer.spotify.com/documentation/web-api
//!
//! The client does no backoff of its own beyond the bounded transport retry.
//! Rate limiting (429) and token expiry (401) are surfaced as
//! [`FetchOutcome`] variants for the caller to act on.

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::adapter;
use super::auth::CredentialManager;
use super::domain::{ArtistRecord, CatalogError, FetchOutcome, MAX_ARTISTS_PER_REQUEST, MAX_FEATURED_LIMIT};
use super::dto;
use super::retry::{RetryPolicy, send_with_retry};
use super::transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};

/// Default API root
pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1";

/// Default token endpoint
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Catalog API client
pub struct CatalogClient<T = ReqwestTransport> {
    transport: T,
    credentials: CredentialManager,
    base_url: String,
    retry: RetryPolicy,
    default_retry_after: Duration,
    requests_sent: u64,
}

impl<T: HttpTransport> CatalogClient<T> {
    /// Create a client over the given transport
    pub fn new(transport: T, credentials: CredentialManager) -> Self {
        Self {
            transport,
            credentials,
            base_url: DEFAULT_API_BASE_URL.to_string(),
            retry: RetryPolicy::default(),
            default_retry_after: Duration::from_secs(5),
            requests_sent: 0,
        }
    }

    /// Point the client at a different API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the transient-failure retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Delay to use when a 429 carries no usable `Retry-After` header
    pub fn with_default_retry_after(mut self, delay: Duration) -> Self {
        self.default_retry_after = delay;
        self
    }

    /// Number of catalog requests that got a response this session
    pub fn requests_sent(&self) -> u64 {
        self.requests_sent
    }

    pub fn credentials(&self) -> &CredentialManager {
        &self.credentials
    }

    /// Invalidate the cached token and acquire a fresh one right away
    pub async fn refresh_credential(&mut self) -> Result<(), CatalogError> {
        self.credentials.invalidate();
        self.credentials.acquire(&self.transport).await?;
        Ok(())
    }

    /// Fetch one page of currently-featured playlist ids
    pub async fn featured_collections(
        &mut self,
        limit: u32,
    ) -> Result<FetchOutcome<Vec<String>>, CatalogError> {
        let limit = limit.clamp(1, MAX_FEATURED_LIMIT);
        let url = format!("{}/browse/featured-playlists?limit={}", self.base_url, limit);

        let outcome = self.fetch::<dto::FeaturedPlaylistsResponse>(&url).await?;
        Ok(outcome.map(adapter::featured_collection_ids))
    }

    /// Fetch the artist ids credited on a playlist's tracks
    pub async fn collection_artist_ids(
        &mut self,
        collection_id: &str,
    ) -> Result<FetchOutcome<Vec<String>>, CatalogError> {
        let url = format!(
            "{}/playlists/{}/tracks",
            self.base_url,
            urlencoding::encode(collection_id)
        );

        let outcome = self.fetch::<dto::PlaylistTracksResponse>(&url).await?;
        Ok(outcome.map(adapter::track_artist_ids))
    }

    /// Fetch details for up to 50 artists in one request
    pub async fn several_artists(
        &mut self,
        ids: &[String],
    ) -> Result<FetchOutcome<Vec<ArtistRecord>>, CatalogError> {
        let url = self.several_artists_url(ids)?;

        let outcome = self.fetch::<dto::SeveralArtistsResponse>(&url).await?;
        Ok(outcome.map(adapter::several_artist_records))
    }

    /// Fetch the (at most 20) artists related to `artist_id`
    pub async fn related_artists(
        &mut self,
        artist_id: &str,
    ) -> Result<FetchOutcome<Vec<ArtistRecord>>, CatalogError> {
        let url = format!(
            "{}/artists/{}/related-artists",
            self.base_url,
            urlencoding::encode(artist_id)
        );

        let outcome = self.fetch::<dto::RelatedArtistsResponse>(&url).await?;
        Ok(outcome.map(adapter::related_artist_records))
    }

    fn several_artists_url(&self, ids: &[String]) -> Result<String, CatalogError> {
        if ids.is_empty() {
            return Err(CatalogError::InvalidRequest(
                "several-artists lookup needs at least one id".to_string(),
            ));
        }
        if ids.len() > MAX_ARTISTS_PER_REQUEST {
            return Err(CatalogError::InvalidRequest(format!(
                "several-artists lookup accepts at most {} ids, got {}",
                MAX_ARTISTS_PER_REQUEST,
                ids.len()
            )));
        }

        // Commas stay literal: the API splits the list on them
        let joined = ids
            .iter()
            .map(|id| urlencoding::encode(id).into_owned())
            .collect::<Vec<_>>()
            .join(",");

        Ok(format!("{}/artists?ids={}", self.base_url, joined))
    }

    /// Send an authenticated GET and classify the response
    async fn fetch<D: DeserializeOwned>(
        &mut self,
        url: &str,
    ) -> Result<FetchOutcome<D>, CatalogError> {
        let token = self.credentials.bearer(&self.transport).await?;
        let request = HttpRequest::get(url, token);

        let response = send_with_retry(&self.transport, &request, &self.retry).await?;
        self.requests_sent += 1;

        tracing::trace!(
            target: "catalog::client",
            url,
            status = response.status.as_u16(),
            requests_sent = self.requests_sent,
            "Catalog response"
        );

        classify(url, response, self.default_retry_after)
    }
}

/// Turn a raw response into an outcome or a classified error
fn classify<D: DeserializeOwned>(
    url: &str,
    response: HttpResponse,
    default_retry_after: Duration,
) -> Result<FetchOutcome<D>, CatalogError> {
    let status = response.status;

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = parse_retry_after(response.retry_after.as_deref())
            .unwrap_or(default_retry_after);
        return Ok(FetchOutcome::RateLimited { retry_after });
    }

    if status == StatusCode::UNAUTHORIZED {
        return Ok(FetchOutcome::CredentialExpired);
    }

    if !status.is_success() {
        // Try to parse the API's error envelope for a better message
        let message = serde_json::from_str::<dto::ApiErrorResponse>(&response.body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| {
                let body: String = response.body.chars().take(200).collect();
                if body.is_empty() {
                    status.canonical_reason().unwrap_or("Unknown").to_string()
                } else {
                    body
                }
            });
        return Err(CatalogError::Status {
            status: status.as_u16(),
            url: url.to_string(),
            message,
        });
    }

    serde_json::from_str::<D>(&response.body)
        .map(FetchOutcome::Success)
        .map_err(|e| CatalogError::Parse {
            url: url.to_string(),
            message: e.to_string(),
        })
}

/// `Retry-After` as delay-seconds
fn parse_retry_after(value: Option<&str>) -> Option<Duration> {
    value?.trim().parse::<u64>().ok().map(Duration::from_secs)
}
