//! Internal domain models for the artist catalog.
//!
//! These types are OUR types - they don't change when the remote API changes.
//! All catalog responses get converted into these types via the adapter.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::transport::TransportError;

/// Maximum number of ids the several-artists endpoint accepts per request
pub const MAX_ARTISTS_PER_REQUEST: usize = 50;

/// Maximum number of related artists the service returns per artist
pub const MAX_RELATED_ARTISTS: usize = 20;

/// Maximum page size for featured collections
pub const MAX_FEATURED_LIMIT: u32 = 50;

/// An artist as recorded in the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRecord {
    /// Catalog-assigned artist identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Genre tags, in the order the service returns them
    pub genres: Vec<String>,
    /// Popularity score (0-100)
    pub popularity: u32,
}

/// Result of a catalog request that reached the service.
///
/// Rate limiting and credential expiry are recoverable, so they are modelled
/// as outcomes rather than errors. Anything else that goes wrong is a
/// [`CatalogError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome<T> {
    /// The request succeeded and the body was parsed
    Success(T),
    /// HTTP 429 - wait `retry_after` before trying again
    RateLimited { retry_after: Duration },
    /// HTTP 401 - the bearer token must be re-acquired
    CredentialExpired,
}

impl<T> FetchOutcome<T> {
    /// Convert the success payload, keeping recoverable signals as they are
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchOutcome<U> {
        match self {
            FetchOutcome::Success(value) => FetchOutcome::Success(f(value)),
            FetchOutcome::RateLimited { retry_after } => FetchOutcome::RateLimited { retry_after },
            FetchOutcome::CredentialExpired => FetchOutcome::CredentialExpired,
        }
    }

    /// Returns the payload if the request succeeded
    pub fn success(self) -> Option<T> {
        match self {
            FetchOutcome::Success(value) => Some(value),
            _ => None,
        }
    }
}

/// Errors that can occur while talking to the catalog
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    #[error("Missing catalog credentials: {0}")]
    MissingCredentials(&'static str),

    #[error("Token request rejected (HTTP {status}): {message}")]
    Authentication { status: u16, message: String },

    #[error("Transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error("HTTP {status} from {url}: {message}")]
    Status {
        status: u16,
        url: String,
        message: String,
    },

    #[error("Failed to parse response from {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CatalogError {
    /// Whether the failure belongs to a single lookup rather than the session.
    ///
    /// Only these errors may be skipped; credential and request-construction
    /// problems would fail the same way for every item.
    pub fn is_item_scoped(&self) -> bool {
        matches!(
            self,
            CatalogError::Transport(_) | CatalogError::Status { .. } | CatalogError::Parse { .. }
        )
    }
}
