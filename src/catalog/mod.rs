//! Remote artist catalog - authenticated access to the Spotify Web API.
//!
//! # Architecture
//!
//! Mirrors a clean separation between:
//! - **Domain models** (`domain.rs`) - artist records, fetch outcomes, errors
//! - **API DTOs** (`dto.rs`) - exact API response shapes
//! - **Adapter** (`adapter.rs`) - converts DTOs to domain models
//! - **Transport** (`transport.rs`) - the HTTP seam, with a `reqwest` implementation
//! - **Auth** (`auth.rs`) - client-credentials token caching and refresh
//! - **Client** (`client.rs`) - endpoint calls and response classification
//! - **Traits** (`traits.rs`) - the [`CatalogApi`] seam used by the explorer
//!
//! # Usage
//!
//! ```ignore
//! use artist_explorer::catalog::{CatalogClient, ClientCredentials, CredentialManager, ReqwestTransport};
//!
//! let credentials = ClientCredentials::new(Some(id), Some(secret))?;
//! let manager = CredentialManager::new(credentials, DEFAULT_TOKEN_URL);
//! let mut client = CatalogClient::new(ReqwestTransport::new(timeout)?, manager);
//!
//! if let FetchOutcome::Success(related) = client.related_artists("4Z8W4fKeB5YxbusRsdQVPb").await? {
//!     println!("{} related artists", related.len());
//! }
//! ```

pub mod adapter;
pub mod auth;
pub mod client;
pub mod domain;
pub mod dto;
pub mod retry;
pub mod traits;
pub mod transport;

pub use auth::{ClientCredentials, CredentialManager};
pub use client::{CatalogClient, DEFAULT_API_BASE_URL, DEFAULT_TOKEN_URL};
pub use domain::{
    ArtistRecord, CatalogError, FetchOutcome, MAX_ARTISTS_PER_REQUEST, MAX_FEATURED_LIMIT,
    MAX_RELATED_ARTISTS,
};
pub use retry::RetryPolicy;
pub use traits::CatalogApi;
pub use transport::{HttpTransport, ReqwestTransport, TransportError};
