//! Trait definitions for the catalog seam.
//!
//! The traversal engine only sees [`CatalogApi`]. Production code uses
//! [`CatalogClient`], while tests can substitute the graph-backed
//! [`mocks::MockCatalog`] or drive the real client through
//! [`mocks::ScriptedTransport`].
//!
//! # Example
//!
//! ```ignore
//! use artist_explorer::catalog::CatalogApi;
//!
//! async fn count_related<C: CatalogApi>(catalog: &mut C) -> usize {
//!     match catalog.related_artists("some-id").await? {
//!         FetchOutcome::Success(artists) => artists.len(),
//!         _ => 0,
//!     }
//! }
//! ```

use async_trait::async_trait;

use super::client::CatalogClient;
use super::domain::{ArtistRecord, CatalogError, FetchOutcome};
use super::transport::HttpTransport;

/// Catalog operations the traversal engine depends on.
#[async_trait]
pub trait CatalogApi: Send {
    /// Ids of currently-featured collections (one page, at most `limit`)
    async fn featured_collections(
        &mut self,
        limit: u32,
    ) -> Result<FetchOutcome<Vec<String>>, CatalogError>;

    /// Distinct artist ids credited on a collection's tracks
    async fn collection_artist_ids(
        &mut self,
        collection_id: &str,
    ) -> Result<FetchOutcome<Vec<String>>, CatalogError>;

    /// Details for up to 50 artists
    async fn several_artists(
        &mut self,
        ids: &[String],
    ) -> Result<FetchOutcome<Vec<ArtistRecord>>, CatalogError>;

    /// At most 20 artists related to `artist_id`
    async fn related_artists(
        &mut self,
        artist_id: &str,
    ) -> Result<FetchOutcome<Vec<ArtistRecord>>, CatalogError>;

    /// Discard the current credential and obtain a new one
    async fn refresh_credential(&mut self) -> Result<(), CatalogError>;

    /// Requests issued so far this session
    fn requests_sent(&self) -> u64;
}

#[async_trait]
impl<T: HttpTransport> CatalogApi for CatalogClient<T> {
    async fn featured_collections(
        &mut self,
        limit: u32,
    ) -> Result<FetchOutcome<Vec<String>>, CatalogError> {
        CatalogClient::featured_collections(self, limit).await
    }

    async fn collection_artist_ids(
        &mut self,
        collection_id: &str,
    ) -> Result<FetchOutcome<Vec<String>>, CatalogError> {
        CatalogClient::collection_artist_ids(self, collection_id).await
    }

    async fn several_artists(
        &mut self,
        ids: &[String],
    ) -> Result<FetchOutcome<Vec<ArtistRecord>>, CatalogError> {
        CatalogClient::several_artists(self, ids).await
    }

    async fn related_artists(
        &mut self,
        artist_id: &str,
    ) -> Result<FetchOutcome<Vec<ArtistRecord>>, CatalogError> {
        CatalogClient::related_artists(self, artist_id).await
    }

    async fn refresh_credential(&mut self) -> Result<(), CatalogError> {
        CatalogClient::refresh_credential(self).await
    }

    fn requests_sent(&self) -> u64 {
        CatalogClient::requests_sent(self)
    }
}
