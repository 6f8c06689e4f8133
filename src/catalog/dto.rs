//! Catalog API Data Transfer Objects
//!
//! These types match what the Spotify Web API returns for the endpoints we
//! call. DO NOT use these types outside the catalog module - convert to
//! domain types in the adapter.
//!
//! API Reference: https://developer.spotify.com/documentation/web-api
//!
//! Example artist object:
//! ```json
//! {
//!   "id": "0OdUWJ0sBjDrqHygGUXeCF",
//!   "name": "Band of Horses",
//!   "genres": ["indie folk", "indie rock"],
//!   "popularity": 59
//! }
//! ```

use serde::{Deserialize, Serialize};

/// `GET /artists?ids=...`
///
/// Unknown ids come back as `null` entries.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeveralArtistsResponse {
    #[serde(default)]
    pub artists: Vec<Option<Artist>>,
}

/// `GET /artists/{id}/related-artists`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelatedArtistsResponse {
    #[serde(default)]
    pub artists: Vec<Artist>,
}

/// Full artist object
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    /// 0-100, absent on some partial objects
    pub popularity: Option<u32>,
}

/// `GET /browse/featured-playlists`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeaturedPlaylistsResponse {
    pub message: Option<String>,
    pub playlists: Paging<PlaylistSummary>,
}

/// Generic paging envelope
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Paging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub next: Option<String>,
    pub total: Option<u32>,
}

/// Simplified playlist object
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: Option<String>,
}

/// `GET /playlists/{id}/tracks`
pub type PlaylistTracksResponse = Paging<PlaylistItem>;

/// A playlist entry; `track` is null for removed or unavailable tracks
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaylistItem {
    pub track: Option<Track>,
}

/// Track object (only the fields we read)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Track {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub artists: Vec<SimplifiedArtist>,
}

/// Artist reference inside a track; local files have no id
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimplifiedArtist {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// `POST /api/token`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: Option<String>,
    /// Lifetime in seconds
    pub expires_in: Option<u64>,
}

/// Error envelope of the Web API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

/// Error envelope of the accounts (token) service
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthErrorResponse {
    pub error: String,
    pub error_description: Option<String>,
}
