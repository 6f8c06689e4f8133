//! Adapter layer: Convert catalog DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.

use indexmap::IndexSet;

use super::domain::{ArtistRecord, MAX_RELATED_ARTISTS};
use super::dto;

/// Convert a full artist object into a registry record
pub fn to_artist_record(artist: dto::Artist) -> ArtistRecord {
    ArtistRecord {
        id: artist.id,
        name: artist.name,
        genres: artist.genres,
        popularity: artist.popularity.unwrap_or(0),
    }
}

/// Records from a several-artists lookup; `null` entries (unknown ids) are dropped
pub fn several_artist_records(response: dto::SeveralArtistsResponse) -> Vec<ArtistRecord> {
    response
        .artists
        .into_iter()
        .flatten()
        .map(to_artist_record)
        .collect()
}

/// Records from a related-artists lookup, capped at [`MAX_RELATED_ARTISTS`]
pub fn related_artist_records(response: dto::RelatedArtistsResponse) -> Vec<ArtistRecord> {
    let returned = response.artists.len();
    if returned > MAX_RELATED_ARTISTS {
        tracing::warn!(
            target: "catalog::adapter",
            returned,
            "Related-artists response exceeds {} entries, ignoring the rest",
            MAX_RELATED_ARTISTS
        );
    }

    response
        .artists
        .into_iter()
        .take(MAX_RELATED_ARTISTS)
        .map(to_artist_record)
        .collect()
}

/// Distinct playlist ids from a featured-playlists page, in page order
pub fn featured_collection_ids(response: dto::FeaturedPlaylistsResponse) -> Vec<String> {
    response
        .playlists
        .items
        .into_iter()
        .map(|playlist| playlist.id)
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct artist ids credited on a playlist's tracks, in playlist order
///
/// Items without a track and artists without an id (local files) are skipped.
pub fn track_artist_ids(response: dto::PlaylistTracksResponse) -> Vec<String> {
    response
        .items
        .into_iter()
        .filter_map(|item| item.track)
        .flat_map(|track| track.artists)
        .filter_map(|artist| artist.id)
        .filter(|id| !id.is_empty())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}
