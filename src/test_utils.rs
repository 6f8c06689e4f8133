//! Test utilities and fixtures for artist-explorer tests.
//!
//! Factories for artist records and canned catalog response bodies, so
//! client and engine tests can script HTTP exchanges without a server.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{artists_body, token_body};
//!
//! let transport = ScriptedTransport::new()
//!     .on("/api/token", vec![Ok(HttpResponse::new(StatusCode::OK, token_body("t1")))])
//!     .on("/related-artists", vec![Ok(HttpResponse::new(StatusCode::OK, artists_body(&["b1"])))]);
//! ```

use reqwest::StatusCode;
use serde_json::json;

use crate::catalog::ArtistRecord;
use crate::catalog::transport::HttpResponse;

/// Creates an artist record with predictable fields derived from `id`.
///
/// Customize using struct update syntax:
///
/// ```ignore
/// let renamed = ArtistRecord {
///     name: "Someone Else".to_string(),
///     ..artist("A")
/// };
/// ```
pub fn artist(id: &str) -> ArtistRecord {
    ArtistRecord {
        id: id.to_string(),
        name: format!("Artist {}", id),
        genres: vec!["test-genre".to_string()],
        popularity: 50,
    }
}

/// Owned ids, for seeding an explorer.
pub fn seeds(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

/// Body of a successful client-credentials token exchange.
pub fn token_body(token: &str) -> String {
    json!({
        "access_token": token,
        "token_type": "Bearer",
        "expires_in": 3600
    })
    .to_string()
}

/// Body of a several-artists or related-artists response listing `ids`.
pub fn artists_body(ids: &[&str]) -> String {
    let artists: Vec<_> = ids
        .iter()
        .map(|id| {
            let record = artist(id);
            json!({
                "id": record.id,
                "name": record.name,
                "genres": record.genres,
                "popularity": record.popularity,
                "type": "artist"
            })
        })
        .collect();
    json!({ "artists": artists }).to_string()
}

/// A 429 response, with the given `Retry-After` header value if any.
pub fn rate_limited(retry_after: Option<&str>) -> HttpResponse {
    HttpResponse {
        retry_after: retry_after.map(str::to_owned),
        ..HttpResponse::new(StatusCode::TOO_MANY_REQUESTS, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::dto::{RelatedArtistsResponse, TokenResponse};

    #[test]
    fn test_artist_defaults() {
        let record = artist("A");
        assert_eq!(record.id, "A");
        assert_eq!(record.name, "Artist A");
        assert_eq!(record.popularity, 50);
    }

    #[test]
    fn test_bodies_parse_as_catalog_responses() {
        let token: TokenResponse = serde_json::from_str(&token_body("t1")).unwrap();
        assert_eq!(token.access_token, "t1");

        let related: RelatedArtistsResponse =
            serde_json::from_str(&artists_body(&["a", "b"])).unwrap();
        assert_eq!(related.artists.len(), 2);
        assert_eq!(related.artists[1].id, "b");
    }

    #[test]
    fn test_rate_limited_response() {
        let response = rate_limited(Some("7"));
        assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.retry_after.as_deref(), Some("7"));
    }
}
