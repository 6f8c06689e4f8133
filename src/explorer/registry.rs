//! Artist registry - the single source of truth for "already recorded".

use indexmap::IndexMap;

use crate::catalog::ArtistRecord;

/// Storage behind the registry.
///
/// The explorer only needs membership and insert-if-absent, so a durable
/// store can stand in for the in-memory [`Registry`].
pub trait ArtistStore: Send {
    /// Whether an artist with this id has been recorded
    fn contains(&self, id: &str) -> bool;

    /// Record an artist unless its id is already present.
    ///
    /// Returns `true` if the record was inserted. The first record for an id
    /// wins; later ones are ignored.
    fn insert(&mut self, record: ArtistRecord) -> bool;

    /// Number of recorded artists
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory registry, iterated in discovery order
#[derive(Debug, Clone, Default)]
pub struct Registry {
    artists: IndexMap<String, ArtistRecord>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a recorded artist
    pub fn get(&self, id: &str) -> Option<&ArtistRecord> {
        self.artists.get(id)
    }

    /// Recorded ids in the order they were discovered
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.artists.keys().map(String::as_str)
    }

    pub fn into_records(self) -> Vec<ArtistRecord> {
        self.artists.into_values().collect()
    }
}

impl ArtistStore for Registry {
    fn contains(&self, id: &str) -> bool {
        self.artists.contains_key(id)
    }

    fn insert(&mut self, record: ArtistRecord) -> bool {
        if self.artists.contains_key(&record.id) {
            return false;
        }
        self.artists.insert(record.id.clone(), record);
        true
    }

    fn len(&self) -> usize {
        self.artists.len()
    }
}
