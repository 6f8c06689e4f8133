//! Pending several-artists lookups.

use std::collections::VecDeque;

use crate::catalog::MAX_ARTISTS_PER_REQUEST;

/// Ids waiting for a detail lookup, already split into request-sized pages.
///
/// The head batch stays in place until [`complete`](Self::complete) is
/// called, so an interrupted lookup is retried with the same ids.
#[derive(Debug, Clone, Default)]
pub struct PendingBatches {
    batches: VecDeque<Vec<String>>,
}

impl PendingBatches {
    /// Chunk `ids` into pages of at most `batch_size` (clamped to 1..=50)
    pub fn new(ids: Vec<String>, batch_size: usize) -> Self {
        let mut batches = Self::default();
        batches.extend(ids, batch_size);
        batches
    }

    /// Queue more ids behind the existing batches
    pub fn extend(&mut self, ids: Vec<String>, batch_size: usize) {
        let size = batch_size.clamp(1, MAX_ARTISTS_PER_REQUEST);
        self.batches.extend(ids.chunks(size).map(<[String]>::to_vec));
    }

    /// The batch to look up next
    pub fn head(&self) -> Option<&[String]> {
        self.batches.front().map(Vec::as_slice)
    }

    /// Drop the head batch once it has been handled
    pub fn complete(&mut self) -> Option<Vec<String>> {
        self.batches.pop_front()
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Ids across all waiting batches
    pub fn pending_ids(&self) -> usize {
        self.batches.iter().map(Vec::len).sum()
    }
}
