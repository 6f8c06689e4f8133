//! Frontier - artist ids waiting to be expanded.
//!
//! FIFO order, so discovery proceeds breadth-first and test fixtures are
//! reproducible. Every id is admitted at most once per session; popping is
//! permanent.

use std::collections::{HashSet, VecDeque};

#[derive(Debug, Clone, Default)]
pub struct Frontier {
    queue: VecDeque<String>,
    admitted: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `id` unless it was ever admitted before. Returns `true` if queued.
    pub fn push(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if !self.admitted.insert(id.clone()) {
            return false;
        }
        self.queue.push_back(id);
        true
    }

    /// Take the next id to expand
    pub fn pop(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    /// Ids still waiting
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Ids admitted over the whole session, including popped ones
    pub fn admitted(&self) -> usize {
        self.admitted.len()
    }
}
