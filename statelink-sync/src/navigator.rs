//! Navigation seam.
//!
//! The synchronizer reads and rewrites the address bar through this trait.
//! It deliberately offers no "push": every rewrite is a history replace, so
//! mirroring never grows the back/forward stack. A host adapting a real
//! router implements these two methods; tests use [`MemoryNavigator`].

use crate::query::QueryMap;

/// Read and replace the current query string.
pub trait Navigator {
    /// Returns the current query.
    fn query(&self) -> QueryMap;

    /// Replaces the current query without creating a history entry.
    fn replace_query(&mut self, query: &QueryMap);
}

/// An in-memory navigator for tests and headless embeddings.
///
/// Tracks how many replaces happened, so tests can assert "at most one
/// rewrite per batch" instead of guessing.
#[derive(Debug, Clone, Default)]
pub struct MemoryNavigator {
    query: QueryMap,
    replaces: usize,
}

impl MemoryNavigator {
    /// Creates a navigator with an empty query string.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a navigator positioned at the given query string.
    #[must_use]
    pub fn with_query(raw: &str) -> Self {
        Self {
            query: QueryMap::parse(raw),
            replaces: 0,
        }
    }

    /// Number of `replace_query` calls so far.
    #[must_use]
    pub fn replace_count(&self) -> usize {
        self.replaces
    }
}

impl Navigator for MemoryNavigator {
    fn query(&self) -> QueryMap {
        self.query.clone()
    }

    fn replace_query(&mut self, query: &QueryMap) {
        self.query = query.clone();
        self.replaces += 1;
    }
}
