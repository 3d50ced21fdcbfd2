//! Memoization of "reached trie-node N at word-index i".
//!
//! A location is the point in the joint search space the A* engine can
//! reach via many distinct edit sequences; the cache guarantees at most
//! one is ever created per `(i, node)` pair, and lets later arrivals at an
//! already-resolved location skip straight to combining with its known
//! suffix set instead of re-expanding the subtree beneath it.

use crate::trie::NodeId;
use slab::Slab;
use std::collections::HashMap;

/// Handle into the path arena owned by the search engine. Kept as a bare
/// `usize` here (rather than importing the engine's `Path` type) so this
/// module has no dependency on the engine; the coupling runs the other
/// way.
pub type PathId = usize;
pub type LocationId = usize;

#[derive(Debug, Default)]
pub struct Location {
    /// Spelled-so-far -> the incoming path that reached this location via
    /// that spelling.
    pub incoming: HashMap<String, PathId>,
    /// The cheapest known incoming path; designated to carry this
    /// location's outgoing search.
    pub representative: Option<PathId>,
    /// `None` until resolved; then the lowest `g` at which this location
    /// was first fully expanded.
    pub resolved_base_cost: Option<u32>,
    /// Append-only once resolved: ways the subtree below this location
    /// can complete into a dictionary word, as (suffix, cost) pairs.
    pub suffixes: Vec<(String, u32)>,
}

impl Location {
    pub fn is_resolved(&self) -> bool {
        self.resolved_base_cost.is_some()
    }
}

/// Two-level map: word-index, then trie node, to a location.
pub struct LocationCache {
    by_index: Vec<HashMap<NodeId, LocationId>>,
    arena: Slab<Location>,
}

impl LocationCache {
    /// `query_len` bounds the word-index dimension (0..=query_len).
    pub fn new(query_len: usize) -> Self {
        Self {
            by_index: (0..=query_len).map(|_| HashMap::new()).collect(),
            arena: Slab::new(),
        }
    }

    /// Returns the existing location for `(i, n)`, or creates one.
    pub fn get_or_insert(&mut self, i: usize, n: NodeId) -> LocationId {
        if let Some(&id) = self.by_index[i].get(&n) {
            return id;
        }
        let id = self.arena.insert(Location::default());
        self.by_index[i].insert(n, id);
        id
    }

    pub fn find(&self, i: usize, n: NodeId) -> Option<LocationId> {
        self.by_index[i].get(&n).copied()
    }

    pub fn get(&self, id: LocationId) -> &Location {
        &self.arena[id]
    }

    pub fn get_mut(&mut self, id: LocationId) -> &mut Location {
        &mut self.arena[id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_pair_returns_same_location() {
        let mut cache = LocationCache::new(4);
        let a = cache.get_or_insert(2, 7);
        let b = cache.get_or_insert(2, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_pairs_get_distinct_locations() {
        let mut cache = LocationCache::new(4);
        let a = cache.get_or_insert(2, 7);
        let b = cache.get_or_insert(3, 7);
        let c = cache.get_or_insert(2, 8);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn unresolved_by_default() {
        let mut cache = LocationCache::new(2);
        let id = cache.get_or_insert(0, 0);
        assert!(!cache.get(id).is_resolved());
    }
}
