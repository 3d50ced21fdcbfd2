//! A mergeable min-priority queue ordered by A* cost with a tie-breaker
//! favoring deeper progress into the query.
//!
//! Implemented as an arena-indexed pairing heap (`slab::Slab` backing the
//! node pool) rather than a pointer/`Rc` tree, trading pointer chasing for
//! index indirection.

use slab::Slab;
use std::cmp::Ordering;

pub type HeapId = usize;

/// Ordering key: `g` ascending (cheaper first), `i` descending (prefer
/// the path that consumed more of the query) as a tiebreak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapKey {
    pub g: u32,
    pub i: u32,
}

impl Ord for HeapKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.g.cmp(&other.g).then_with(|| other.i.cmp(&self.i))
    }
}

impl PartialOrd for HeapKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct PairNode<T> {
    key: HeapKey,
    item: T,
    child: Option<HeapId>,
    sibling: Option<HeapId>,
}

/// A pairing heap whose nodes are indices into a slab, so merging never
/// requires moving or reparenting through owned pointers.
pub struct PairingHeap<T> {
    arena: Slab<PairNode<T>>,
    root: Option<HeapId>,
    len: usize,
}

impl<T> Default for PairingHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PairingHeap<T> {
    pub fn new() -> Self {
        Self {
            arena: Slab::new(),
            root: None,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts `item` with the given key. O(1) amortized.
    pub fn push(&mut self, key: HeapKey, item: T) -> HeapId {
        let id = self.arena.insert(PairNode {
            key,
            item,
            child: None,
            sibling: None,
        });
        self.root = Some(match self.root {
            None => id,
            Some(r) => self.link(r, id),
        });
        self.len += 1;
        id
    }

    /// Removes and returns the minimum-key item. O(log n) amortized.
    pub fn pop(&mut self) -> Option<(HeapKey, T)> {
        let root = self.root?;
        let node = self.arena.remove(root);
        self.root = self.merge_pairs(node.child);
        self.len -= 1;
        Some((node.key, node.item))
    }

    /// Makes `winner` the parent of `loser`, picking the smaller key as
    /// winner. Returns the id of the resulting subtree's root.
    fn link(&mut self, a: HeapId, b: HeapId) -> HeapId {
        let (winner, loser) = if self.arena[a].key <= self.arena[b].key {
            (a, b)
        } else {
            (b, a)
        };
        let old_child = self.arena[winner].child;
        self.arena[loser].sibling = old_child;
        self.arena[winner].child = Some(loser);
        winner
    }

    /// The standard pairing-heap two-pass merge over a root's children,
    /// done recursively: pair adjacent siblings left to right, then fold
    /// the pairs together.
    fn merge_pairs(&mut self, first: Option<HeapId>) -> Option<HeapId> {
        let a = first?;
        let a_sibling = self.arena[a].sibling;
        self.arena[a].sibling = None;
        match a_sibling {
            None => Some(a),
            Some(b) => {
                let b_sibling = self.arena[b].sibling;
                self.arena[b].sibling = None;
                let paired = self.link(a, b);
                match self.merge_pairs(b_sibling) {
                    None => Some(paired),
                    Some(rest) => Some(self.link(paired, rest)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_ascending_cost_order() {
        let mut heap = PairingHeap::new();
        heap.push(HeapKey { g: 5, i: 0 }, "e");
        heap.push(HeapKey { g: 1, i: 0 }, "a");
        heap.push(HeapKey { g: 3, i: 0 }, "c");
        heap.push(HeapKey { g: 2, i: 0 }, "b");
        heap.push(HeapKey { g: 4, i: 0 }, "d");
        let mut out = Vec::new();
        while let Some((_, item)) = heap.pop() {
            out.push(item);
        }
        assert_eq!(out, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn ties_break_on_deeper_progress_first() {
        let mut heap = PairingHeap::new();
        heap.push(HeapKey { g: 1, i: 2 }, "shallow");
        heap.push(HeapKey { g: 1, i: 5 }, "deep");
        let (_, first) = heap.pop().unwrap();
        assert_eq!(first, "deep");
    }

    #[test]
    fn len_tracks_push_and_pop() {
        let mut heap = PairingHeap::new();
        assert!(heap.is_empty());
        heap.push(HeapKey { g: 0, i: 0 }, 1);
        heap.push(HeapKey { g: 0, i: 0 }, 2);
        assert_eq!(heap.len(), 2);
        heap.pop();
        assert_eq!(heap.len(), 1);
    }
}
