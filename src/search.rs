//! The A*-style best-first search over the joint space of word-index x
//! trie-node.
//!
//! The generator/collector coupling is modeled as a stateful iterator
//! whose "next" step, [`SearchEngine::advance`], takes the caller's
//! updated cost bound as a parameter; a plain [`Iterator`] implementation
//! is provided for callers happy with the engine's own cost bound.

use crate::heap::{HeapKey, PairingHeap};
use crate::location::{LocationCache, LocationId, PathId};
use crate::orthography;
use crate::trie::{NodeId, Trie};
use debug_print::debug_println;
use slab::Slab;
use std::collections::{HashMap, VecDeque};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const BASE_COST: u32 = 100;
pub const SWAP_COST: u32 = 75;
pub const DUPLICATE_LETTER_COST: u32 = 25;
pub const VISUALLY_SIMILAR_COST: u32 = 1;
pub const FIRST_LETTER_BIAS: u32 = 25;
pub const MAX_NUM_CHANGES: f64 = 3.0;
pub const MAX_COST_SCALE: f64 = 0.515;

/// A compound-word joining strategy, accepted and stored by the engine
/// but never branched on here: compound search is out of scope for this
/// crate and left to a separate layer built on top of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CompoundMethod {
    #[default]
    None,
    JoinWords,
    SeparateWords,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditAction {
    Identity,
    Replace,
    Delete,
    Insert,
    Swap,
    DuplicateCollapse,
    DuplicateExpand,
}

type EdgeId = usize;

struct Edge {
    source: PathId,
    target_location: LocationId,
    label: String,
    cost: u32,
    #[allow(dead_code)]
    action: EditAction,
}

struct Path {
    node: NodeId,
    index: usize,
    word: String,
    g: u32,
    active: bool,
    location: LocationId,
    /// Outgoing edges this path created whose target location hasn't
    /// resolved yet.
    pending: Vec<EdgeId>,
    /// The edge that created this path, used to bubble a resolution up to
    /// the parent once this path's own location resolves.
    creating_edge: Option<EdgeId>,
}

/// A single accepted correction candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Suggestion {
    pub word: String,
    pub cost: u32,
}

/// Drives the best-first search for one query against one trie root.
///
/// Tries are read-only for the duration of a search; all of the engine's
/// caches are owned by this struct and dropped with it.
pub struct SearchEngine<'t> {
    trie: &'t Trie,
    query: Vec<char>,
    query_len: usize,
    cost_limit: u32,
    paths: Slab<Path>,
    edges: Slab<Edge>,
    locations: LocationCache,
    heap: PairingHeap<PathId>,
    ready: VecDeque<(String, u32)>,
    emitted: HashMap<String, u32>,
    no_follow: Vec<char>,
    #[allow(dead_code)]
    compound_method: CompoundMethod,
}

impl<'t> SearchEngine<'t> {
    pub fn new(trie: &'t Trie, query: &str, ignore_case: bool) -> Self {
        Self::with_compound_method(trie, query, ignore_case, CompoundMethod::None)
    }

    pub fn with_compound_method(
        trie: &'t Trie,
        query: &str,
        ignore_case: bool,
        compound_method: CompoundMethod,
    ) -> Self {
        let chars: Vec<char> = query.chars().collect();
        let query_len = chars.len();
        let initial_limit = (BASE_COST as f64
            * (query_len as f64 * MAX_COST_SCALE).min(MAX_NUM_CHANGES))
        .round() as u32;

        let mut engine = Self {
            trie,
            query: chars,
            query_len,
            cost_limit: initial_limit,
            paths: Slab::new(),
            edges: Slab::new(),
            locations: LocationCache::new(query_len),
            heap: PairingHeap::new(),
            ready: VecDeque::new(),
            emitted: HashMap::new(),
            no_follow: trie.no_follow_set(),
            compound_method,
        };

        for (node, g) in trie.initial_nodes(ignore_case) {
            let loc_id = engine.locations.get_or_insert(0, node);
            let path_id = engine.paths.insert(Path {
                node,
                index: 0,
                word: String::new(),
                g,
                active: true,
                location: loc_id,
                pending: Vec::new(),
                creating_edge: None,
            });
            // the first arrival at (0, node) is always representative
            engine.locations.get_mut(loc_id).representative = Some(path_id);
            engine.heap.push(HeapKey { g, i: 0 }, path_id);
        }
        engine
    }

    pub fn cost_limit(&self) -> u32 {
        self.cost_limit
    }

    /// Pulls the next accepted `(word, cost)` pair, optionally tightening
    /// the cost bound first. The cost bound is monotone non-increasing:
    /// passing a looser value than the current bound has no effect.
    pub fn advance(&mut self, change_limit: Option<u32>) -> Option<Suggestion> {
        if let Some(limit) = change_limit {
            self.cost_limit = self.cost_limit.min(limit);
        }
        loop {
            while let Some((word, cost)) = self.ready.pop_front() {
                if cost > self.cost_limit {
                    continue;
                }
                if word
                    .chars()
                    .last()
                    .map_or(false, |c| self.no_follow.contains(&c))
                {
                    continue;
                }
                if let Some(&prev) = self.emitted.get(&word) {
                    if prev <= cost {
                        continue;
                    }
                }
                self.emitted.insert(word.clone(), cost);
                return Some(Suggestion { word, cost });
            }
            let path_id = self.pop_active()?;
            self.expand(path_id);
        }
    }

    /// Pops the cheapest active path, skipping deactivated tombstones. If
    /// the cheapest remaining entry already exceeds the cost limit, the
    /// heap's ordering guarantees nothing cheaper remains, so the search
    /// ends.
    fn pop_active(&mut self) -> Option<PathId> {
        loop {
            let (key, path_id) = self.heap.pop()?;
            if key.g > self.cost_limit {
                return None;
            }
            if !self.paths[path_id].active {
                continue;
            }
            return Some(path_id);
        }
    }

    fn expand(&mut self, path_id: PathId) {
        let node = self.paths[path_id].node;
        let index = self.paths[path_id].index;

        if self.trie.is_terminal(node) {
            self.handle_terminal(path_id);
        }

        if index < self.query_len {
            self.try_identity(path_id);
            self.try_replace(path_id);
            self.try_delete(path_id);
            self.try_swap(path_id);
            self.try_duplicate(path_id);
        }
        self.try_insert(path_id);

        self.bubble(path_id);
    }

    /// Registers the trivial zero-cost suffix at a terminal node and
    /// schedules the synthetic tail-delete completion.
    fn handle_terminal(&mut self, path_id: PathId) {
        let loc_id = self.paths[path_id].location;
        self.locations.get_mut(loc_id).suffixes.push((String::new(), 0));

        let index = self.paths[path_id].index;
        let remaining = (self.query_len - index) as u32;
        let tail_cost = remaining * BASE_COST;
        let g = self.paths[path_id].g;
        let total = g + tail_cost;
        debug_println!("terminal at index {index}, tail cost {tail_cost}, total {total}");
        if total <= self.cost_limit {
            let word = self.paths[path_id].word.clone();
            self.ready.push_back((word, total));
        }
    }

    fn try_identity(&mut self, path_id: PathId) {
        let (node, index) = (self.paths[path_id].node, self.paths[path_id].index);
        let qc = self.query[index];
        if let Some(child) = self.trie.effective_child(node, qc) {
            self.add_edge(
                path_id,
                child,
                index + 1,
                qc.to_string(),
                0,
                EditAction::Identity,
            );
        }
    }

    fn try_replace(&mut self, path_id: PathId) {
        let (node, index) = (self.paths[path_id].node, self.paths[path_id].index);
        let qc = self.query[index];
        for (c, child) in self.trie.effective_children(node) {
            if c == qc {
                continue;
            }
            let cost = if orthography::visually_similar(c, qc) {
                VISUALLY_SIMILAR_COST
            } else {
                BASE_COST + if index == 0 { FIRST_LETTER_BIAS } else { 0 }
            };
            self.add_edge(path_id, child, index + 1, c.to_string(), cost, EditAction::Replace);
        }
    }

    fn try_delete(&mut self, path_id: PathId) {
        let (node, index) = (self.paths[path_id].node, self.paths[path_id].index);
        self.add_edge(
            path_id,
            node,
            index + 1,
            String::new(),
            BASE_COST,
            EditAction::Delete,
        );
    }

    fn try_insert(&mut self, path_id: PathId) {
        let (node, index) = (self.paths[path_id].node, self.paths[path_id].index);
        for (c, child) in self.trie.effective_children(node) {
            self.add_edge(path_id, child, index, c.to_string(), BASE_COST, EditAction::Insert);
        }
    }

    fn try_swap(&mut self, path_id: PathId) {
        let (node, index) = (self.paths[path_id].node, self.paths[path_id].index);
        if index + 1 >= self.query_len {
            return;
        }
        let (a, b) = (self.query[index], self.query[index + 1]);
        if a == b {
            return;
        }
        if let Some(mid) = self.trie.effective_child(node, b) {
            if let Some(end) = self.trie.child(mid, a) {
                let label: String = [b, a].iter().collect();
                self.add_edge(path_id, end, index + 2, label, SWAP_COST, EditAction::Swap);
            }
        }
    }

    fn try_duplicate(&mut self, path_id: PathId) {
        let (node, index) = (self.paths[path_id].node, self.paths[path_id].index);
        if index + 1 >= self.query_len {
            return;
        }
        let (a, b) = (self.query[index], self.query[index + 1]);
        if a == b {
            if let Some(child) = self.trie.effective_child(node, a) {
                self.add_edge(
                    path_id,
                    child,
                    index + 2,
                    a.to_string(),
                    DUPLICATE_LETTER_COST,
                    EditAction::DuplicateCollapse,
                );
            }
        } else if let Some(child) = self.trie.effective_child(node, a) {
            if let Some(doubled) = self.trie.child(child, a) {
                let label: String = [a, a].iter().collect();
                self.add_edge(
                    path_id,
                    doubled,
                    index + 1,
                    label,
                    DUPLICATE_LETTER_COST,
                    EditAction::DuplicateExpand,
                );
            }
        }
    }

    /// The heart of the memoization: an edge to an already-resolved
    /// location can reuse its suffix set directly instead of waiting.
    fn add_edge(
        &mut self,
        source: PathId,
        target_node: NodeId,
        target_index: usize,
        label: String,
        cost: u32,
        action: EditAction,
    ) {
        let g_new = self.paths[source].g + cost;
        if g_new > self.cost_limit {
            return;
        }

        let loc_id = self.locations.get_or_insert(target_index, target_node);
        if let Some(base) = self.locations.get(loc_id).resolved_base_cost {
            if base <= g_new {
                let edge_id = self.edges.insert(Edge {
                    source,
                    target_location: loc_id,
                    label,
                    cost,
                    action,
                });
                self.paths[source].pending.push(edge_id);
                self.resolve_edge(edge_id);
                return;
            }
        }

        let spelled = format!("{}{}", self.paths[source].word, label);
        if let Some(&existing) = self.locations.get(loc_id).incoming.get(&spelled) {
            if self.paths[existing].g <= g_new {
                return;
            }
        }

        let new_path_id = self.paths.insert(Path {
            node: target_node,
            index: target_index,
            word: spelled.clone(),
            g: g_new,
            active: true,
            location: loc_id,
            pending: Vec::new(),
            creating_edge: None,
        });
        let edge_id = self.edges.insert(Edge {
            source,
            target_location: loc_id,
            label,
            cost,
            action,
        });
        self.paths[new_path_id].creating_edge = Some(edge_id);
        self.paths[source].pending.push(edge_id);

        let loc = self.locations.get_mut(loc_id);
        loc.incoming.insert(spelled, new_path_id);
        let becomes_representative = match loc.representative {
            None => true,
            Some(rep) => self.paths[rep].g > g_new,
        };
        if becomes_representative {
            if let Some(old_rep) = loc.representative {
                self.paths[old_rep].active = false;
            }
            loc.representative = Some(new_path_id);
            self.heap.push(HeapKey { g: g_new, i: target_index as u32 }, new_path_id);
        }
    }

    /// Combines a resolved target location's suffix set with an edge's
    /// own label/cost, emits any ready words, and propagates the
    /// resolution up through the edge's source path.
    fn resolve_edge(&mut self, edge_id: EdgeId) {
        let loc_id = self.edges[edge_id].target_location;
        if !self.locations.get(loc_id).is_resolved() {
            return;
        }
        let suffixes = self.locations.get(loc_id).suffixes.clone();
        let source = self.edges[edge_id].source;
        let label = self.edges[edge_id].label.clone();
        let cost = self.edges[edge_id].cost;

        for (suffix, suffix_cost) in &suffixes {
            let total = self.paths[source].g + cost + suffix_cost;
            if total <= self.cost_limit {
                let word = format!("{}{}{}", self.paths[source].word, label, suffix);
                self.ready.push_back((word, total));
            }
        }

        self.paths[source].pending.retain(|&e| e != edge_id);

        let source_loc_id = self.paths[source].location;
        if self.locations.get(source_loc_id).representative == Some(source) {
            let combined: Vec<(String, u32)> = suffixes
                .iter()
                .map(|(s, c)| (format!("{label}{s}"), cost + c))
                .collect();
            self.locations.get_mut(source_loc_id).suffixes.extend(combined);
        }

        self.bubble(source);
    }

    /// Finalizes a path's own location once it has no outgoing edges left
    /// to wait on, then propagates that resolution to whoever is waiting
    /// on this path's location.
    fn bubble(&mut self, path_id: PathId) {
        if !self.paths[path_id].pending.is_empty() {
            return;
        }
        let loc_id = self.paths[path_id].location;
        if self.locations.get(loc_id).is_resolved() {
            return;
        }
        if self.locations.get(loc_id).representative != Some(path_id) {
            // Not representative: nothing to finalize yet, but if this
            // path itself was waiting on a now-resolved edge, forward it.
            if let Some(e) = self.paths[path_id].creating_edge {
                self.resolve_edge(e);
            }
            return;
        }

        let g = self.paths[path_id].g;
        self.locations.get_mut(loc_id).resolved_base_cost = Some(g);
        debug_println!("location {loc_id} resolved at cost {g}");
        let incoming: Vec<PathId> = self.locations.get(loc_id).incoming.values().copied().collect();
        for p in incoming {
            if let Some(e) = self.paths[p].creating_edge {
                self.resolve_edge(e);
            }
        }
    }
}

impl<'t> Iterator for SearchEngine<'t> {
    type Item = Suggestion;

    fn next(&mut self) -> Option<Suggestion> {
        self.advance(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::Trie;

    fn engine_for<'t>(trie: &'t Trie, query: &str) -> SearchEngine<'t> {
        SearchEngine::new(trie, query, false)
    }

    #[test]
    fn exact_match_is_first_and_free() {
        let trie = Trie::from_words(["hello", "help", "hell"]);
        let mut engine = engine_for(&trie, "hello");
        let first = engine.next().expect("at least one suggestion");
        assert_eq!(first.word, "hello");
        assert_eq!(first.cost, 0);
    }

    #[test]
    fn single_trailing_insert_costs_base() {
        let trie = Trie::from_words(["apple", "apples"]);
        let mut engine = engine_for(&trie, "apple");
        let mut seen = HashMap::new();
        while let Some(Suggestion { word, cost }) = engine.next() {
            seen.insert(word, cost);
        }
        assert_eq!(seen.get("apple"), Some(&0));
        assert_eq!(seen.get("apples"), Some(&BASE_COST));
    }

    #[test]
    fn adjacent_transposition_costs_swap() {
        let trie = Trie::from_words(["category"]);
        let mut engine = engine_for(&trie, "cateogry");
        let mut best: Option<u32> = None;
        while let Some(Suggestion { word, cost }) = engine.next() {
            if word == "category" {
                best = Some(best.map_or(cost, |b: u32| b.min(cost)));
            }
        }
        assert_eq!(best, Some(SWAP_COST));
    }

    #[test]
    fn visually_similar_first_letter_replace_is_cheap() {
        // 'e' and 'i' are grouped as visually similar (see orthography.rs)
        let trie = Trie::from_words(["implode"]);
        let mut engine = engine_for(&trie, "emplode");
        let mut best: Option<u32> = None;
        while let Some(Suggestion { word, cost }) = engine.next() {
            if word == "implode" {
                best = Some(best.map_or(cost, |b: u32| b.min(cost)));
            }
        }
        assert_eq!(best, Some(VISUALLY_SIMILAR_COST));
    }

    #[test]
    fn empty_dictionary_yields_nothing() {
        let trie = Trie::new();
        let mut engine = engine_for(&trie, "anything");
        assert!(engine.next().is_none());
    }

    #[test]
    fn no_word_is_emitted_twice() {
        let trie = Trie::from_words(["cat", "cot", "car", "can"]);
        let mut engine = engine_for(&trie, "cat");
        let mut seen = std::collections::HashSet::new();
        while let Some(Suggestion { word, .. }) = engine.next() {
            assert!(seen.insert(word), "word emitted twice");
        }
    }

    #[test]
    fn cost_limit_never_increases_when_tightened() {
        let trie = Trie::from_words(["cat", "cot", "car", "can", "cap"]);
        let mut engine = engine_for(&trie, "cat");
        let initial = engine.cost_limit();
        let _ = engine.advance(Some(initial));
        let before = engine.cost_limit();
        let _ = engine.advance(Some(before + 1000));
        assert_eq!(engine.cost_limit(), before);
    }

    #[test]
    fn no_follow_characters_are_never_emitted() {
        // The reserved character can appear deep in the trie (not just
        // hidden behind the root), so the no-follow filter must check the
        // emitted word itself, not merely exclude root sentinel edges.
        let mut trie = Trie::new();
        trie.compound_character = Some('+');
        trie.insert("dog");
        trie.insert("do+");
        let mut engine = engine_for(&trie, "do");
        let mut saw_dog = false;
        while let Some(Suggestion { word, .. }) = engine.next() {
            assert!(!word.ends_with('+'));
            saw_dog |= word == "dog";
        }
        assert!(saw_dog);
    }
}
