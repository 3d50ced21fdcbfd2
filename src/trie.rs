//! The prefix-tree dictionary model the search engine traverses.
//!
//! Construction and compilation of real dictionaries is out of scope here
//! (that lives in a separate subsystem); this module only needs to support
//! the read-only traversal the engine performs plus a minimal builder for
//! tests and small in-memory dictionaries.

use slab::Slab;
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub type NodeId = usize;

#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
struct Node {
    children: HashMap<char, NodeId>,
    terminal: bool,
}

/// A prefix tree over dictionary words.
///
/// The root additionally carries three reserved single-character
/// sentinels used by an external dictionary compiler to hide a
/// case-folded subtrie, a compound-joining subtrie, and a forbidden-word
/// subtrie behind ordinary child edges. The search engine never inspects
/// these characters directly; it only asks the trie to hand back the set
/// of nodes it should start searching from and the characters a
/// completed word must not end in.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Trie {
    nodes: Slab<Node>,
    root: NodeId,
    pub compound_character: Option<char>,
    pub forbidden_word_prefix: Option<char>,
    pub strip_case_and_accents_prefix: Option<char>,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    pub fn new() -> Self {
        let mut nodes = Slab::new();
        let root = nodes.insert(Node::default());
        Self {
            nodes,
            root,
            compound_character: None,
            forbidden_word_prefix: None,
            strip_case_and_accents_prefix: None,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn is_terminal(&self, node: NodeId) -> bool {
        self.nodes[node].terminal
    }

    /// Plain (non-filtering) child lookup; always legal below the root.
    pub fn child(&self, node: NodeId, c: char) -> Option<NodeId> {
        self.nodes[node].children.get(&c).copied()
    }

    /// Child lookup that hides the root's reserved-sentinel edges, per
    /// the contract that the search engine never follows them during
    /// ordinary traversal.
    pub fn effective_child(&self, node: NodeId, c: char) -> Option<NodeId> {
        if node == self.root && self.is_reserved(c) {
            return None;
        }
        self.child(node, c)
    }

    /// All children, excluding the root's reserved sentinels when `node`
    /// is the root.
    pub fn effective_children(&self, node: NodeId) -> Vec<(char, NodeId)> {
        let is_root = node == self.root;
        self.nodes[node]
            .children
            .iter()
            .filter(|(&c, _)| !is_root || !self.is_reserved(c))
            .map(|(&c, &id)| (c, id))
            .collect()
    }

    fn is_reserved(&self, c: char) -> bool {
        Some(c) == self.compound_character
            || Some(c) == self.forbidden_word_prefix
            || Some(c) == self.strip_case_and_accents_prefix
    }

    /// Inserts `word` into the dictionary, creating intermediate nodes as
    /// needed and marking the final node terminal.
    pub fn insert(&mut self, word: &str) {
        let mut current = self.root;
        for c in word.chars() {
            current = match self.nodes[current].children.get(&c) {
                Some(&next) => next,
                None => {
                    let next = self.nodes.insert(Node::default());
                    self.nodes[current].children.insert(c, next);
                    next
                }
            };
        }
        self.nodes[current].terminal = true;
    }

    pub fn extend<'w, I: IntoIterator<Item = &'w str>>(&mut self, words: I) {
        for word in words {
            self.insert(word);
        }
    }

    pub fn from_words<'w, I: IntoIterator<Item = &'w str>>(words: I) -> Self {
        let mut trie = Self::new();
        trie.extend(words);
        trie
    }

    /// The characters an emitted word must never end in: the three
    /// reserved sentinels.
    pub fn no_follow_set(&self) -> Vec<char> {
        [
            self.compound_character,
            self.forbidden_word_prefix,
            self.strip_case_and_accents_prefix,
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// The nodes the search starts exploring from at word-index 0, each
    /// paired with its starting cost. The first (the true root) starts at
    /// 0; an additional case-folded root, if requested and present,
    /// starts at 1 so exact-case matches win ties.
    pub fn initial_nodes(&self, ignore_case: bool) -> Vec<(NodeId, u32)> {
        let mut out = vec![(self.root, 0)];
        if ignore_case {
            if let Some(c) = self.strip_case_and_accents_prefix {
                if let Some(folded_root) = self.child(self.root, c) {
                    out.push((folded_root, 1));
                }
            }
        }
        out
    }
}
