//! Byte trie backing the fragment automaton
//!
//! All nodes live in a single contiguous table and refer to each other by
//! `u32` index. Node 0 is the root. Failure and output links are stored on
//! the nodes but left unresolved here; [`crate::automaton`] fills them in
//! once every fragment has been inserted.

use crate::error::{Result, WildcardError};
use std::collections::BTreeMap;

/// Index of the root node
pub const ROOT: u32 = 0;

/// A single trie node
#[derive(Debug, Clone)]
pub struct TrieNode {
    /// Outgoing transitions, ordered by byte
    pub(crate) children: BTreeMap<u8, u32>,
    /// Longest proper suffix that is also a trie prefix
    pub(crate) failure: u32,
    /// Nearest terminal node along the failure chain
    pub(crate) output: Option<u32>,
    /// Back reference, only used to rebuild labels for diagnostics
    pub(crate) parent: Option<u32>,
    pub(crate) parent_byte: u8,
    /// Fragment ids that end exactly here
    pub(crate) terminals: Vec<u32>,
    pub(crate) depth: u32,
}

impl TrieNode {
    fn new(parent: Option<u32>, parent_byte: u8, depth: u32) -> Self {
        Self {
            children: BTreeMap::new(),
            failure: ROOT,
            output: None,
            parent,
            parent_byte,
            terminals: Vec::new(),
            depth,
        }
    }

    /// Child reached on `byte`, if any
    #[inline]
    pub fn child(&self, byte: u8) -> Option<u32> {
        self.children.get(&byte).copied()
    }

    /// Iterate `(byte, child)` transitions in byte order
    pub fn children(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.children.iter().map(|(&b, &c)| (b, c))
    }

    /// Failure link target
    pub fn failure(&self) -> u32 {
        self.failure
    }

    /// Output link target
    pub fn output(&self) -> Option<u32> {
        self.output
    }

    /// Parent node (`None` for the root)
    pub fn parent(&self) -> Option<u32> {
        self.parent
    }

    /// Byte on the edge from the parent (`None` for the root)
    pub fn parent_byte(&self) -> Option<u8> {
        self.parent.map(|_| self.parent_byte)
    }

    /// Fragment ids terminating at this node
    pub fn terminals(&self) -> &[u32] {
        &self.terminals
    }

    /// True if at least one fragment ends here
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !self.terminals.is_empty()
    }

    /// Length of the string this node represents
    pub fn depth(&self) -> u32 {
        self.depth
    }
}

/// Index-addressed byte trie
#[derive(Debug, Clone)]
pub struct Trie {
    nodes: Vec<TrieNode>,
}

impl Trie {
    /// Create a trie containing only the root
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::new(None, 0, 0)],
        }
    }

    /// Insert `fragment` and mark `id` as terminal at its final node.
    ///
    /// Returns the index of the final node. Fragments sharing the same text
    /// end on the same node and are all kept.
    ///
    /// # Errors
    ///
    /// Returns [`WildcardError::EmptyFragment`] for a zero-length fragment.
    pub fn insert(&mut self, fragment: &[u8], id: u32) -> Result<u32> {
        if fragment.is_empty() {
            return Err(WildcardError::EmptyFragment);
        }

        let mut current = ROOT;
        for &byte in fragment {
            current = match self.nodes[current as usize].child(byte) {
                Some(next) => next,
                None => {
                    let new_id = self.nodes.len() as u32;
                    let depth = self.nodes[current as usize].depth + 1;
                    self.nodes
                        .push(TrieNode::new(Some(current), byte, depth));
                    self.nodes[current as usize].children.insert(byte, new_id);
                    new_id
                }
            };
        }

        self.nodes[current as usize].terminals.push(id);
        Ok(current)
    }

    /// Walk `prefix` from the root, returning the node it ends on
    pub fn find(&self, prefix: &[u8]) -> Option<u32> {
        prefix
            .iter()
            .try_fold(ROOT, |node, &b| self.nodes[node as usize].child(b))
    }

    /// Number of nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Node at `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    #[inline]
    pub fn node(&self, id: u32) -> &TrieNode {
        &self.nodes[id as usize]
    }

    /// All nodes in index order
    pub fn nodes(&self) -> &[TrieNode] {
        &self.nodes
    }

    pub(crate) fn node_mut(&mut self, id: u32) -> &mut TrieNode {
        &mut self.nodes[id as usize]
    }

    /// Rebuild the string represented by `id` from parent back references
    pub fn label(&self, id: u32) -> Vec<u8> {
        let mut label = Vec::with_capacity(self.nodes[id as usize].depth as usize);
        let mut current = id;
        while let Some(parent) = self.nodes[current as usize].parent {
            label.push(self.nodes[current as usize].parent_byte);
            current = parent;
        }
        label.reverse();
        label
    }
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}
