//! Aho-Corasick Automaton
//!
//! This module turns a [`Trie`] of fragments into a matching automaton by
//! resolving failure links and output links in a single breadth-first pass,
//! and provides the streaming matching engine on top of it.
//!
//! # Design
//!
//! - Failure links are computed level by level with an explicit work queue.
//!   A node's failure link depends only on links of strictly shallower
//!   nodes, so BFS order guarantees they are already resolved.
//! - Output links are resolved in the same pass: a node links to its failure
//!   target when that target is terminal, otherwise it inherits the failure
//!   target's output link. Reporting all fragments at a node is then a walk
//!   over terminal nodes only.
//! - The automaton is immutable after [`Automaton::build`]; all per-scan state
//!   lives in [`FragmentHits`], so one automaton can serve concurrent scans.

use crate::error::{Result, WildcardError};
use crate::trie::{Trie, ROOT};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

/// One fragment occurrence reported by the matching engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct FragmentHit {
    /// Index of the last matched byte in the text
    pub end: usize,
    /// Fragment (pattern) id
    pub fragment: u32,
    /// Index of the first matched byte in the text
    pub start: usize,
}

/// Structural statistics for a built automaton
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AutomatonStats {
    /// Number of trie nodes, root included
    pub node_count: usize,
    /// Number of trie edges
    pub edge_count: usize,
    /// Number of registered patterns
    pub pattern_count: usize,
    /// Nodes with at least one terminal pattern
    pub terminal_nodes: usize,
    /// Length of the longest pattern
    pub max_depth: u32,
}

/// Multi-pattern Aho-Corasick automaton over bytes
#[derive(Debug, Clone)]
pub struct Automaton {
    trie: Trie,
    /// Pattern bytes indexed by id
    patterns: Vec<Vec<u8>>,
}

impl Automaton {
    /// Build the automaton from string patterns.
    ///
    /// Pattern ids are assigned in input order starting from 0.
    ///
    /// # Example
    ///
    /// ```
    /// use wildac::automaton::Automaton;
    ///
    /// let ac = Automaton::from_patterns(&["he", "she", "his", "hers"])?;
    /// let hits = ac.find_all(b"ushers");
    /// let ids: Vec<u32> = hits.iter().map(|h| h.fragment).collect();
    /// assert_eq!(ids, vec![1, 0, 3]);
    /// # Ok::<(), wildac::WildcardError>(())
    /// ```
    pub fn from_patterns(patterns: &[&str]) -> Result<Self> {
        Self::build(patterns.iter().map(|p| p.as_bytes()))
    }

    /// Build the automaton from byte patterns.
    ///
    /// # Errors
    ///
    /// - [`WildcardError::InvalidPattern`] if no patterns are supplied
    /// - [`WildcardError::EmptyFragment`] if any pattern is empty
    pub fn build<'p, I>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'p [u8]>,
    {
        let mut trie = Trie::new();
        let mut stored = Vec::new();

        for pattern in patterns {
            let id = stored.len() as u32;
            trie.insert(pattern, id)?;
            stored.push(pattern.to_vec());
        }

        if stored.is_empty() {
            return Err(WildcardError::InvalidPattern(
                "No patterns provided".to_string(),
            ));
        }

        build_links(&mut trie);

        let automaton = Self {
            trie,
            patterns: stored,
        };
        log::debug!(
            "built automaton: {} patterns, {} nodes",
            automaton.patterns.len(),
            automaton.trie.node_count()
        );
        Ok(automaton)
    }

    /// Transition function: the state reached from `node` on `byte`.
    ///
    /// Follows failure links until a node with a child on `byte` is found,
    /// or settles on the root.
    #[inline]
    pub fn step(&self, node: u32, byte: u8) -> u32 {
        let mut current = node;
        loop {
            let state = self.trie.node(current);
            if let Some(next) = state.child(byte) {
                return next;
            }
            if current == ROOT {
                return ROOT;
            }
            current = state.failure();
        }
    }

    /// Iterate over every pattern id reported when the engine stands on `node`:
    /// the node's own terminals, then those of each node on its output chain.
    pub fn outputs(&self, node: u32) -> Outputs<'_> {
        Outputs {
            trie: &self.trie,
            node: Some(node),
            index: 0,
        }
    }

    /// Lazily scan `text`, yielding every pattern occurrence in order of end
    /// position.
    pub fn find_iter<'a, 't>(&'a self, text: &'t [u8]) -> FragmentHits<'a, 't> {
        FragmentHits {
            automaton: self,
            text,
            pos: 0,
            node: ROOT,
            pending: None,
        }
    }

    /// Collect every pattern occurrence in `text`
    pub fn find_all(&self, text: &[u8]) -> Vec<FragmentHit> {
        self.find_iter(text).collect()
    }

    /// Underlying trie with resolved links
    pub fn trie(&self) -> &Trie {
        &self.trie
    }

    /// Registered patterns indexed by id
    pub fn patterns(&self) -> &[Vec<u8>] {
        &self.patterns
    }

    /// Pattern bytes for `id`
    pub fn pattern(&self, id: u32) -> Option<&[u8]> {
        self.patterns.get(id as usize).map(Vec::as_slice)
    }

    /// Number of registered patterns
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Structural statistics
    pub fn stats(&self) -> AutomatonStats {
        let nodes = self.trie.nodes();
        AutomatonStats {
            node_count: nodes.len(),
            edge_count: nodes.iter().map(|n| n.children().count()).sum(),
            pattern_count: self.patterns.len(),
            terminal_nodes: nodes.iter().filter(|n| n.is_terminal()).count(),
            max_depth: nodes.iter().map(|n| n.depth()).max().unwrap_or(0),
        }
    }

    /// Human-readable dump of every node and its links
    pub fn dump(&self) -> Dump<'_> {
        Dump { automaton: self }
    }
}

/// Resolve failure and output links for every node in breadth-first order
fn build_links(trie: &mut Trie) {
    let mut queue = VecDeque::new();

    // Depth-1 nodes fail to root
    let root_children: Vec<u32> = trie.node(ROOT).children().map(|(_, c)| c).collect();
    for child in root_children {
        let node = trie.node_mut(child);
        node.failure = ROOT;
        node.output = None;
        queue.push_back(child);
    }

    while let Some(current) = queue.pop_front() {
        let transitions: Vec<(u8, u32)> = trie.node(current).children().collect();

        for (byte, child) in transitions {
            let failure = failure_target(trie, trie.node(current).failure(), byte, child);

            let target = trie.node(failure);
            let output = if target.is_terminal() {
                Some(failure)
            } else {
                target.output()
            };
            // failure is strictly shallower, so neither can name the node itself
            debug_assert_ne!(failure, child);
            debug_assert_ne!(output, Some(child));

            let node = trie.node_mut(child);
            node.failure = failure;
            node.output = output.filter(|&o| o != child);

            queue.push_back(child);
        }
    }
}

/// Walk the failure chain starting at `start` looking for a transition on `byte`
fn failure_target(trie: &Trie, start: u32, byte: u8, child: u32) -> u32 {
    let mut fallback = start;
    while fallback != ROOT && trie.node(fallback).child(byte).is_none() {
        fallback = trie.node(fallback).failure();
    }

    match trie.node(fallback).child(byte) {
        Some(target) if target != child => target,
        _ => ROOT,
    }
}

/// Iterator over pattern ids reported at a node, see [`Automaton::outputs`]
#[derive(Debug, Clone)]
pub struct Outputs<'a> {
    trie: &'a Trie,
    node: Option<u32>,
    index: usize,
}

impl Iterator for Outputs<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        loop {
            let node = self.trie.node(self.node?);
            if let Some(&id) = node.terminals().get(self.index) {
                self.index += 1;
                return Some(id);
            }
            self.node = node.output();
            self.index = 0;
        }
    }
}

/// Streaming scan over a text, see [`Automaton::find_iter`]
#[derive(Debug, Clone)]
pub struct FragmentHits<'a, 't> {
    automaton: &'a Automaton,
    text: &'t [u8],
    /// Number of bytes consumed so far
    pos: usize,
    node: u32,
    pending: Option<Outputs<'a>>,
}

impl Iterator for FragmentHits<'_, '_> {
    type Item = FragmentHit;

    fn next(&mut self) -> Option<FragmentHit> {
        loop {
            if let Some(outputs) = self.pending.as_mut() {
                if let Some(fragment) = outputs.next() {
                    let len = self.automaton.patterns[fragment as usize].len();
                    let end = self.pos - 1;
                    match self.pos.checked_sub(len) {
                        Some(start) => {
                            return Some(FragmentHit {
                                end,
                                fragment,
                                start,
                            })
                        }
                        None => continue,
                    }
                }
                self.pending = None;
            }

            let &byte = self.text.get(self.pos)?;
            self.node = self.automaton.step(self.node, byte);
            self.pos += 1;
            self.pending = Some(self.automaton.outputs(self.node));
        }
    }
}

/// Display adapter produced by [`Automaton::dump`]
pub struct Dump<'a> {
    automaton: &'a Automaton,
}

impl fmt::Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let trie = self.automaton.trie();
        writeln!(f, "--- Automaton States ---")?;
        for (id, node) in trie.nodes().iter().enumerate() {
            let id = id as u32;
            write!(f, "Node {} (\"{}\")", id, trie.label(id).escape_ascii())?;
            match (node.parent(), node.parent_byte()) {
                (Some(parent), Some(byte)) => write!(
                    f,
                    ", Parent: {}, Char: '{}'",
                    parent,
                    [byte].escape_ascii()
                )?,
                _ => write!(f, ", Parent: -, Char: -")?,
            }
            write!(f, ", Failure: {}", node.failure())?;
            match node.output() {
                Some(out) => write!(f, ", Output: {}", out)?,
                None => write!(f, ", Output: -")?,
            }
            write!(f, ", Children:")?;
            for (byte, child) in node.children() {
                write!(f, " '{}'->{}", [byte].escape_ascii(), child)?;
            }
            if node.is_terminal() {
                write!(f, ", Patterns:")?;
                for id in node.terminals() {
                    write!(f, " {}", id)?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "------------------------")
    }
}

#[cfg(test)]
impl Automaton {
    /// Mutable trie access, for tests that corrupt links on purpose
    pub(crate) fn trie_mut(&mut self) -> &mut Trie {
        &mut self.trie
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_matches;

    fn node_for(ac: &Automaton, s: &str) -> u32 {
        ac.trie().find(s.as_bytes()).unwrap()
    }

    #[test]
    fn test_build_simple() {
        let ac = Automaton::from_patterns(&["he", "she", "his", "hers"]).unwrap();
        assert_eq!(ac.pattern_count(), 4);

        let stats = ac.stats();
        // root, h, he, her, hers, hi, his, s, sh, she
        assert_eq!(stats.node_count, 10);
        assert_eq!(stats.edge_count, 9);
        assert_eq!(stats.terminal_nodes, 4);
        assert_eq!(stats.max_depth, 4);
    }

    #[test]
    fn test_no_patterns() {
        let err = Automaton::from_patterns(&[]).unwrap_err();
        assert!(matches!(err, WildcardError::InvalidPattern(_)));
    }

    #[test]
    fn test_empty_pattern() {
        let err = Automaton::from_patterns(&["ok", ""]).unwrap_err();
        assert_eq!(err, WildcardError::EmptyFragment);
    }

    #[test]
    fn test_failure_links() {
        let ac = Automaton::from_patterns(&["he", "she", "his", "hers"]).unwrap();
        let trie = ac.trie();

        assert_eq!(trie.node(ROOT).failure(), ROOT);
        assert_eq!(trie.node(node_for(&ac, "h")).failure(), ROOT);
        assert_eq!(trie.node(node_for(&ac, "sh")).failure(), node_for(&ac, "h"));
        assert_eq!(trie.node(node_for(&ac, "she")).failure(), node_for(&ac, "he"));
        assert_eq!(trie.node(node_for(&ac, "hers")).failure(), node_for(&ac, "s"));
        assert_eq!(trie.node(node_for(&ac, "his")).failure(), node_for(&ac, "s"));
    }

    #[test]
    fn test_output_links() {
        let ac = Automaton::from_patterns(&["he", "she", "his", "hers"]).unwrap();
        let trie = ac.trie();

        assert_eq!(trie.node(node_for(&ac, "she")).output(), Some(node_for(&ac, "he")));
        assert_eq!(trie.node(node_for(&ac, "he")).output(), None);
        assert_eq!(trie.node(node_for(&ac, "his")).output(), None);

        let mut at_she: Vec<u32> = ac.outputs(node_for(&ac, "she")).collect();
        at_she.sort_unstable();
        assert_eq!(at_she, vec![0, 1]);
    }

    #[test]
    fn test_output_chain_skips_non_terminal_failure() {
        // "abcd" fails to "bcd", which is not terminal, whose output is "cd"
        let ac = Automaton::from_patterns(&["abcd", "bcde", "cd"]).unwrap();
        let abcd = node_for(&ac, "abcd");
        assert_eq!(ac.trie().node(abcd).failure(), node_for(&ac, "bcd"));
        assert_eq!(ac.trie().node(abcd).output(), Some(node_for(&ac, "cd")));
    }

    #[test]
    fn test_find_all_positions() {
        let ac = Automaton::from_patterns(&["he", "she", "his", "hers"]).unwrap();
        let hits = ac.find_all(b"ushers");

        assert_eq!(
            hits,
            vec![
                FragmentHit { end: 3, fragment: 1, start: 1 },
                FragmentHit { end: 3, fragment: 0, start: 2 },
                FragmentHit { end: 5, fragment: 3, start: 2 },
            ]
        );
    }

    #[test]
    fn test_overlapping_patterns() {
        let ac = Automaton::from_patterns(&["test", "testing", "est"]).unwrap();
        let mut ids: Vec<u32> = ac.find_iter(b"testing").map(|h| h.fragment).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_no_match() {
        let ac = Automaton::from_patterns(&["hello", "world"]).unwrap();
        assert!(ac.find_all(b"nothing here").is_empty());
        assert!(ac.find_all(b"").is_empty());
    }

    #[test]
    fn test_step_unknown_byte_returns_root() {
        let ac = Automaton::from_patterns(&["abc"]).unwrap();
        let ab = node_for(&ac, "ab");
        assert_eq!(ac.step(ab, b'z'), ROOT);
        assert_eq!(ac.step(ROOT, b'z'), ROOT);
        assert_eq!(ac.step(ab, b'c'), node_for(&ac, "abc"));
    }

    #[test]
    fn test_matches_substring_oracle() {
        let ac = Automaton::from_patterns(&["a", "aa", "ab", "bab", "abba", "b"]).unwrap();
        let report = validate_matches(&ac, b"abbabaabababbaaab");
        assert!(report.is_valid(), "{:?}", report.errors);
    }

    #[test]
    fn test_dump_lists_nodes() {
        let ac = Automaton::from_patterns(&["ab", "b"]).unwrap();
        let dump = ac.dump().to_string();
        assert!(dump.starts_with("--- Automaton States ---"));
        assert!(dump.contains("Node 0 (\"\"), Parent: -, Char: -, Failure: 0, Output: -"));
        assert!(dump.contains("Node 2 (\"ab\"), Parent: 1, Char: 'b', Failure: 3, Output: 3"));
        assert!(dump.contains(", Patterns: 1"));
    }
}
