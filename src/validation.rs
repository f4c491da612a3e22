//! Structural validation of built automata
//!
//! This module checks the invariants the matching engine relies on, over a
//! fully built [`Automaton`]:
//!
//! - Root shape (no parent, failure to itself, no output)
//! - Trie shape (every non-root node has exactly one parent edge, depths agree)
//! - Failure links point to a proper suffix, and in strict mode to the
//!   *longest* suffix present in the trie
//! - Output links point to terminal nodes other than the node itself, and in
//!   strict mode the output chain reports exactly the patterns that are
//!   suffixes of the node's string
//!
//! [`validate_matches`] additionally cross-checks the engine against a
//! direct substring search over a given text.
//!
//! # Usage
//!
//! ```rust
//! use wildac::automaton::Automaton;
//! use wildac::validation::{validate_automaton, ValidationLevel};
//!
//! let ac = Automaton::from_patterns(&["he", "she", "his", "hers"])?;
//! let report = validate_automaton(&ac, ValidationLevel::Strict);
//!
//! assert!(report.is_valid(), "{:?}", report.errors);
//! # Ok::<(), wildac::WildcardError>(())
//! ```

use crate::automaton::{Automaton, AutomatonStats, FragmentHit};
use crate::trie::{Trie, ROOT};
use memchr::memmem;
use std::collections::BTreeSet;

/// Validation strictness level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLevel {
    /// Link sanity and trie shape, linear in node count
    Standard,
    /// Also checks failure links are the longest suffix and output chains
    /// are complete, by brute force over every suffix of every node (default)
    Strict,
}

/// Validation report with detailed findings
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Violated invariants
    pub errors: Vec<String>,
    /// Suspicious but non-fatal findings
    pub warnings: Vec<String>,
    /// Informational messages
    pub info: Vec<String>,
    /// Automaton statistics
    pub stats: AutomatonStats,
}

impl ValidationReport {
    fn new(stats: AutomatonStats) -> Self {
        Self {
            stats,
            ..Self::default()
        }
    }

    /// True if no invariant was violated
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn info(&mut self, msg: impl Into<String>) {
        self.info.push(msg.into());
    }
}

/// Validate the structure and links of `automaton`
pub fn validate_automaton(automaton: &Automaton, level: ValidationLevel) -> ValidationReport {
    let mut report = ValidationReport::new(automaton.stats());

    validate_root(automaton, &mut report);
    validate_shape(automaton, &mut report);
    validate_links(automaton, &mut report);
    validate_terminals(automaton, &mut report);

    if level == ValidationLevel::Strict {
        validate_longest_suffix(automaton, &mut report);
        validate_output_completeness(automaton, &mut report);
    }

    let stats = &report.stats;
    let summary = format!(
        "{} nodes, {} edges, {} patterns, {} terminal nodes, max depth {}",
        stats.node_count, stats.edge_count, stats.pattern_count, stats.terminal_nodes, stats.max_depth
    );
    report.info(summary);
    report
}

fn validate_root(automaton: &Automaton, report: &mut ValidationReport) {
    let root = automaton.trie().node(ROOT);
    if root.parent().is_some() {
        report.error("root has a parent");
    }
    if root.failure() != ROOT {
        report.error(format!("root failure link is {}, expected itself", root.failure()));
    }
    if root.output().is_some() {
        report.error("root has an output link");
    }
    if root.is_terminal() {
        report.error("root terminates a pattern (empty pattern registered)");
    }
    if root.depth() != 0 {
        report.error(format!("root depth is {}", root.depth()));
    }
}

fn validate_shape(automaton: &Automaton, report: &mut ValidationReport) {
    let trie = automaton.trie();
    let mut parents = vec![0u32; trie.node_count()];

    for (id, node) in trie.nodes().iter().enumerate() {
        for (byte, child) in node.children() {
            let Some(slot) = parents.get_mut(child as usize) else {
                report.error(format!("node {} has out-of-range child {}", id, child));
                continue;
            };
            *slot += 1;

            let child_node = trie.node(child);
            if child_node.parent() != Some(id as u32) || child_node.parent_byte() != Some(byte) {
                report.error(format!(
                    "node {} back reference does not match edge {} -'{}'-> {}",
                    child,
                    id,
                    [byte].escape_ascii(),
                    child
                ));
            }
            if child_node.depth() != node.depth() + 1 {
                report.error(format!(
                    "node {} depth {} is not parent depth {} + 1",
                    child,
                    child_node.depth(),
                    node.depth()
                ));
            }
        }
    }

    if parents[ROOT as usize] != 0 {
        report.error("root is the child of another node");
    }
    for (id, &count) in parents.iter().enumerate().skip(1) {
        if count != 1 {
            report.error(format!("node {} has {} parent edges, expected 1", id, count));
        }
    }
}

fn validate_links(automaton: &Automaton, report: &mut ValidationReport) {
    let trie = automaton.trie();
    let count = trie.node_count() as u32;

    for (id, node) in trie.nodes().iter().enumerate().skip(1) {
        let id = id as u32;
        let failure = node.failure();

        if failure >= count {
            report.error(format!("node {} failure link {} out of range", id, failure));
            continue;
        }
        if failure == id {
            report.error(format!("node {} fails to itself", id));
        } else if !trie.label(id).ends_with(&trie.label(failure))
            || trie.node(failure).depth() >= node.depth()
        {
            report.error(format!(
                "node {} failure link {} is not a proper suffix",
                id, failure
            ));
        }

        if let Some(output) = node.output() {
            if output >= count {
                report.error(format!("node {} output link {} out of range", id, output));
            } else if output == id {
                report.error(format!("node {} is its own output link", id));
            } else if !trie.node(output).is_terminal() {
                report.error(format!(
                    "node {} output link {} is not a terminal node",
                    id, output
                ));
            } else if trie.node(output).depth() >= node.depth() {
                report.error(format!(
                    "node {} output link {} is not shallower than the node",
                    id, output
                ));
            }
        }
    }
}

fn validate_terminals(automaton: &Automaton, report: &mut ValidationReport) {
    let trie = automaton.trie();
    let mut seen = vec![false; automaton.pattern_count()];

    for (id, node) in trie.nodes().iter().enumerate() {
        for &pattern_id in node.terminals() {
            match automaton.pattern(pattern_id) {
                Some(pattern) if pattern == trie.label(id as u32).as_slice() => {}
                Some(_) => report.error(format!(
                    "pattern {} registered at node {} with a different label",
                    pattern_id, id
                )),
                None => report.error(format!("node {} lists unknown pattern {}", id, pattern_id)),
            }
            if let Some(flag) = seen.get_mut(pattern_id as usize) {
                if *flag {
                    report.error(format!("pattern {} terminates at more than one node", pattern_id));
                }
                *flag = true;
            }
        }
    }

    for (pattern_id, _) in seen.iter().enumerate().filter(|&(_, &s)| !s) {
        report.error(format!("pattern {} has no terminal node", pattern_id));
    }

    let mut unique = BTreeSet::new();
    for pattern in automaton.patterns() {
        if !unique.insert(pattern.as_slice()) {
            report.warning(format!(
                "duplicate pattern \"{}\" shares a terminal node",
                pattern.escape_ascii()
            ));
        }
    }
}

/// Failure link must be the longest proper suffix that is a trie prefix
fn validate_longest_suffix(automaton: &Automaton, report: &mut ValidationReport) {
    let trie = automaton.trie();

    for id in 1..trie.node_count() as u32 {
        let label = trie.label(id);
        let expected = (1..label.len())
            .find_map(|skip| trie.find(&label[skip..]))
            .unwrap_or(ROOT);
        let actual = trie.node(id).failure();
        if actual != expected {
            report.error(format!(
                "node {} (\"{}\") fails to {}, longest suffix node is {}",
                id,
                label.escape_ascii(),
                actual,
                expected
            ));
        }
    }
}

/// The output chain must report exactly the patterns that are suffixes of the node
fn validate_output_completeness(automaton: &Automaton, report: &mut ValidationReport) {
    let trie = automaton.trie();

    for id in 0..trie.node_count() as u32 {
        let label = trie.label(id);
        let expected: BTreeSet<u32> = automaton
            .patterns()
            .iter()
            .enumerate()
            .filter(|(_, p)| label.ends_with(p))
            .map(|(pid, _)| pid as u32)
            .collect();

        let Some(reported) = output_chain(trie, id) else {
            report.error(format!("node {} output chain does not terminate", id));
            continue;
        };
        let actual: BTreeSet<u32> = reported.iter().copied().collect();

        if actual.len() != reported.len() {
            report.error(format!("node {} reports a pattern more than once", id));
        }
        if actual != expected {
            report.error(format!(
                "node {} (\"{}\") reports patterns {:?}, expected {:?}",
                id,
                label.escape_ascii(),
                actual,
                expected
            ));
        }
    }
}

/// Patterns reported at `id` by following its output chain.
///
/// Returns `None` when the chain revisits a node or leaves the node table,
/// where the engine's own output walk would never end.
fn output_chain(trie: &Trie, id: u32) -> Option<Vec<u32>> {
    let mut reported = trie.node(id).terminals().to_vec();
    let mut visited = BTreeSet::from([id]);
    let mut next = trie.node(id).output();

    while let Some(node) = next {
        if node as usize >= trie.node_count() || !visited.insert(node) {
            return None;
        }
        reported.extend_from_slice(trie.node(node).terminals());
        next = trie.node(node).output();
    }
    Some(reported)
}

/// Every start index of `needle` in `haystack`, overlaps included
fn find_overlapping(haystack: &[u8], needle: &[u8]) -> Vec<usize> {
    let finder = memmem::Finder::new(needle);
    let mut starts = Vec::new();
    let mut pos = 0;
    while let Some(i) = finder.find(&haystack[pos..]) {
        starts.push(pos + i);
        pos += i + 1;
    }
    starts
}

/// Cross-check the matching engine against direct substring search over `text`
pub fn validate_matches(automaton: &Automaton, text: &[u8]) -> ValidationReport {
    let mut report = ValidationReport::new(automaton.stats());

    let mut actual = automaton.find_all(text);
    actual.sort_unstable();

    let mut expected = Vec::new();
    for (id, pattern) in automaton.patterns().iter().enumerate() {
        for start in find_overlapping(text, pattern) {
            expected.push(FragmentHit {
                end: start + pattern.len() - 1,
                fragment: id as u32,
                start,
            });
        }
    }
    expected.sort_unstable();

    for hit in &actual {
        if expected.binary_search(hit).is_err() {
            report.error(format!(
                "engine reported pattern {} at {}..={} which substring search does not find",
                hit.fragment, hit.start, hit.end
            ));
        }
    }
    for hit in &expected {
        if actual.binary_search(hit).is_err() {
            report.error(format!(
                "engine missed pattern {} at {}..={}",
                hit.fragment, hit.start, hit.end
            ));
        }
    }

    report.info(format!(
        "{} pattern occurrences in {} bytes",
        expected.len(),
        text.len()
    ));
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_automata() {
        let sets: &[&[&str]] = &[
            &["he", "she", "his", "hers"],
            &["a", "aa", "aaa", "aaaa"],
            &["abcd", "bcde", "cd", "d"],
            &["ab", "ab", "b"],
            &["x"],
        ];
        for patterns in sets {
            let ac = Automaton::from_patterns(patterns).unwrap();
            let report = validate_automaton(&ac, ValidationLevel::Strict);
            assert!(report.is_valid(), "{:?}: {:?}", patterns, report.errors);
        }
    }

    #[test]
    fn test_duplicate_warning() {
        let ac = Automaton::from_patterns(&["ab", "ab"]).unwrap();
        let report = validate_automaton(&ac, ValidationLevel::Standard);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_stats_in_report() {
        let ac = Automaton::from_patterns(&["ab", "b"]).unwrap();
        let report = validate_automaton(&ac, ValidationLevel::Standard);
        assert_eq!(report.stats.node_count, 4);
        assert_eq!(report.stats.pattern_count, 2);
        assert!(report.info.last().unwrap().contains("4 nodes"));
    }

    fn corruptible() -> Automaton {
        Automaton::from_patterns(&["he", "she", "his", "hers"]).unwrap()
    }

    fn node(ac: &Automaton, s: &str) -> u32 {
        ac.trie().find(s.as_bytes()).unwrap()
    }

    fn has_error(report: &ValidationReport, needle: &str) -> bool {
        report.errors.iter().any(|e| e.contains(needle))
    }

    #[test]
    fn test_self_output_link_reported() {
        let mut ac = corruptible();
        let she = node(&ac, "she");
        ac.trie_mut().node_mut(she).output = Some(she);

        let report = validate_automaton(&ac, ValidationLevel::Standard);
        assert!(has_error(&report, &format!("node {} is its own output link", she)));

        // Strict must finish and flag the endless chain
        let report = validate_automaton(&ac, ValidationLevel::Strict);
        assert!(has_error(&report, &format!("node {} is its own output link", she)));
        assert!(has_error(&report, &format!("node {} output chain does not terminate", she)));
    }

    #[test]
    fn test_output_cycle_reported() {
        let mut ac = corruptible();
        let he = node(&ac, "he");
        let she = node(&ac, "she");
        ac.trie_mut().node_mut(he).output = Some(she);

        for level in [ValidationLevel::Standard, ValidationLevel::Strict] {
            let report = validate_automaton(&ac, level);
            assert!(
                has_error(&report, &format!("node {} output link {} is not shallower", he, she)),
                "{:?}",
                report.errors
            );
        }
        let report = validate_automaton(&ac, ValidationLevel::Strict);
        assert!(has_error(&report, &format!("node {} output chain does not terminate", he)));
    }

    #[test]
    fn test_bad_failure_link_reported() {
        let mut ac = corruptible();
        let she = node(&ac, "she");
        let hi = node(&ac, "hi");
        ac.trie_mut().node_mut(she).failure = hi;

        for level in [ValidationLevel::Standard, ValidationLevel::Strict] {
            let report = validate_automaton(&ac, level);
            assert!(has_error(
                &report,
                &format!("node {} failure link {} is not a proper suffix", she, hi)
            ));
        }
        let report = validate_automaton(&ac, ValidationLevel::Strict);
        assert!(has_error(&report, "longest suffix node is"));
    }

    #[test]
    fn test_shorter_failure_link_reported_in_strict_only() {
        let mut ac = corruptible();
        let she = node(&ac, "she");
        ac.trie_mut().node_mut(she).failure = ROOT;

        // The empty string is still a proper suffix
        assert!(validate_automaton(&ac, ValidationLevel::Standard).is_valid());

        let he = node(&ac, "he");
        let report = validate_automaton(&ac, ValidationLevel::Strict);
        let expected = format!("node {} (\"she\") fails to 0, longest suffix node is {}", she, he);
        assert!(has_error(&report, &expected), "{:?}", report.errors);
    }

    #[test]
    fn test_misplaced_terminal_reported() {
        let mut ac = corruptible();
        let his = node(&ac, "his");
        ac.trie_mut().node_mut(his).terminals.push(0);

        for level in [ValidationLevel::Standard, ValidationLevel::Strict] {
            let report = validate_automaton(&ac, level);
            assert!(has_error(
                &report,
                &format!("pattern 0 registered at node {} with a different label", his)
            ));
            assert!(has_error(&report, "pattern 0 terminates at more than one node"));
        }
        let report = validate_automaton(&ac, ValidationLevel::Strict);
        assert!(has_error(&report, &format!("node {} (\"his\") reports patterns", his)));
    }

    #[test]
    fn test_find_overlapping() {
        assert_eq!(find_overlapping(b"aaaa", b"aa"), vec![0, 1, 2]);
        assert!(find_overlapping(b"abc", b"d").is_empty());
    }

    #[test]
    fn test_validate_matches() {
        let ac = Automaton::from_patterns(&["aa", "aba", "b"]).unwrap();
        let report = validate_matches(&ac, b"aaabaabaaba");
        assert!(report.is_valid(), "{:?}", report.errors);
    }
}
