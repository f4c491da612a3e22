//! Wildcard search by fragment voting
//!
//! A [`WildcardMatcher`] registers every fragment of a [`WildcardPattern`] in
//! one [`Automaton`], streams the text through it once, and maps each
//! fragment hit back to the start position the whole pattern would need.
//! Every hit is one vote for that position. A position is accepted only when
//! all fragments voted for it and the full pattern window fits in the text.
//!
//! # Example
//!
//! ```
//! use wildac::{WildcardMatcher, WildcardPattern};
//!
//! let pattern = WildcardPattern::new("a?a", b'?')?;
//! let matcher = WildcardMatcher::new(pattern)?;
//!
//! // 1-based start positions
//! assert_eq!(matcher.find_all(b"ababc"), vec![1]);
//! assert_eq!(matcher.find_all(b"abaxaca"), vec![1, 3, 5]);
//! # Ok::<(), wildac::WildcardError>(())
//! ```

use crate::automaton::Automaton;
use crate::error::Result;
use crate::fragment::WildcardPattern;
use crate::trace::{NoTrace, TraceEvent, TraceSink};
use crate::trie::ROOT;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// A candidate start position that did not become a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rejection {
    /// 1-based candidate start position
    pub position: usize,
    /// Fragments confirmed at this position
    pub votes: usize,
    /// Fragments in the pattern
    pub needed: usize,
}

/// Outcome of one search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchReport {
    /// Accepted 1-based start positions, ascending
    pub positions: Vec<usize>,
    /// Discarded candidates, ascending by position (diagnostics only)
    pub rejected: Vec<Rejection>,
}

impl SearchReport {
    /// True if no position was accepted
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// A compiled wildcard pattern ready to search any number of texts.
///
/// Construction builds the automaton completely; searching never mutates
/// it, so a matcher can be shared across threads by reference.
#[derive(Debug, Clone)]
pub struct WildcardMatcher {
    pattern: WildcardPattern,
    automaton: Automaton,
}

impl WildcardMatcher {
    /// Compile `pattern`, registering fragment `i` as automaton pattern `i`
    pub fn new(pattern: WildcardPattern) -> Result<Self> {
        let automaton = Automaton::build(pattern.fragments().iter().map(|f| f.text()))?;
        log::debug!(
            "compiled pattern \"{}\" into {} fragments",
            pattern.pattern().escape_ascii(),
            pattern.fragments().len()
        );
        Ok(Self { pattern, automaton })
    }

    /// Parse and compile in one step
    pub fn compile(pattern: impl AsRef<[u8]>, wildcard: u8) -> Result<Self> {
        Self::new(WildcardPattern::new(pattern, wildcard)?)
    }

    /// The parsed pattern
    pub fn pattern(&self) -> &WildcardPattern {
        &self.pattern
    }

    /// The fragment automaton
    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    /// All 1-based start positions of the pattern in `text`, ascending
    pub fn find_all(&self, text: impl AsRef<[u8]>) -> Vec<usize> {
        self.search(text.as_ref(), &mut NoTrace).positions
    }

    /// Search `text`, reporting every step to `sink`.
    ///
    /// A text shorter than the pattern yields an empty report without
    /// running the engine.
    pub fn search<S>(&self, text: &[u8], sink: &mut S) -> SearchReport
    where
        S: TraceSink + ?Sized,
    {
        let pattern_len = self.pattern.len();
        if text.len() < pattern_len {
            log::debug!(
                "text ({} bytes) shorter than pattern ({} bytes), nothing to search",
                text.len(),
                pattern_len
            );
            return SearchReport::default();
        }

        let fragments = self.pattern.fragments();
        let needed = fragments.len();
        let mut votes: FxHashMap<usize, usize> = FxHashMap::default();
        let mut node = ROOT;

        for (index, &byte) in text.iter().enumerate() {
            node = self.automaton.step(node, byte);
            sink.event(&TraceEvent::Step { index, byte, node });

            for fragment_id in self.automaton.outputs(node) {
                let fragment = &fragments[fragment_id as usize];
                let Some(start) = (index + 1).checked_sub(fragment.len()) else {
                    continue;
                };
                let candidate = start.checked_sub(fragment.offset());
                sink.event(&TraceEvent::FragmentHit {
                    fragment_id,
                    fragment,
                    start,
                    candidate: candidate.map(|c| c + 1),
                });
                if let Some(candidate) = candidate {
                    *votes.entry(candidate).or_insert(0) += 1;
                }
            }
        }

        let mut candidates: Vec<(usize, usize)> = votes.into_iter().collect();
        candidates.sort_unstable();

        let mut report = SearchReport::default();
        for (candidate, count) in candidates {
            let position = candidate + 1;
            if count == needed && candidate + pattern_len <= text.len() {
                debug_assert!(self.is_match_at(text, candidate));
                sink.event(&TraceEvent::Accepted { position });
                report.positions.push(position);
            } else {
                sink.event(&TraceEvent::Rejected {
                    position,
                    votes: count,
                    needed,
                });
                report.rejected.push(Rejection {
                    position,
                    votes: count,
                    needed,
                });
            }
        }

        log::debug!(
            "searched {} bytes: {} accepted, {} rejected",
            text.len(),
            report.positions.len(),
            report.rejected.len()
        );
        report
    }

    /// Check the pattern directly against the window starting at 0-based
    /// `start`, without the automaton.
    pub fn is_match_at(&self, text: &[u8], start: usize) -> bool {
        start
            .checked_add(self.pattern.len())
            .and_then(|end| text.get(start..end))
            .is_some_and(|window| self.pattern.matches_window(window))
    }
}

/// Find every 1-based start position of `pattern` in `text`.
///
/// # Example
///
/// ```
/// use wildac::find_wildcard;
///
/// assert_eq!(find_wildcard("aaaaa", "aa?aa", b'?')?, vec![1]);
/// assert!(find_wildcard("ab", "a?c", b'?')?.is_empty());
/// assert!(find_wildcard("abc", "???", b'?').is_err());
/// # Ok::<(), wildac::WildcardError>(())
/// ```
pub fn find_wildcard(
    text: impl AsRef<[u8]>,
    pattern: impl AsRef<[u8]>,
    wildcard: u8,
) -> Result<Vec<usize>> {
    Ok(WildcardMatcher::compile(pattern, wildcard)?.find_all(text))
}
