//! Wildcard pattern parsing
//!
//! A wildcard pattern is split into its maximal runs of non-wildcard bytes
//! ("fragments"). Each fragment keeps its literal text and its offset from
//! the start of the pattern so that fragment hits can later be mapped back
//! to a candidate start of the whole pattern.
//!
//! # Examples
//!
//! ```
//! use wildac::fragment::WildcardPattern;
//!
//! let pattern = WildcardPattern::new("ab??c?de", b'?')?;
//! let parts: Vec<(&[u8], usize)> = pattern
//!     .fragments()
//!     .iter()
//!     .map(|f| (f.text(), f.offset()))
//!     .collect();
//! assert_eq!(parts, vec![(&b"ab"[..], 0), (&b"c"[..], 4), (&b"de"[..], 6)]);
//! # Ok::<(), wildac::WildcardError>(())
//! ```

use crate::error::{Result, WildcardError};
use serde::Serialize;
use std::fmt;

/// A maximal run of non-wildcard bytes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fragment {
    text: Vec<u8>,
    offset: usize,
}

impl Fragment {
    /// Literal bytes of the fragment
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    /// Distance from the start of the pattern
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Fragment length in bytes (never zero)
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.text.len()
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"@{}", self.text.escape_ascii(), self.offset)
    }
}

/// A parsed wildcard pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardPattern {
    /// Original pattern bytes
    pattern: Vec<u8>,
    wildcard: u8,
    fragments: Vec<Fragment>,
}

impl WildcardPattern {
    /// Parse `pattern`, treating every `wildcard` byte as "matches anything".
    ///
    /// # Errors
    ///
    /// Returns [`WildcardError::InvalidPattern`] if the pattern is empty or
    /// consists only of wildcards.
    pub fn new(pattern: impl AsRef<[u8]>, wildcard: u8) -> Result<Self> {
        let pattern = pattern.as_ref();
        let fragments = decompose(pattern, wildcard);

        if fragments.is_empty() {
            return Err(WildcardError::InvalidPattern(if pattern.is_empty() {
                "Empty pattern".to_string()
            } else {
                format!(
                    "\"{}\" contains only wildcards",
                    pattern.escape_ascii()
                )
            }));
        }

        Ok(Self {
            pattern: pattern.to_vec(),
            wildcard,
            fragments,
        })
    }

    /// Parse a pattern whose wildcard is given as a string token.
    ///
    /// The token must be exactly one byte long.
    pub fn with_wildcard_token(pattern: impl AsRef<[u8]>, wildcard: &str) -> Result<Self> {
        Self::new(pattern, parse_wildcard(wildcard)?)
    }

    /// Original pattern bytes
    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    /// Wildcard byte
    pub fn wildcard(&self) -> u8 {
        self.wildcard
    }

    /// Fragments in left-to-right order; index is the fragment id
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Total pattern length, wildcards included
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.pattern.len()
    }

    /// Check whether `window` (exactly `len()` bytes) matches the pattern
    /// byte for byte, wildcards matching anything.
    pub fn matches_window(&self, window: &[u8]) -> bool {
        window.len() == self.pattern.len()
            && self
                .pattern
                .iter()
                .zip(window)
                .all(|(&p, &t)| p == self.wildcard || p == t)
    }
}

/// Split `pattern` into maximal non-wildcard runs with their offsets
pub fn decompose(pattern: &[u8], wildcard: u8) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    let mut start: Option<usize> = None;

    for (i, &byte) in pattern.iter().enumerate() {
        match (byte == wildcard, start) {
            (false, None) => start = Some(i),
            (true, Some(s)) => {
                fragments.push(Fragment {
                    text: pattern[s..i].to_vec(),
                    offset: s,
                });
                start = None;
            }
            _ => {}
        }
    }

    if let Some(s) = start {
        fragments.push(Fragment {
            text: pattern[s..].to_vec(),
            offset: s,
        });
    }

    fragments
}

/// Parse a wildcard token, which must be exactly one byte
pub fn parse_wildcard(token: impl AsRef<[u8]>) -> Result<u8> {
    match token.as_ref() {
        [byte] => Ok(*byte),
        token => Err(WildcardError::InvalidInput(format!(
            "wildcard must be a single byte, got \"{}\"",
            token.escape_ascii()
        ))),
    }
}
