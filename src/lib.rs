//! wildac - Wildcard Pattern Search with an Aho-Corasick Fragment Automaton
//!
//! wildac finds every occurrence of a pattern containing single-byte
//! wildcards ("jokers") in a text. Instead of trying the pattern at every
//! offset, it splits the pattern into its literal fragments, finds all of
//! them in one pass with a multi-pattern automaton, and accepts a start
//! position only when every fragment was seen at exactly the right offset.
//!
//! # Quick Start
//!
//! ```rust
//! use wildac::{find_wildcard, WildcardMatcher};
//!
//! // One-shot search, 1-based positions
//! assert_eq!(find_wildcard("ababc", "a?a", b'?')?, vec![1]);
//!
//! // Compile once, search many texts
//! let matcher = WildcardMatcher::compile("AC??T", b'?')?;
//! assert_eq!(matcher.find_all("ACGTTACAAT"), vec![1, 6]);
//! assert!(matcher.find_all("GGGG").is_empty());
//! # Ok::<(), wildac::WildcardError>(())
//! ```
//!
//! # Architecture
//!
//! ```text
//! pattern ──► fragments + offsets ──► trie ──► failure / output links
//!                                                      │
//! text ──────────────────────────────► matching engine ┘
//!                                              │ (end, fragment id)
//!                                              ▼
//!                                     votes per start position
//!                                              │ all fragments agree
//!                                              ▼
//!                                     1-based positions, ascending
//! ```
//!
//! Diagnostics never go to the result stream; pass a
//! [`TraceSink`](trace::TraceSink) to [`WildcardMatcher::search`] to observe
//! the engine.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod automaton;
/// Error types for automaton construction and search
pub mod error;
pub mod fragment;
pub mod trace;
pub mod trie;
pub mod validation;
/// Wildcard reconciliation by position voting
pub mod wildcard;

// Re-exports for Rust consumers
pub use crate::automaton::{Automaton, FragmentHit};
pub use crate::error::{Result, WildcardError};
pub use crate::fragment::{Fragment, WildcardPattern};
pub use crate::wildcard::{find_wildcard, Rejection, SearchReport, WildcardMatcher};

// Version information
/// Library version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
