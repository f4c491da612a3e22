//! Diagnostic trace hook for wildcard searches
//!
//! The search itself never prints anything. Callers that want to see what
//! the engine is doing pass a [`TraceSink`] to
//! [`WildcardMatcher::search`](crate::WildcardMatcher::search) and receive a
//! [`TraceEvent`] for every byte consumed, every fragment hit, and every
//! accepted or rejected candidate.
//!
//! Three sinks are provided:
//!
//! - [`NoTrace`] discards everything
//! - [`LogTrace`] forwards events to the `log` facade
//! - [`WriteTrace`] writes one line per event to any [`io::Write`]
//!
//! Any `FnMut(&TraceEvent)` closure is also a sink.

use crate::fragment::Fragment;
use std::fmt;
use std::io;

/// A single diagnostic event emitted during a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent<'a> {
    /// The engine consumed `byte` at text `index` and now stands on `node`
    Step {
        /// 0-based text index
        index: usize,
        /// Byte consumed
        byte: u8,
        /// Automaton node after the transition
        node: u32,
    },
    /// A fragment was found in the text
    FragmentHit {
        /// Fragment id
        fragment_id: u32,
        /// The fragment itself
        fragment: &'a Fragment,
        /// 0-based text index where the fragment starts
        start: usize,
        /// 1-based start of the whole pattern implied by this hit, or `None`
        /// if it would lie before the start of the text
        candidate: Option<usize>,
    },
    /// A candidate position was confirmed by every fragment
    Accepted {
        /// 1-based start position
        position: usize,
    },
    /// A candidate position was discarded
    Rejected {
        /// 1-based start position
        position: usize,
        /// Fragments confirmed at this position
        votes: usize,
        /// Fragments in the pattern
        needed: usize,
    },
}

impl fmt::Display for TraceEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::Step { index, byte, node } => {
                write!(f, "[{}] '{}' -> node {}", index, [*byte].escape_ascii(), node)
            }
            TraceEvent::FragmentHit {
                fragment_id,
                fragment,
                start,
                candidate,
            } => {
                write!(
                    f,
                    "matched fragment {} {} at text index {}",
                    fragment_id, fragment, start
                )?;
                match candidate {
                    Some(pos) => write!(f, " -> contributes to full match at position {}", pos),
                    None => write!(f, " -> before start of text, ignored"),
                }
            }
            TraceEvent::Accepted { position } => {
                write!(f, "full pattern match at position {}", position)
            }
            TraceEvent::Rejected {
                position,
                votes,
                needed,
            } => {
                write!(
                    f,
                    "rejected position {} (matched {}/{} fragments)",
                    position, votes, needed
                )?;
                if votes == needed {
                    write!(f, ", window exceeds text")?;
                }
                Ok(())
            }
        }
    }
}

/// Receiver for search diagnostics
pub trait TraceSink {
    /// Handle one event
    fn event(&mut self, event: &TraceEvent<'_>);
}

impl<F> TraceSink for F
where
    F: FnMut(&TraceEvent<'_>),
{
    fn event(&mut self, event: &TraceEvent<'_>) {
        self(event)
    }
}

/// Sink that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTrace;

impl TraceSink for NoTrace {
    #[inline]
    fn event(&mut self, _event: &TraceEvent<'_>) {}
}

/// Sink that forwards events to the `log` facade.
///
/// Per-byte steps and fragment hits are logged at `trace`, verdicts at
/// `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTrace;

impl TraceSink for LogTrace {
    fn event(&mut self, event: &TraceEvent<'_>) {
        match event {
            TraceEvent::Step { .. } | TraceEvent::FragmentHit { .. } => log::trace!("{}", event),
            TraceEvent::Accepted { .. } | TraceEvent::Rejected { .. } => log::debug!("{}", event),
        }
    }
}

/// Sink that writes one line per event.
///
/// Write failures stop further output; the first error is returned by
/// [`WriteTrace::finish`].
#[derive(Debug)]
pub struct WriteTrace<W: io::Write> {
    writer: W,
    error: Option<io::Error>,
}

impl<W: io::Write> WriteTrace<W> {
    /// Wrap `writer`
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            error: None,
        }
    }

    /// Flush and return the writer, or the first write error encountered
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: io::Write> TraceSink for WriteTrace<W> {
    fn event(&mut self, event: &TraceEvent<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = writeln!(self.writer, "{}", event) {
            self.error = Some(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::decompose;

    #[test]
    fn test_event_display() {
        let fragments = decompose(b"ab?c", b'?');

        let step = TraceEvent::Step {
            index: 3,
            byte: b'b',
            node: 2,
        };
        assert_eq!(step.to_string(), "[3] 'b' -> node 2");

        let hit = TraceEvent::FragmentHit {
            fragment_id: 1,
            fragment: &fragments[1],
            start: 7,
            candidate: Some(5),
        };
        assert_eq!(
            hit.to_string(),
            "matched fragment 1 \"c\"@3 at text index 7 -> contributes to full match at position 5"
        );

        let rejected = TraceEvent::Rejected {
            position: 4,
            votes: 2,
            needed: 2,
        };
        assert_eq!(
            rejected.to_string(),
            "rejected position 4 (matched 2/2 fragments), window exceeds text"
        );
    }

    #[test]
    fn test_write_trace() {
        let mut sink = WriteTrace::new(Vec::new());
        sink.event(&TraceEvent::Accepted { position: 1 });
        sink.event(&TraceEvent::Rejected {
            position: 3,
            votes: 1,
            needed: 2,
        });

        let out = String::from_utf8(sink.finish().unwrap()).unwrap();
        assert_eq!(
            out,
            "full pattern match at position 1\nrejected position 3 (matched 1/2 fragments)\n"
        );
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = 0;
        {
            let mut sink = |_: &TraceEvent<'_>| seen += 1;
            sink.event(&TraceEvent::Accepted { position: 1 });
            sink.event(&TraceEvent::Accepted { position: 2 });
        }
        assert_eq!(seen, 2);
    }
}
