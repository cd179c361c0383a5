//! Matcher capability seam and the default `regex::bytes`-backed engine.
//!
//! The scanner never talks to a concrete regex implementation directly. It
//! compiles pattern strings through a [`PatternEngine`] and scans buffers
//! through the [`Matcher`] it returns, so the combination logic stays
//! independent of any specific regex backend. [`BytesRegexEngine`] is the
//! default backend.

use crate::error::{Result, ScanError};
use regex::bytes::RegexBuilder;

/// Half-open byte range `[start, end)` of a single match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {start} past end {end}");
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A compiled, scannable pattern.
///
/// `scan` must report all matches as non-overlapping spans in ascending start
/// order, resuming after the end of each match (leftmost, non-overlapping
/// scan semantics). `is_match` reports whether the pattern matches anywhere
/// in `text`; full-match testing is obtained by compiling through
/// [`PatternEngine::compile_anchored`].
pub trait Matcher {
    fn scan<'a>(&'a self, haystack: &'a [u8]) -> Box<dyn Iterator<Item = Span> + 'a>;

    fn is_match(&self, text: &[u8]) -> bool;
}

/// Compiles pattern strings into [`Matcher`]s.
///
/// Pattern strings use byte-oriented semantics: `\xHH` escapes denote single
/// bytes, not Unicode codepoints. Implementations must honor leftmost-first
/// alternation (earlier branches win ties), which the registry relies on for
/// its registration-order priority.
pub trait PatternEngine {
    fn compile(&self, pattern: &str) -> Result<Box<dyn Matcher>>;

    /// Compile `pattern` so that `is_match` only succeeds when the whole
    /// input matches.
    fn compile_anchored(&self, pattern: &str) -> Result<Box<dyn Matcher>> {
        self.compile(&format!("^(?:{pattern})$"))
    }
}

/// Default engine backed by `regex::bytes::Regex`.
///
/// Unicode mode is disabled and `.` matches any byte, fitting the
/// magic-number scanning domain where patterns describe raw bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesRegexEngine;

impl PatternEngine for BytesRegexEngine {
    fn compile(&self, pattern: &str) -> Result<Box<dyn Matcher>> {
        let regex = RegexBuilder::new(pattern)
            .unicode(false)
            .dot_matches_new_line(true)
            .build()
            .map_err(|e| {
                ScanError::CompilationError(format!("failed to build matcher: {e}"))
            })?;
        Ok(Box::new(BytesRegexMatcher { regex }))
    }
}

struct BytesRegexMatcher {
    regex: regex::bytes::Regex,
}

impl Matcher for BytesRegexMatcher {
    fn scan<'a>(&'a self, haystack: &'a [u8]) -> Box<dyn Iterator<Item = Span> + 'a> {
        Box::new(
            self.regex
                .find_iter(haystack)
                .map(|m| Span::new(m.start(), m.end())),
        )
    }

    fn is_match(&self, text: &[u8]) -> bool {
        self.regex.is_match(text)
    }
}
