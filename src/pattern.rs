//! Pattern model: literal and regex targets carrying opaque caller payloads.

use std::cell::OnceCell;
use std::fmt;

use crate::engine::{Matcher, PatternEngine};

/// One registered matching target plus the caller's payload.
///
/// The payload is owned by the pattern, returned verbatim on match and never
/// inspected by the engine. Patterns are immutable after registration.
pub struct Pattern<T> {
    kind: PatternKind,
    user: T,
}

pub(crate) enum PatternKind {
    /// Exact fixed byte sequence; identity is its content.
    Literal(Vec<u8>),
    /// Parsed regex with a finite upper bound on any string it can match.
    Regex {
        source: String,
        max_len: usize,
        // Lazily compiled single-pattern form for full-match testing.
        anchored: OnceCell<Option<Box<dyn Matcher>>>,
    },
}

impl<T> Pattern<T> {
    pub(crate) fn literal(text: Vec<u8>, user: T) -> Self {
        Self {
            kind: PatternKind::Literal(text),
            user,
        }
    }

    pub(crate) fn regex(source: String, max_len: usize, user: T) -> Self {
        Self {
            kind: PatternKind::Regex {
                source,
                max_len,
                anchored: OnceCell::new(),
            },
            user,
        }
    }

    /// The caller payload supplied at registration.
    pub fn user(&self) -> &T {
        &self.user
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.kind, PatternKind::Literal(_))
    }

    pub fn is_regex(&self) -> bool {
        matches!(self.kind, PatternKind::Regex { .. })
    }

    /// The literal content, or `None` for regex patterns.
    pub fn text(&self) -> Option<&[u8]> {
        match &self.kind {
            PatternKind::Literal(text) => Some(text),
            PatternKind::Regex { .. } => None,
        }
    }

    /// The regex source, or `None` for literal patterns.
    pub fn source(&self) -> Option<&str> {
        match &self.kind {
            PatternKind::Literal(_) => None,
            PatternKind::Regex { source, .. } => Some(source),
        }
    }

    /// Upper bound on the length of any text this pattern can match.
    pub fn max_len(&self) -> usize {
        match &self.kind {
            PatternKind::Literal(text) => text.len(),
            PatternKind::Regex { max_len, .. } => *max_len,
        }
    }

    /// Whether this pattern matches the whole of `text`.
    ///
    /// Regex patterns compile their anchored single-pattern form through
    /// `engine` on first use and cache it. A backend that refuses the
    /// anchored form is treated as matching nothing.
    pub(crate) fn matches_exactly(&self, text: &[u8], engine: &dyn PatternEngine) -> bool {
        match &self.kind {
            PatternKind::Literal(lit) => lit.as_slice() == text,
            PatternKind::Regex {
                source, anchored, ..
            } => {
                let matcher = anchored.get_or_init(|| engine.compile_anchored(source).ok());
                matcher.as_ref().is_some_and(|m| m.is_match(text))
            }
        }
    }
}

impl<T> fmt::Display for Pattern<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            PatternKind::Literal(text) => write!(f, "{}", text.escape_ascii()),
            PatternKind::Regex { source, .. } => f.write_str(source),
        }
    }
}

impl<T> fmt::Debug for Pattern<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            PatternKind::Literal(text) => f
                .debug_tuple("Literal")
                .field(&text.escape_ascii().to_string())
                .finish(),
            PatternKind::Regex { source, max_len, .. } => f
                .debug_struct("Regex")
                .field("source", source)
                .field("max_len", max_len)
                .finish(),
        }
    }
}
