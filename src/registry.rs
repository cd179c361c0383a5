//! Pattern registry: accepts literal and regex patterns and resolves matched
//! text back to its owning pattern.
//!
//! Registration order is semantically significant: ties during scanning are
//! broken by insertion order, with every literal ranked before every regex.
//! The registry only grows; there is no removal operation.

use std::collections::HashMap;

use crate::engine::PatternEngine;
use crate::error::{Result, ScanError};
use crate::pattern::Pattern;

pub struct PatternRegistry<T> {
    literals: Vec<Pattern<T>>,
    // Literal content -> index into `literals`; enforces uniqueness.
    literal_index: HashMap<Vec<u8>, usize>,
    regexes: Vec<Pattern<T>>,
}

impl<T> PatternRegistry<T> {
    pub fn new() -> Self {
        Self {
            literals: Vec::new(),
            literal_index: HashMap::new(),
            regexes: Vec::new(),
        }
    }

    /// Register an exact literal. Duplicate content is a no-op keeping the
    /// first-registered pattern and its payload; returns whether the literal
    /// was newly added.
    pub fn add_string(&mut self, text: Vec<u8>, user: T) -> bool {
        if self.literal_index.contains_key(&text) {
            return false;
        }
        self.literal_index.insert(text.clone(), self.literals.len());
        self.literals.push(Pattern::literal(text, user));
        true
    }

    /// Register a regex pattern. Malformed sources propagate a parse error.
    /// Sources with no finite maximum match length are discarded without
    /// error; returns whether the pattern was accepted.
    pub fn add_regex(&mut self, source: &str, user: T) -> Result<bool> {
        let hir = parse(source)?;
        match hir.properties().maximum_len() {
            Some(max_len) => {
                self.regexes
                    .push(Pattern::regex(source.to_string(), max_len, user));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Resolve `text` to the single pattern that explains it.
    ///
    /// Exact literal lookup takes absolute priority over any regex that could
    /// also match; remaining candidates are regex patterns tried in
    /// registration order with full-match testing.
    pub fn find(&self, text: &[u8], engine: &dyn PatternEngine) -> Result<&Pattern<T>> {
        if let Some(&index) = self.literal_index.get(text) {
            return Ok(&self.literals[index]);
        }
        for pattern in &self.regexes {
            if pattern.matches_exactly(text, engine) {
                return Ok(pattern);
            }
        }
        Err(ScanError::PatternNotFound(
            text.escape_ascii().to_string(),
        ))
    }

    /// Accepted literal patterns in registration order.
    pub fn literals(&self) -> &[Pattern<T>] {
        &self.literals
    }

    /// Accepted regex patterns in registration order.
    pub fn regexes(&self) -> &[Pattern<T>] {
        &self.regexes
    }

    pub fn string_count(&self) -> usize {
        self.literals.len()
    }

    pub fn regex_count(&self) -> usize {
        self.regexes.len()
    }

    pub fn pattern_count(&self) -> usize {
        self.literals.len() + self.regexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty() && self.regexes.is_empty()
    }
}

impl<T> Default for PatternRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a regex source into its HIR via the regex-syntax capability.
///
/// Byte-oriented mode: the parsed expression may match arbitrary bytes and
/// `\xHH` escapes denote single bytes, mirroring the default engine.
fn parse(source: &str) -> Result<regex_syntax::hir::Hir> {
    regex_syntax::ParserBuilder::new()
        .utf8(false)
        .unicode(false)
        .build()
        .parse(source)
        .map_err(|e| ScanError::InvalidRegex(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::BytesRegexEngine;

    #[test]
    fn test_add_string_deduplicates() {
        let mut registry = PatternRegistry::new();
        assert!(registry.add_string(b"GIF89a".to_vec(), 1u32));
        assert!(registry.add_string(b"PNG".to_vec(), 2));
        assert!(!registry.add_string(b"GIF89a".to_vec(), 3));

        assert_eq!(registry.string_count(), 2);
        // First registration wins, payload included.
        let pattern = registry.find(b"GIF89a", &BytesRegexEngine).unwrap();
        assert_eq!(*pattern.user(), 1);
    }

    #[test]
    fn test_add_regex_accepts_bounded() {
        let mut registry = PatternRegistry::new();
        assert!(registry.add_regex("[AB]C", ()).unwrap());
        assert_eq!(registry.regex_count(), 1);
        assert_eq!(registry.regexes()[0].max_len(), 2);
    }

    #[test]
    fn test_add_regex_discards_unbounded() {
        let mut registry = PatternRegistry::new();
        assert!(!registry.add_regex("a+", ()).unwrap());
        assert!(!registry.add_regex("[0-9]*x", ()).unwrap());
        assert_eq!(registry.regex_count(), 0);
    }

    #[test]
    fn test_add_regex_propagates_parse_error() {
        let mut registry = PatternRegistry::new();
        let result = registry.add_regex("(unclosed", ());
        assert!(matches!(result, Err(ScanError::InvalidRegex(_))));
        assert_eq!(registry.regex_count(), 0);
    }

    #[test]
    fn test_find_prefers_literal_over_regex() {
        let mut registry = PatternRegistry::new();
        registry.add_regex("A[BC]", "regex").unwrap();
        registry.add_string(b"AB".to_vec(), "literal");

        let pattern = registry.find(b"AB", &BytesRegexEngine).unwrap();
        assert!(pattern.is_literal());
        assert_eq!(*pattern.user(), "literal");

        // Text only the regex explains still resolves.
        let pattern = registry.find(b"AC", &BytesRegexEngine).unwrap();
        assert!(pattern.is_regex());
    }

    #[test]
    fn test_find_respects_regex_registration_order() {
        let mut registry = PatternRegistry::new();
        registry.add_regex("[AB]C", "first").unwrap();
        registry.add_regex("A[CD]", "second").unwrap();

        // Both explain "AC"; the earlier registration wins.
        let pattern = registry.find(b"AC", &BytesRegexEngine).unwrap();
        assert_eq!(*pattern.user(), "first");
    }

    #[test]
    fn test_find_requires_full_regex_match() {
        let mut registry = PatternRegistry::<()>::new();
        registry.add_regex("[AB]C", ()).unwrap();
        let result = registry.find(b"xACy", &BytesRegexEngine);
        assert!(matches!(result, Err(ScanError::PatternNotFound(_))));
    }

    #[test]
    fn test_find_not_found() {
        let registry = PatternRegistry::<()>::new();
        let result = registry.find(b"zzz", &BytesRegexEngine);
        assert_eq!(result.unwrap_err(), ScanError::PatternNotFound("zzz".to_string()));
    }
}
