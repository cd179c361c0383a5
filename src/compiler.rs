//! Combined-expression construction and scan strategy selection.
//!
//! Compilation is a pure function of the registry contents: it produces a
//! [`Compiled`] value holding the scannable strategy and the maximum match
//! length across all accepted patterns. Literal-only registries scan with an
//! Aho-Corasick automaton; as soon as a regex pattern is present the whole
//! set is merged into one alternation compiled through the engine.

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};

use crate::engine::{Matcher, PatternEngine, Span};
use crate::error::{Result, ScanError};
use crate::pattern::Pattern;
use crate::registry::PatternRegistry;
use crate::scanner::ScanConfig;

pub(crate) struct Compiled {
    strategy: ScanStrategy,
    max_length: usize,
}

enum ScanStrategy {
    /// Empty-language sentinel: no patterns registered, nothing ever matches.
    Empty,
    /// Literal-only pattern set scanned with an Aho-Corasick automaton.
    /// Built leftmost-first so earlier registrations win ties, matching the
    /// alternation semantics of the combined form.
    Literals(AhoCorasick),
    /// Single alternation over all patterns, compiled through the engine.
    Combined(Box<dyn Matcher>),
}

impl Compiled {
    /// Maximum possible match length; 0 when no patterns are registered.
    pub(crate) fn max_length(&self) -> usize {
        self.max_length
    }

    /// All non-overlapping leftmost matches in `haystack`, in ascending
    /// start order.
    pub(crate) fn scan<'a>(&'a self, haystack: &'a [u8]) -> Box<dyn Iterator<Item = Span> + 'a> {
        match &self.strategy {
            ScanStrategy::Empty => Box::new(std::iter::empty()),
            ScanStrategy::Literals(automaton) => Box::new(
                automaton
                    .find_iter(haystack)
                    .map(|m| Span::new(m.start(), m.end())),
            ),
            ScanStrategy::Combined(matcher) => matcher.scan(haystack),
        }
    }
}

/// Build the compiled state for the registry's current contents.
pub(crate) fn build<T>(
    registry: &PatternRegistry<T>,
    engine: &dyn PatternEngine,
    config: &ScanConfig,
) -> Result<Compiled> {
    if registry.is_empty() {
        return Ok(Compiled {
            strategy: ScanStrategy::Empty,
            max_length: 0,
        });
    }

    let max_length = registry
        .literals()
        .iter()
        .chain(registry.regexes())
        .map(Pattern::max_len)
        .max()
        .unwrap_or(0);

    let strategy = if registry.regexes().is_empty() && config.literal_automaton {
        let automaton = AhoCorasickBuilder::new()
            .match_kind(MatchKind::LeftmostFirst)
            .build(registry.literals().iter().filter_map(Pattern::text))
            .map_err(|e| {
                ScanError::CompilationError(format!("failed to build literal automaton: {e}"))
            })?;
        ScanStrategy::Literals(automaton)
    } else {
        ScanStrategy::Combined(engine.compile(&combined_pattern(registry))?)
    };

    Ok(Compiled {
        strategy,
        max_length,
    })
}

/// Render the union of all accepted patterns: literal branches first, then
/// regex branches, each group in registration order.
fn combined_pattern<T>(registry: &PatternRegistry<T>) -> String {
    let mut pattern = String::new();
    for literal in registry.literals() {
        if !pattern.is_empty() {
            pattern.push('|');
        }
        if let Some(text) = literal.text() {
            escape_literal(text, &mut pattern);
        }
    }
    for regex in registry.regexes() {
        if !pattern.is_empty() {
            pattern.push('|');
        }
        if let Some(source) = regex.source() {
            pattern.push_str("(?:");
            pattern.push_str(source);
            pattern.push(')');
        }
    }
    pattern
}

/// Escape a literal byte sequence into a regex branch. Every byte outside
/// ASCII alphanumerics is rendered as a `\xHH` byte escape, which keeps
/// metacharacters and non-ASCII signature bytes inert.
fn escape_literal(text: &[u8], out: &mut String) {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    for &byte in text {
        if byte.is_ascii_alphanumeric() {
            out.push(byte as char);
        } else {
            out.push_str("\\x");
            out.push(HEX[(byte >> 4) as usize] as char);
            out.push(HEX[(byte & 0x0f) as usize] as char);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::BytesRegexEngine;

    fn spans(compiled: &Compiled, haystack: &[u8]) -> Vec<(usize, usize)> {
        compiled.scan(haystack).map(|s| (s.start, s.end)).collect()
    }

    #[test]
    fn test_empty_registry_compiles_to_empty_language() {
        let registry = PatternRegistry::<()>::new();
        let compiled = build(&registry, &BytesRegexEngine, &ScanConfig::default()).unwrap();
        assert_eq!(compiled.max_length(), 0);
        assert_eq!(spans(&compiled, b"anything"), vec![]);
    }

    #[test]
    fn test_literal_only_scan() {
        let mut registry = PatternRegistry::new();
        registry.add_string(b"GIF89a".to_vec(), ());
        registry.add_string(b"PNG".to_vec(), ());

        let compiled = build(&registry, &BytesRegexEngine, &ScanConfig::default()).unwrap();
        assert_eq!(compiled.max_length(), 6);
        assert_eq!(
            spans(&compiled, b"xxGIF89ayyPNGzz"),
            vec![(2, 8), (10, 13)]
        );
    }

    #[test]
    fn test_mixed_scan_uses_combined_alternation() {
        let mut registry = PatternRegistry::new();
        registry.add_string(b"PNG".to_vec(), ());
        registry.add_regex("[AB]C", ()).unwrap();

        let compiled = build(&registry, &BytesRegexEngine, &ScanConfig::default()).unwrap();
        assert_eq!(compiled.max_length(), 3);
        assert_eq!(spans(&compiled, b"BC..PNG"), vec![(0, 2), (4, 7)]);
    }

    #[test]
    fn test_literal_automaton_can_be_disabled() {
        let mut registry = PatternRegistry::new();
        registry.add_string(b"PNG".to_vec(), ());

        let config = ScanConfig {
            literal_automaton: false,
        };
        let compiled = build(&registry, &BytesRegexEngine, &config).unwrap();
        assert_eq!(spans(&compiled, b"..PNG.."), vec![(2, 5)]);
    }

    #[test]
    fn test_max_length_is_maximum_over_all_patterns() {
        let mut registry = PatternRegistry::new();
        registry.add_string(b"ab".to_vec(), ());
        registry.add_regex("[0-9]{1,4}", ()).unwrap();

        let compiled = build(&registry, &BytesRegexEngine, &ScanConfig::default()).unwrap();
        assert_eq!(compiled.max_length(), 4);
    }

    #[test]
    fn test_combined_pattern_rendering() {
        let mut registry = PatternRegistry::new();
        registry.add_string(b"a|b".to_vec(), ());
        registry.add_regex("[CD]e", ()).unwrap();

        assert_eq!(combined_pattern(&registry), "a\\x7cb|(?:[CD]e)");

        let mut registry = PatternRegistry::new();
        registry.add_string(b"\x89P\x0a".to_vec(), ());
        assert_eq!(combined_pattern(&registry), "\\x89P\\x0a");
    }

    #[test]
    fn test_escaped_literal_metacharacters_match_literally() {
        let mut registry = PatternRegistry::new();
        registry.add_string(b"a.b".to_vec(), ());
        registry.add_regex("zz", ()).unwrap();

        let compiled = build(&registry, &BytesRegexEngine, &ScanConfig::default()).unwrap();
        // "." must not act as a wildcard once escaped.
        assert_eq!(spans(&compiled, b"axb a.b"), vec![(4, 7)]);
    }

    #[test]
    fn test_non_ascii_signature_bytes_scan() {
        let mut registry = PatternRegistry::new();
        registry.add_string(b"\x89PNG\x0d\x0a".to_vec(), ());

        let compiled = build(&registry, &BytesRegexEngine, &ScanConfig::default()).unwrap();
        assert_eq!(spans(&compiled, b"\x00\x89PNG\x0d\x0a\xff"), vec![(1, 7)]);

        // Same result through the combined-regex path.
        let config = ScanConfig {
            literal_automaton: false,
        };
        let compiled = build(&registry, &BytesRegexEngine, &config).unwrap();
        assert_eq!(spans(&compiled, b"\x00\x89PNG\x0d\x0a\xff"), vec![(1, 7)]);
    }
}
