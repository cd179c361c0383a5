//! Public scanning facade: registration, dirty-state compilation and the
//! lazy search iterator.

use crate::compiler::{self, Compiled};
use crate::engine::{BytesRegexEngine, PatternEngine, Span};
use crate::error::{Result, ScanError};
use crate::pattern::Pattern;
use crate::registry::PatternRegistry;

/// Configuration for scan strategy selection.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Scan literal-only pattern sets with an Aho-Corasick automaton instead
    /// of the combined regex.
    ///
    /// **Default**: true
    pub literal_automaton: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            literal_automaton: true,
        }
    }
}

/// Multi-pattern matching engine.
///
/// Literal and regex patterns are registered with an opaque payload, merged
/// into one scannable unit on demand, and every match span found in a buffer
/// is resolved back to the pattern that produced it.
///
/// Registration invalidates the compiled state; the next `search` (or an
/// explicit [`compile`](Self::compile)) rebuilds it transparently.
///
/// # Examples
///
/// ```
/// use sigscan::PatternScanner;
///
/// let mut scanner = PatternScanner::new();
/// scanner.add_string("GIF89a", "gif");
/// scanner.add_string("PNG", "png");
/// scanner.add_regex("[AB]C", "marker")?;
///
/// for found in scanner.search(b"xxGIF89ayyPNGzzACq")? {
///     let found = found?;
///     println!("{}..{}: {}", found.start(), found.end(), found.user());
/// }
/// # Ok::<(), sigscan::ScanError>(())
/// ```
pub struct PatternScanner<T> {
    registry: PatternRegistry<T>,
    engine: Box<dyn PatternEngine>,
    config: ScanConfig,
    // None while additions are pending (the dirty state).
    compiled: Option<Compiled>,
}

impl<T> PatternScanner<T> {
    /// Create a scanner with the default engine and configuration.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> PatternScannerBuilder {
        PatternScannerBuilder::new()
    }

    /// Register an exact literal with its payload.
    ///
    /// Re-registering already-present content is a silent no-op: the
    /// first-registered pattern and payload are kept.
    pub fn add_string(&mut self, text: impl Into<Vec<u8>>, user: T) {
        if self.registry.add_string(text.into(), user) {
            self.compiled = None;
        }
    }

    /// Register a regex pattern with its payload.
    ///
    /// Malformed sources fail with [`ScanError::InvalidRegex`]. Sources with
    /// no finite maximum match length are discarded without error and never
    /// enter the registry.
    pub fn add_regex(&mut self, source: &str, user: T) -> Result<()> {
        if self.registry.add_regex(source, user)? {
            self.compiled = None;
        }
        Ok(())
    }

    /// Build the combined matcher from the current registry contents.
    ///
    /// A no-op when nothing was added since the last compilation. Called
    /// implicitly by [`search`](Self::search); useful to front-load the
    /// compilation cost.
    pub fn compile(&mut self) -> Result<()> {
        if self.compiled.is_none() {
            self.compiled = Some(compiler::build(
                &self.registry,
                self.engine.as_ref(),
                &self.config,
            )?);
        }
        Ok(())
    }

    /// Whether patterns were added since the last compilation.
    pub fn is_dirty(&self) -> bool {
        self.compiled.is_none()
    }

    /// Maximum possible match length, or `None` while dirty.
    ///
    /// After compilation this is the maximum over all literal lengths and
    /// regex bounds; 0 for an empty registry.
    pub fn max_length(&self) -> Option<usize> {
        self.compiled.as_ref().map(Compiled::max_length)
    }

    pub fn string_count(&self) -> usize {
        self.registry.string_count()
    }

    pub fn regex_count(&self) -> usize {
        self.registry.regex_count()
    }

    pub fn pattern_count(&self) -> usize {
        self.registry.pattern_count()
    }

    /// Resolve `text` to the single pattern that explains it.
    ///
    /// Literal patterns take absolute priority over regexes; regexes are
    /// tried in registration order with full-match testing. Fails with
    /// [`ScanError::PatternNotFound`] when nothing matches.
    pub fn get_pattern(&self, text: &[u8]) -> Result<&Pattern<T>> {
        self.registry.find(text, self.engine.as_ref())
    }

    /// Scan `data` for all registered patterns in a single pass.
    ///
    /// Compiles first if dirty. Returns a lazy iterator of resolved matches
    /// in ascending start order with non-overlapping spans; scanning resumes
    /// after the end of each match. An empty registry or buffer yields an
    /// empty sequence. The iterator borrows the scanner, so registering
    /// patterns mid-iteration is rejected at compile time.
    pub fn search<'a>(&'a mut self, data: &'a [u8]) -> Result<Matches<'a, T>> {
        self.compile()?;
        let compiled = self.compiled.as_ref().ok_or_else(|| {
            ScanError::CompilationError("compiled state missing after commit".to_string())
        })?;
        Ok(Matches {
            spans: compiled.scan(data),
            registry: &self.registry,
            engine: self.engine.as_ref(),
            data,
        })
    }
}

impl<T> Default for PatternScanner<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`PatternScanner`] with a custom engine or configuration.
pub struct PatternScannerBuilder {
    engine: Box<dyn PatternEngine>,
    config: ScanConfig,
}

impl PatternScannerBuilder {
    pub fn new() -> Self {
        Self {
            engine: Box::new(BytesRegexEngine),
            config: ScanConfig::default(),
        }
    }

    /// Replace the default regex backend.
    pub fn with_engine(mut self, engine: Box<dyn PatternEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build<T>(self) -> PatternScanner<T> {
        PatternScanner {
            registry: PatternRegistry::new(),
            engine: self.engine,
            config: self.config,
            compiled: None,
        }
    }
}

impl Default for PatternScannerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazy iterator over resolved matches, yielded left to right.
///
/// Each item carries the span and the owning pattern. Resolution failure
/// (no registered pattern explains a span the combined matcher produced)
/// surfaces as an error item; it signals an engine-consistency defect and
/// does not occur in normal operation.
pub struct Matches<'a, T> {
    spans: Box<dyn Iterator<Item = Span> + 'a>,
    registry: &'a PatternRegistry<T>,
    engine: &'a dyn PatternEngine,
    data: &'a [u8],
}

impl<'a, T> Iterator for Matches<'a, T> {
    type Item = Result<ScanMatch<'a, T>>;

    fn next(&mut self) -> Option<Self::Item> {
        let span = self.spans.next()?;
        Some(
            self.registry
                .find(&self.data[span.start..span.end], self.engine)
                .map(|pattern| ScanMatch { span, pattern }),
        )
    }
}

/// One resolved match: a span and the pattern that produced it.
pub struct ScanMatch<'a, T> {
    span: Span,
    pattern: &'a Pattern<T>,
}

impl<'a, T> ScanMatch<'a, T> {
    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn pattern(&self) -> &'a Pattern<T> {
        self.pattern
    }

    /// The payload registered with the owning pattern.
    pub fn user(&self) -> &'a T {
        self.pattern.user()
    }
}

impl<T> Clone for ScanMatch<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ScanMatch<'_, T> {}

impl<T> std::fmt::Debug for ScanMatch<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanMatch")
            .field("span", &self.span)
            .field("pattern", self.pattern)
            .finish()
    }
}
