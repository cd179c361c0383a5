//! # sigscan
//!
//! A multi-pattern signature matching engine: register many literal byte
//! sequences and regular-expression patterns, each tagged with an opaque
//! caller payload, then scan an input buffer in a single pass and resolve
//! every match span back to the pattern that produced it.
//!
//! The typical use is signature-style content identification: recognizing
//! many candidate magic numbers and markers in one scan instead of testing
//! each pattern independently against the input.
//!
//! ## Quick Start
//!
//! ```
//! use sigscan::PatternScanner;
//!
//! let mut scanner = PatternScanner::new();
//! scanner.add_string("GIF89a", "gif");
//! scanner.add_string("PNG", "png");
//! scanner.add_regex("[AB]C", "marker")?;
//!
//! let found: Vec<_> = scanner
//!     .search(b"xxGIF89ayyPNGzzACq")?
//!     .collect::<sigscan::Result<_>>()?;
//!
//! assert_eq!(found.len(), 3);
//! assert_eq!((found[0].start(), found[0].end(), *found[0].user()), (2, 8, "gif"));
//! assert_eq!(*found[1].user(), "png");
//! assert_eq!(*found[2].user(), "marker");
//! # Ok::<(), sigscan::ScanError>(())
//! ```
//!
//! ## Matching semantics
//!
//! - All patterns are merged into one combined unit; scanning is a single
//!   pass producing non-overlapping leftmost matches in ascending start
//!   order, resuming after each match end.
//! - A matched span is resolved back to its pattern deterministically:
//!   exact literal content wins over any regex that could also explain the
//!   text, and ties between regexes go to the earlier registration.
//! - Regex patterns must have a finite maximum match length; unbounded ones
//!   (for example `a+`) are silently discarded at registration.
//! - The registry recompiles lazily: adding a pattern after a search is
//!   picked up by the next search without an explicit compile call.
//!
//! ## Custom regex backends
//!
//! The scanner talks to its regex implementation through the
//! [`PatternEngine`] and [`Matcher`] traits; [`BytesRegexEngine`] (built on
//! `regex::bytes`) is the default. Swap it via
//! [`PatternScannerBuilder::with_engine`].

pub mod engine;
pub mod error;
pub mod pattern;
pub mod registry;
pub mod scanner;

mod compiler;

pub use engine::{BytesRegexEngine, Matcher, PatternEngine, Span};
pub use error::{Result, ScanError};
pub use pattern::Pattern;
pub use registry::PatternRegistry;
pub use scanner::{Matches, PatternScanner, PatternScannerBuilder, ScanConfig, ScanMatch};
