//! Error types for the sigscan crate.

use std::fmt;

pub type Result<T> = std::result::Result<T, ScanError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// The regex source could not be parsed.
    InvalidRegex(String),
    /// The combined matcher or literal automaton could not be built.
    CompilationError(String),
    /// No registered pattern explains the given text. When raised for a span
    /// produced by `search`, this indicates an inconsistency between the
    /// combined matcher and the registered patterns.
    PatternNotFound(String),
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::InvalidRegex(msg) => write!(f, "Invalid regex pattern: {msg}"),
            ScanError::CompilationError(msg) => write!(f, "Compilation error: {msg}"),
            ScanError::PatternNotFound(text) => {
                write!(f, "No pattern matches text: {text}")
            }
        }
    }
}

impl std::error::Error for ScanError {}
