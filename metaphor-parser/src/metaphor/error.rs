//! Error types for the compilation pipeline.
//!
//! Two bands: [`CompileError`] aborts a compilation (missing files, I/O
//! failures, include cycles), while [`SyntaxError`]s are collected during
//! parsing and reported together once the parse finishes.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// A recoverable parse error with enough context to point at the
/// offending source column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub filename: String,
    pub source_line: String,
}

impl fmt::Display for SyntaxError {
    /// Renders the two-line caret display over the saved source line:
    ///
    /// ```text
    /// <message>: line <L>, column <C>, file <F>
    ///    |
    ///    v
    /// <source line>
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let caret = " ".repeat(self.column.saturating_sub(1));
        write!(
            f,
            "{}: line {}, column {}, file {}\n{}|\n{}v\n{}",
            self.message, self.line, self.column, self.filename, caret, caret, self.source_line
        )
    }
}

/// A fatal compilation error.
#[derive(Debug)]
pub enum CompileError {
    /// A source or embedded file does not exist.
    FileNotFound(PathBuf),
    /// Reading a file failed for a reason other than absence.
    Io { path: PathBuf, source: io::Error },
    /// A file was named by a second `Include:`/`Embed:` (or is part of an
    /// include cycle).
    AlreadyRead(PathBuf),
    /// Parsing finished but recorded syntax errors.
    Parse(Vec<SyntaxError>),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::FileNotFound(path) => {
                write!(f, "File not found: {}", path.display())
            }
            CompileError::Io { path, source } => {
                write!(f, "Could not read {}: {}", path.display(), source)
            }
            CompileError::AlreadyRead(path) => {
                write!(f, "'{}' has already been read", path.display())
            }
            CompileError::Parse(errors) => {
                write!(f, "parsing failed with {} syntax error(s)", errors.len())
            }
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompileError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl CompileError {
    /// Classify an `io::Error` from opening `path` into the right band.
    pub fn from_io(path: PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            CompileError::FileNotFound(path)
        } else {
            CompileError::Io { path, source }
        }
    }
}
