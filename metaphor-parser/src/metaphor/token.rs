//! Core token types shared across the lexers, the parser, and tooling.

use serde::Serialize;
use std::fmt;

/// The kind of a token produced by a lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    /// Parser-internal initial sentinel; never produced by a lexer.
    None,
    /// Indentation increased by one 4-column unit.
    Indent,
    /// Indentation decreased by one 4-column unit.
    Outdent,
    /// Indentation increased by an amount that is not a multiple of the unit.
    BadIndent,
    /// Indentation decreased by an amount that is not a multiple of the unit.
    BadOutdent,
    /// `Include:` directive, resolved by the parser's token pump.
    Include,
    /// `Embed:` directive, resolved by the parser's token pump.
    Embed,
    /// The remainder of a keyword line, after the keyword itself.
    KeywordText,
    /// One line of prose.
    Text,
    Target,
    Scope,
    Example,
    EndOfFile,
}

/// A token in the input stream.
///
/// `source_line` is the whole physical line the token was read from, kept
/// for error display. `line` and `column` are 1-based; together with
/// `filename` they uniquely identify the token's origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub source_line: String,
    pub filename: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        value: impl Into<String>,
        source_line: impl Into<String>,
        filename: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Token {
            kind,
            value: value.into(),
            source_line: source_line.into(),
            filename: filename.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token({:?}, \"{}\", line {}, column {})",
            self.kind, self.value, self.line, self.column
        )
    }
}
