//! Lexers for the two kinds of input file.
//!
//! Both lexers tokenize their file eagerly at construction and hand out
//! tokens one at a time through the [`Lexer`] trait; the parser's token
//! pump speaks only to that trait and never knows which kind of file a
//! token came from.
//!
//! Indentation handling
//!
//! Metaphor uses the off-side rule with a fixed 4-column indent unit. The
//! source lexer compares each line's first content column against the
//! current indent column and emits a run of `Indent` or `Outdent` tokens
//! for the difference, or a single `BadIndent`/`BadOutdent` when the
//! difference is not a whole number of units. Emitting the run during the
//! eager pass keeps `next_token` a plain queue pop, with no re-entrant
//! state to carry between calls. Embedded files are flat: the embed lexer
//! never produces indentation tokens.

pub mod embed;
pub mod source;

pub use embed::EmbedLexer;
pub use source::{MetaphorLexer, INDENT_SPACES};

use crate::metaphor::token::Token;

/// The interface the parser pumps tokens through.
pub trait Lexer {
    /// Produce the next token. Returns `EndOfFile` idempotently once the
    /// input is exhausted.
    fn next_token(&mut self) -> Token;
}
