//! The Metaphor compilation pipeline.
//!
//! Stages, in data-flow order:
//!
//! 1. [`lexing`] - turns source files into token streams with explicit
//!    INDENT/OUTDENT structure (`MetaphorLexer`) or flat verbatim text
//!    (`EmbedLexer`).
//! 2. [`parsing`] - a recursive-descent parser pulling from a stack of
//!    lexers, building the AST and accumulating syntax errors.
//! 3. [`assembling`] - merges runs of text nodes into paragraphs and
//!    preserves fenced verbatim regions.
//! 4. [`formats`] - output writers, currently the section-numbered
//!    Markdown-style renderer.
//!
//! [`pipeline`] wires the stages together; [`error`] holds the error
//! types shared across them.

pub mod assembling;
pub mod ast;
pub mod error;
pub mod formats;
pub mod lexing;
pub mod parsing;
pub mod pipeline;
pub mod testing;
pub mod token;

pub use assembling::simplify;
pub use ast::{snapshot, tree_eq, AstNode, AstSnapshot, NodeRef};
pub use error::{CompileError, SyntaxError};
pub use formats::{render, render_to_string};
pub use lexing::{EmbedLexer, Lexer, MetaphorLexer};
pub use parsing::Parser;
pub use pipeline::compile_file;
pub use token::{Token, TokenKind};
