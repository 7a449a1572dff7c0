//! Support utilities shared by unit and integration tests.

use crate::metaphor::lexing::Lexer;
use crate::metaphor::token::{Token, TokenKind};
use std::fs;
use std::path::{Path, PathBuf};

/// Write a fixture source file under `dir` and return its path.
///
/// Integration tests pair this with a `tempfile::TempDir`, passing
/// `dir.path()`.
pub fn write_source(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("fixture files are writable");
    path
}

/// Drain a lexer into a vector, including the final `EndOfFile` token.
pub fn collect_tokens(lexer: &mut dyn Lexer) -> Vec<Token> {
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.kind == TokenKind::EndOfFile;
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}

/// Just the kinds, for compact stream assertions.
pub fn token_kinds(tokens: &[Token]) -> Vec<TokenKind> {
    tokens.iter().map(|token| token.kind).collect()
}
