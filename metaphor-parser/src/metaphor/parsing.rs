//! Recursive-descent parser for Metaphor documents.
//!
//! The parser pulls tokens from a LIFO stack of lexers through a single
//! pump, [`Parser::next_token`]. The pump resolves `Include:` and
//! `Embed:` directives by pushing a new lexer frame, pops frames at end
//! of file, and maintains the global indentation level, so the grammar
//! below it sees one continuous document in which file boundaries are
//! invisible.
//!
//! Grammar errors do not abort the parse. They are recorded as
//! [`SyntaxError`]s and parsing continues at the next block boundary;
//! only missing files, I/O failures and include cycles are fatal.

use crate::metaphor::ast::{AstNode, NodeRef};
use crate::metaphor::error::{CompileError, SyntaxError};
use crate::metaphor::lexing::{EmbedLexer, Lexer, MetaphorLexer};
use crate::metaphor::token::{Token, TokenKind};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Builds an AST from a root file and everything it includes.
pub struct Parser {
    lexers: Vec<Box<dyn Lexer>>,
    seen_files: HashSet<PathBuf>,
    errors: Vec<SyntaxError>,
    indent_level: isize,
    pushed_back: Option<Token>,
    root_eof: Option<Token>,
    syntax_tree: Option<NodeRef>,
}

impl Parser {
    pub fn new() -> Self {
        Parser {
            lexers: Vec::new(),
            seen_files: HashSet::new(),
            errors: Vec::new(),
            indent_level: 0,
            pushed_back: None,
            root_eof: None,
            syntax_tree: None,
        }
    }

    /// Parse a root file. Returns `Ok(true)` when no syntax errors were
    /// recorded; fatal conditions (missing file, I/O failure, include
    /// cycle) surface as `Err`.
    pub fn parse<P: AsRef<Path>>(&mut self, path: P) -> Result<bool, CompileError> {
        let path = path.as_ref();
        self.check_file_not_loaded(path)?;
        self.lexers.push(Box::new(MetaphorLexer::new(path)?));

        let token = self.next_token()?;
        if token.kind != TokenKind::Target {
            self.record_error(&token, "Expected 'Target' keyword");
            return Ok(false);
        }

        let tree = self.parse_target(token)?;
        self.syntax_tree = Some(tree);

        let next = self.next_token()?;
        if next.kind != TokenKind::EndOfFile {
            self.record_error(&next, "Unexpected text after 'Target' block");
        }

        Ok(self.errors.is_empty())
    }

    /// The root of the parsed document, once [`Parser::parse`] has run.
    pub fn syntax_tree(&self) -> Option<NodeRef> {
        self.syntax_tree.clone()
    }

    pub fn syntax_errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn into_syntax_errors(self) -> Vec<SyntaxError> {
        self.errors
    }

    /// The parse-time view of nesting. Zero before parsing and again
    /// after the root file's end has been pumped.
    pub fn indent_level(&self) -> isize {
        self.indent_level
    }

    /// The token pump. Structural tokens update the indentation level on
    /// their way through; directives and intra-file end-of-file tokens
    /// are absorbed here and never reach the grammar.
    fn next_token(&mut self) -> Result<Token, CompileError> {
        if let Some(token) = self.pushed_back.take() {
            return Ok(token);
        }

        while let Some(lexer) = self.lexers.last_mut() {
            let token = lexer.next_token();
            match token.kind {
                TokenKind::Indent => {
                    self.indent_level += 1;
                    return Ok(token);
                }
                TokenKind::Outdent => {
                    self.indent_level -= 1;
                    return Ok(token);
                }
                TokenKind::Include => self.resolve_include()?,
                TokenKind::Embed => self.resolve_embed()?,
                TokenKind::EndOfFile => {
                    self.lexers.pop();
                    if self.lexers.is_empty() {
                        self.root_eof = Some(token.clone());
                        return Ok(token);
                    }
                }
                _ => return Ok(token),
            }
        }

        Ok(self
            .root_eof
            .clone()
            .unwrap_or_else(|| Token::new(TokenKind::EndOfFile, "", "", "", 1, 1)))
    }

    fn put_back(&mut self, token: Token) {
        self.pushed_back = Some(token);
    }

    /// Reject a file whose canonical path was already opened during this
    /// compilation, before any of its tokens can be produced.
    fn check_file_not_loaded(&mut self, path: &Path) -> Result<(), CompileError> {
        let canonical = fs::canonicalize(path)
            .map_err(|error| CompileError::from_io(path.to_path_buf(), error))?;
        if !self.seen_files.insert(canonical) {
            return Err(CompileError::AlreadyRead(path.to_path_buf()));
        }
        Ok(())
    }

    fn resolve_include(&mut self) -> Result<(), CompileError> {
        let token = self.next_token()?;
        if token.kind != TokenKind::KeywordText {
            self.record_error(&token, "Expected file name for 'Include'");
            return Ok(());
        }
        let path = PathBuf::from(&token.value);
        self.check_file_not_loaded(&path)?;
        self.lexers.push(Box::new(MetaphorLexer::new(&path)?));
        Ok(())
    }

    fn resolve_embed(&mut self) -> Result<(), CompileError> {
        let token = self.next_token()?;
        if token.kind != TokenKind::KeywordText {
            self.record_error(&token, "Expected file name for 'Embed'");
            return Ok(());
        }
        let path = PathBuf::from(&token.value);
        self.check_file_not_loaded(&path)?;
        self.lexers.push(Box::new(EmbedLexer::new(&path)?));
        Ok(())
    }

    fn record_error(&mut self, token: &Token, message: &str) {
        self.errors.push(SyntaxError {
            message: message.to_string(),
            line: token.line,
            column: token.column,
            filename: token.filename.clone(),
            source_line: token.source_line.clone(),
        });
    }

    /// Consume the optional `KeywordText` header and, when the block has
    /// an indented body, its opening `Indent`. Returns whether a body was
    /// opened. A token that starts neither is pushed back for the
    /// enclosing block.
    fn parse_block_intro(&mut self, node: &NodeRef, block_name: &str) -> Result<bool, CompileError> {
        let mut token = self.next_token()?;
        if token.kind == TokenKind::KeywordText {
            AstNode::attach(node, AstNode::new(&token));
            token = self.next_token()?;
        }
        match token.kind {
            TokenKind::Indent => Ok(true),
            TokenKind::BadIndent => {
                self.record_error(
                    &token,
                    &format!("Indentation is not a multiple of 4 spaces in a '{block_name}' block"),
                );
                // Recover by treating the misaligned line as the body.
                Ok(true)
            }
            _ => {
                self.put_back(token);
                Ok(false)
            }
        }
    }

    fn parse_target(&mut self, token: Token) -> Result<NodeRef, CompileError> {
        let node = AstNode::new(&token);
        if !self.parse_block_intro(&node, "Target")? {
            return Ok(node);
        }

        let block_indent_level = self.indent_level;
        let mut seen_token_kind = TokenKind::None;

        loop {
            let token = self.next_token()?;
            match token.kind {
                TokenKind::Text => {
                    if seen_token_kind != TokenKind::None {
                        self.record_error(&token, "Text must come first in a 'Target' block");
                    }
                    AstNode::attach(&node, AstNode::new(&token));
                }
                TokenKind::Scope => {
                    let child = self.parse_scope(token)?;
                    AstNode::attach(&node, child);
                    seen_token_kind = TokenKind::Scope;
                }
                TokenKind::Example => {
                    let child = self.parse_example(token)?;
                    AstNode::attach(&node, child);
                    seen_token_kind = TokenKind::Example;
                }
                TokenKind::Outdent => {
                    if self.indent_level < block_indent_level {
                        return Ok(node);
                    }
                }
                TokenKind::EndOfFile => return Ok(node),
                TokenKind::BadIndent => self.record_error(
                    &token,
                    "Indentation is not a multiple of 4 spaces in a 'Target' block",
                ),
                TokenKind::BadOutdent => self.record_error(
                    &token,
                    "Outdent does not align with an indentation level in a 'Target' block",
                ),
                _ => self.record_error(
                    &token,
                    &format!("Unexpected token: {} in 'Target' block", token.value),
                ),
            }
        }
    }

    fn parse_scope(&mut self, token: Token) -> Result<NodeRef, CompileError> {
        let node = AstNode::new(&token);
        if !self.parse_block_intro(&node, "Scope")? {
            return Ok(node);
        }

        let block_indent_level = self.indent_level;
        let mut seen_token_kind = TokenKind::None;

        loop {
            let token = self.next_token()?;
            match token.kind {
                TokenKind::Text => {
                    if seen_token_kind != TokenKind::None {
                        self.record_error(&token, "Text must come first in a 'Scope' block");
                    }
                    AstNode::attach(&node, AstNode::new(&token));
                }
                TokenKind::Scope => {
                    let child = self.parse_scope(token)?;
                    AstNode::attach(&node, child);
                    seen_token_kind = TokenKind::Scope;
                }
                TokenKind::Example => {
                    let child = self.parse_example(token)?;
                    AstNode::attach(&node, child);
                    seen_token_kind = TokenKind::Example;
                }
                TokenKind::Outdent => {
                    if self.indent_level < block_indent_level {
                        return Ok(node);
                    }
                }
                TokenKind::EndOfFile => return Ok(node),
                TokenKind::BadIndent => self.record_error(
                    &token,
                    "Indentation is not a multiple of 4 spaces in a 'Scope' block",
                ),
                TokenKind::BadOutdent => self.record_error(
                    &token,
                    "Outdent does not align with an indentation level in a 'Scope' block",
                ),
                _ => self.record_error(
                    &token,
                    &format!("Unexpected token: {} in 'Scope' block", token.value),
                ),
            }
        }
    }

    fn parse_example(&mut self, token: Token) -> Result<NodeRef, CompileError> {
        let node = AstNode::new(&token);
        if !self.parse_block_intro(&node, "Example")? {
            return Ok(node);
        }

        let block_indent_level = self.indent_level;

        loop {
            let token = self.next_token()?;
            match token.kind {
                TokenKind::Text => AstNode::attach(&node, AstNode::new(&token)),
                TokenKind::Outdent => {
                    if self.indent_level < block_indent_level {
                        return Ok(node);
                    }
                }
                TokenKind::EndOfFile => return Ok(node),
                TokenKind::BadIndent => self.record_error(
                    &token,
                    "Indentation is not a multiple of 4 spaces in an 'Example' block",
                ),
                TokenKind::BadOutdent => self.record_error(
                    &token,
                    "Outdent does not align with an indentation level in an 'Example' block",
                ),
                _ => self.record_error(
                    &token,
                    &format!("Unexpected token: {} in 'Example' block", token.value),
                ),
            }
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
