//! Lexer for Metaphor source files.
//!
//! The lexer works line by line. Each physical line goes through three
//! decisions: is it blank or a comment, did its indentation change, and
//! is its first word a keyword. Keyword lines yield a keyword token plus
//! an optional `KeywordText` for the rest of the line; everything else
//! becomes a single whole-line `Text` token.
//!
//! A text block opens at the first `Text` token after a keyword and
//! closes at the next keyword. While a text block is open, blank lines
//! are emitted as empty `Text` tokens so paragraph breaks survive into
//! the AST; outside a text block they are discarded. Comment lines
//! (first content character `#`) vanish entirely and leave the
//! indentation state untouched.

use crate::metaphor::error::CompileError;
use crate::metaphor::lexing::Lexer;
use crate::metaphor::token::{Token, TokenKind};
use once_cell::sync::Lazy;
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::Path;

/// Columns per indentation level.
pub const INDENT_SPACES: usize = 4;

static KEYWORDS: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    HashMap::from([
        ("Include:", TokenKind::Include),
        ("Embed:", TokenKind::Embed),
        ("Target:", TokenKind::Target),
        ("Scope:", TokenKind::Scope),
        ("Example:", TokenKind::Example),
    ])
});

/// Tokenizer for the Metaphor language itself.
pub struct MetaphorLexer {
    filename: String,
    tokens: VecDeque<Token>,
    current_line: usize,
    indent_column: usize,
    in_text_block: bool,
}

impl MetaphorLexer {
    /// Open and tokenize a file.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, CompileError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .map_err(|error| CompileError::from_io(path.to_path_buf(), error))?;
        Ok(Self::from_source(path.display().to_string(), &source))
    }

    /// Tokenize in-memory source, labelling tokens with `filename`.
    pub fn from_source(filename: impl Into<String>, source: &str) -> Self {
        let mut lexer = MetaphorLexer {
            filename: filename.into(),
            tokens: VecDeque::new(),
            current_line: 1,
            indent_column: 1,
            in_text_block: false,
        };
        lexer.tokenize(source);
        lexer
    }

    fn tokenize(&mut self, source: &str) {
        for raw_line in source.lines() {
            let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
            self.scan_line(line);
            self.current_line += 1;
        }

        // Close any indentation still open at the end of the file.
        while self.indent_column > 1 {
            self.push(
                TokenKind::Outdent,
                "[Outdent]",
                "",
                self.current_line,
                self.indent_column,
            );
            self.indent_column -= INDENT_SPACES;
        }
    }

    fn scan_line(&mut self, line: &str) {
        let Some(offset) = line.find(|c: char| c != ' ' && c != '\t') else {
            if self.in_text_block {
                self.push(TokenKind::Text, "", line, self.current_line, self.indent_column);
            }
            return;
        };

        // Leading whitespace is single-byte, so the byte offset is also
        // the 0-based column.
        let first_column = offset + 1;
        let rest = &line[offset..];

        if rest.starts_with('#') {
            return;
        }

        self.scan_indentation(line, first_column);
        self.scan_contents(line, first_column, rest);
    }

    /// Emit the structural tokens for a change in indentation column.
    fn scan_indentation(&mut self, line: &str, first_column: usize) {
        let unit = INDENT_SPACES as isize;
        let delta = first_column as isize - self.indent_column as isize;

        if delta > 0 {
            if delta % unit != 0 {
                self.push(TokenKind::BadIndent, "[Bad Indent]", line, self.current_line, first_column);
                return;
            }
            for _ in 0..delta / unit {
                self.push(TokenKind::Indent, "[Indent]", line, self.current_line, first_column);
            }
            self.indent_column = first_column;
        } else if delta < 0 {
            if (-delta) % unit != 0 {
                self.push(TokenKind::BadOutdent, "[Bad Outdent]", line, self.current_line, first_column);
                return;
            }
            for _ in 0..(-delta) / unit {
                self.push(TokenKind::Outdent, "[Outdent]", line, self.current_line, first_column);
            }
            self.indent_column = first_column;
        }
    }

    fn scan_contents(&mut self, line: &str, first_column: usize, rest: &str) {
        let word_end = rest
            .find(|c: char| c == ' ' || c == '\t')
            .unwrap_or(rest.len());
        let word = &rest[..word_end];

        if let Some(&kind) = KEYWORDS.get(word) {
            self.push(kind, word, line, self.current_line, first_column);

            let remainder = rest[word_end..].trim_start_matches([' ', '\t']);
            if !remainder.is_empty() {
                let text_column = first_column + (rest.len() - remainder.len());
                self.push(TokenKind::KeywordText, remainder, line, self.current_line, text_column);
            }

            self.in_text_block = false;
            return;
        }

        // Prose. Inside an open text block every row uses the block's
        // indent column, so lines that drifted right keep their extra
        // spaces as part of the text (misaligned lines have already
        // produced a BadIndent above).
        let mut start_column = first_column;
        if self.in_text_block && start_column > self.indent_column {
            start_column = self.indent_column;
        }

        let value = &line[start_column - 1..];
        self.push(TokenKind::Text, value, line, self.current_line, start_column);
        self.in_text_block = true;
    }

    fn push(&mut self, kind: TokenKind, value: &str, source_line: &str, line: usize, column: usize) {
        self.tokens.push_back(Token::new(
            kind,
            value,
            source_line,
            self.filename.clone(),
            line,
            column,
        ));
    }
}

impl Lexer for MetaphorLexer {
    fn next_token(&mut self) -> Token {
        self.tokens.pop_front().unwrap_or_else(|| {
            Token::new(
                TokenKind::EndOfFile,
                "",
                "",
                self.filename.clone(),
                self.current_line,
                1,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metaphor::testing::{collect_tokens, token_kinds};
    use rstest::rstest;

    fn lex(source: &str) -> Vec<Token> {
        let mut lexer = MetaphorLexer::from_source("test.m6r", source);
        collect_tokens(&mut lexer)
    }

    #[test]
    fn keyword_line_with_description() {
        let tokens = lex("Target: Build widget\n");
        assert_eq!(
            token_kinds(&tokens),
            vec![TokenKind::Target, TokenKind::KeywordText, TokenKind::EndOfFile]
        );
        assert_eq!(tokens[0].value, "Target:");
        assert_eq!(tokens[1].value, "Build widget");
        assert_eq!(tokens[1].column, 9);
    }

    #[test]
    fn keyword_line_without_description() {
        let tokens = lex("Target:\n");
        assert_eq!(token_kinds(&tokens), vec![TokenKind::Target, TokenKind::EndOfFile]);
    }

    #[test]
    fn keyword_match_is_exact() {
        // A colon glued to extra characters is prose, not a keyword.
        let tokens = lex("Target:x\n");
        assert_eq!(tokens[0].kind, TokenKind::Text);
        assert_eq!(tokens[0].value, "Target:x");
    }

    #[test]
    fn indented_body_produces_indent_and_trailing_outdent() {
        let tokens = lex("Target:\n    Some text\n");
        assert_eq!(
            token_kinds(&tokens),
            vec![
                TokenKind::Target,
                TokenKind::Indent,
                TokenKind::Text,
                TokenKind::Outdent,
                TokenKind::EndOfFile,
            ]
        );
        assert_eq!(tokens[2].value, "Some text");
        assert_eq!(tokens[2].column, 5);
    }

    #[test]
    fn two_level_jump_emits_two_indents() {
        let tokens = lex("a\n        b\n");
        assert_eq!(
            token_kinds(&tokens),
            vec![
                TokenKind::Text,
                TokenKind::Indent,
                TokenKind::Indent,
                TokenKind::Text,
                TokenKind::Outdent,
                TokenKind::Outdent,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[rstest]
    #[case("Target:\n   bad\n", TokenKind::BadIndent, 4)]
    #[case("Target:\n    ok\n  bad\n", TokenKind::BadOutdent, 3)]
    fn misaligned_indentation_is_flagged_at_its_column(
        #[case] source: &str,
        #[case] expected: TokenKind,
        #[case] column: usize,
    ) {
        let tokens = lex(source);
        let bad = tokens
            .iter()
            .find(|t| t.kind == expected)
            .expect("expected a structural error token");
        assert_eq!(bad.column, column);
    }

    #[test]
    fn bad_indent_leaves_indent_column_unchanged() {
        // After the 3-space line, a 4-space line still indents relative
        // to column 1.
        let tokens = lex("a\n   b\n    c\n");
        let kinds = token_kinds(&tokens);
        assert_eq!(
            kinds,
            vec![
                TokenKind::Text,
                TokenKind::BadIndent,
                TokenKind::Text,
                TokenKind::Indent,
                TokenKind::Text,
                TokenKind::Outdent,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn blank_lines_inside_a_text_block_become_empty_text() {
        let tokens = lex("Target:\n    one\n\n    two\n");
        let values: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Text)
            .map(|t| t.value.as_str())
            .collect();
        assert_eq!(values, vec!["one", "", "two"]);
    }

    #[test]
    fn blank_lines_outside_a_text_block_are_discarded() {
        let tokens = lex("\n\nTarget:\n");
        assert_eq!(token_kinds(&tokens), vec![TokenKind::Target, TokenKind::EndOfFile]);
    }

    #[test]
    fn whitespace_only_lines_count_as_blank() {
        let tokens = lex("Target:\n    one\n   \t \n    two\n");
        let values: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Text)
            .map(|t| t.value.as_str())
            .collect();
        assert_eq!(values, vec!["one", "", "two"]);
    }

    #[test]
    fn comment_lines_vanish_without_touching_indentation() {
        let tokens = lex("Target:\n        # deeply indented comment\n    text\n");
        assert_eq!(
            token_kinds(&tokens),
            vec![
                TokenKind::Target,
                TokenKind::Indent,
                TokenKind::Text,
                TokenKind::Outdent,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn hash_inside_prose_is_kept() {
        let tokens = lex("item #4 of the list\n");
        assert_eq!(tokens[0].kind, TokenKind::Text);
        assert_eq!(tokens[0].value, "item #4 of the list");
    }

    #[test]
    fn directive_line_yields_directive_and_filename() {
        let tokens = lex("Include: other.m6r\n");
        assert_eq!(
            token_kinds(&tokens),
            vec![TokenKind::Include, TokenKind::KeywordText, TokenKind::EndOfFile]
        );
        assert_eq!(tokens[1].value, "other.m6r");
    }

    #[test]
    fn end_of_file_is_idempotent() {
        let mut lexer = MetaphorLexer::from_source("test.m6r", "hello\n");
        let _ = lexer.next_token();
        assert_eq!(lexer.next_token().kind, TokenKind::EndOfFile);
        assert_eq!(lexer.next_token().kind, TokenKind::EndOfFile);
    }

    #[test]
    fn every_token_has_positive_line_and_column() {
        let tokens = lex("Target: x\n    a\n\n        b\n  bad\n");
        for token in &tokens {
            assert!(token.line >= 1, "line for {}", token);
            assert!(token.column >= 1, "column for {}", token);
        }
    }

    #[test]
    fn source_line_preserves_the_physical_line() {
        let tokens = lex("Target:\n    some text\n");
        let text = tokens.iter().find(|t| t.kind == TokenKind::Text).unwrap();
        assert_eq!(text.source_line, "    some text");
    }

    #[test]
    fn missing_file_is_reported_as_not_found() {
        let result = MetaphorLexer::new("definitely-not-here.m6r");
        assert!(matches!(result, Err(CompileError::FileNotFound(_))));
    }
}
