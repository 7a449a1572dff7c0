//! Lexer for embedded (verbatim) files.
//!
//! An embedded file is not parsed; it is presented to the grammar as a
//! run of flat `Text` tokens: a `File:` header line, an opening fence
//! tagged with the language guessed from the file extension, one token
//! per physical line with leading whitespace preserved, and a closing
//! fence. No indentation tokens are ever produced.

use crate::metaphor::error::CompileError;
use crate::metaphor::lexing::Lexer;
use crate::metaphor::token::{Token, TokenKind};
use once_cell::sync::Lazy;
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::Path;

static LANGUAGES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("cpp", "cpp"),
        ("hpp", "cpp"),
        ("h", "cpp"),
        ("c", "c"),
        ("cs", "csharp"),
        ("java", "java"),
        ("py", "python"),
        ("js", "javascript"),
        ("ts", "typescript"),
        ("rb", "ruby"),
        ("php", "php"),
        ("html", "html"),
        ("css", "css"),
        ("swift", "swift"),
        ("m", "objectivec"),
        ("mm", "objectivec"),
        ("go", "go"),
        ("rs", "rust"),
        ("kt", "kotlin"),
        ("sh", "bash"),
        ("bash", "bash"),
        ("r", "r"),
        ("sql", "sql"),
        ("xml", "xml"),
        ("json", "json"),
        ("yaml", "yaml"),
        ("yml", "yaml"),
        ("pl", "perl"),
        ("lua", "lua"),
        ("scala", "scala"),
        ("hs", "haskell"),
        ("erl", "erlang"),
        ("ex", "elixir"),
        ("clj", "clojure"),
        ("groovy", "groovy"),
        ("dart", "dart"),
        ("rkt", "racket"),
        ("vb", "vbnet"),
        ("vbs", "vbscript"),
    ])
});

/// The fenced-block language tag for a filename, from its final
/// extension. Case-insensitive; unknown and missing extensions map to
/// `plaintext`.
pub fn language_for(filename: &str) -> &'static str {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .and_then(|ext| LANGUAGES.get(ext.as_str()).copied())
        .unwrap_or("plaintext")
}

/// Presents any file as a fenced run of verbatim text tokens.
pub struct EmbedLexer {
    filename: String,
    tokens: VecDeque<Token>,
    current_line: usize,
}

impl EmbedLexer {
    /// Open and wrap a file.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, CompileError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .map_err(|error| CompileError::from_io(path.to_path_buf(), error))?;
        Ok(Self::from_source(path.display().to_string(), &source))
    }

    /// Wrap in-memory content, labelling tokens with `filename`.
    pub fn from_source(filename: impl Into<String>, source: &str) -> Self {
        let mut lexer = EmbedLexer {
            filename: filename.into(),
            tokens: VecDeque::new(),
            current_line: 1,
        };
        lexer.tokenize(source);
        lexer
    }

    fn tokenize(&mut self, source: &str) {
        let header = format!("File: {}", self.filename);
        let opening = format!("```{}", language_for(&self.filename));
        self.push(&header, "", 1);
        self.push(&opening, "", 1);

        for raw_line in source.lines() {
            let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
            self.push(line, line, self.current_line);
            self.current_line += 1;
        }

        self.push("```", "", self.current_line);
    }

    fn push(&mut self, value: &str, source_line: &str, line: usize) {
        self.tokens.push_back(Token::new(
            TokenKind::Text,
            value,
            source_line,
            self.filename.clone(),
            line,
            1,
        ));
    }
}

impl Lexer for EmbedLexer {
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
