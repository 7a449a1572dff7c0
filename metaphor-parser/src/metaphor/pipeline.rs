//! One-call compilation driver: parse, simplify, render.

use crate::metaphor::assembling::simplify;
use crate::metaphor::error::CompileError;
use crate::metaphor::formats::markdown::render_to_string;
use crate::metaphor::parsing::Parser;
use std::path::Path;

/// Compile a root Metaphor file into its rendered output.
///
/// Syntax errors are returned collectively as
/// [`CompileError::Parse`]; fatal conditions (missing files, I/O
/// failures, include cycles) abort with their own variants.
pub fn compile_file<P: AsRef<Path>>(path: P) -> Result<String, CompileError> {
    let mut parser = Parser::new();
    let clean = parser.parse(path)?;
    if !clean {
        return Err(CompileError::Parse(parser.into_syntax_errors()));
    }

    let tree = parser
        .syntax_tree()
        .expect("a clean parse always produces a syntax tree");
    simplify(&tree);
    Ok(render_to_string(&tree))
}
