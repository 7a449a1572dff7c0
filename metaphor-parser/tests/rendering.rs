//! End-to-end compilation: exact rendered output, paragraph assembly,
//! simplifier idempotence over real documents, and error display.

use metaphor_parser::metaphor::testing::write_source;
use metaphor_parser::metaphor::{
    compile_file, simplify, snapshot, CompileError, Parser,
};
use tempfile::TempDir;

fn compile_source(contents: &str) -> Result<String, CompileError> {
    let dir = TempDir::new().expect("temp dir");
    let path = write_source(dir.path(), "main.m6r", contents);
    compile_file(&path)
}

#[test]
fn minimal_target_renders_exactly() {
    let output = compile_source("Target: Build widget\n    A widget is assembled.\n")
        .expect("compiles");
    assert_eq!(output, "1 Build widget\n\nA widget is assembled.\n\n");
}

#[test]
fn nested_scopes_number_independently() {
    let output = compile_source(
        "Target:\n    Scope: A\n        Scope: A.1\n        Scope: A.2\n    Scope: B\n",
    )
    .expect("compiles");
    assert_eq!(output, "1\n\n1.1 A\n\n1.1.1 A.1\n\n1.1.2 A.2\n\n1.2 B\n\n");
}

#[test]
fn text_lines_assemble_into_paragraphs() {
    let output = compile_source(
        "Target: P\n    one\n    two\n\n    three\n",
    )
    .expect("compiles");
    assert_eq!(output, "1 P\n\none two\n\nthree\n\n");
}

#[test]
fn scope_counters_reset_per_parent() {
    let output = compile_source(
        "\
Target:
    Scope: A
        Scope: inner
    Scope: B
        Scope: inner
",
    )
    .expect("compiles");
    assert!(output.contains("1.1 A\n"));
    assert!(output.contains("1.1.1 inner\n"));
    assert!(output.contains("1.2 B\n"));
    assert!(output.contains("1.2.1 inner\n"));
}

#[test]
fn scope_text_precedes_its_sub_sections() {
    let output = compile_source(
        "\
Target: doc
    Scope: part
        Part summary.
        Example: usage
            Do the thing.
",
    )
    .expect("compiles");
    assert_eq!(
        output,
        "1 doc\n\n1.1 part\n\nPart summary.\n\n1.1.1 usage\n\nDo the thing.\n\n"
    );
}

#[test]
fn simplifying_a_parsed_document_twice_changes_nothing() {
    let dir = TempDir::new().expect("temp dir");
    let code = write_source(dir.path(), "snippet.py", "x = 1\n\ny = 2\n");
    let root = write_source(
        dir.path(),
        "main.m6r",
        &format!(
            "Target: doc\n    intro one\n    intro two\n\n    next paragraph\n    Scope: s\n        Embed: {}\n",
            code.display()
        ),
    );

    let mut parser = Parser::new();
    assert!(parser.parse(&root).expect("no fatal errors"));
    let tree = parser.syntax_tree().expect("tree");

    simplify(&tree);
    let once = snapshot(&tree);
    simplify(&tree);
    let twice = snapshot(&tree);
    assert_eq!(once, twice);
}

#[test]
fn syntax_errors_render_with_caret_blocks() {
    let error = compile_source("Target:\n   three spaces\n").expect_err("should fail");
    let CompileError::Parse(errors) = error else {
        panic!("expected syntax errors, got {:?}", error);
    };
    assert_eq!(errors.len(), 1);

    let display = format!("{}", errors[0]);
    let lines: Vec<&str> = display.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].contains("line 2, column 4"));
    assert_eq!(lines[1], "   |");
    assert_eq!(lines[2], "   v");
    assert_eq!(lines[3], "   three spaces");
}

#[test]
fn failed_parses_report_every_error_in_order() {
    let error = compile_source(
        "Target:\n    Scope: A\n        text\n    stray one\n    stray two\n",
    )
    .expect_err("should fail");
    let CompileError::Parse(errors) = error else {
        panic!("expected syntax errors, got {:?}", error);
    };
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| e.message.contains("Text must come first")));
    assert!(errors[0].line < errors[1].line);
}

#[test]
fn header_less_root_renders_a_bare_section_number() {
    let output = compile_source("Target:\n    Only text.\n").expect("compiles");
    assert_eq!(output, "1\n\nOnly text.\n\n");
}
