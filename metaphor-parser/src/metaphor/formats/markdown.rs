//! Section-numbered plain-text renderer.
//!
//! Walks the tree depth first. `Target`, `Scope` and `Example` nodes emit
//! a heading line of their dotted section number followed by the block's
//! header text, if it has one; the root is section `1` and each `Scope`
//! or `Example` child appends a per-parent counter. `Text` nodes emit
//! their value followed by a blank line. Everything else (notably the
//! `KeywordText` header, already folded into the heading) emits nothing
//! of its own.

use crate::metaphor::ast::NodeRef;
use crate::metaphor::token::TokenKind;
use std::io;

/// Write the rendering of the tree rooted at `root` to `out`.
pub fn render<W: io::Write>(root: &NodeRef, out: &mut W) -> io::Result<()> {
    render_node(root, "1", out)
}

/// Render into a `String`.
pub fn render_to_string(root: &NodeRef) -> String {
    let mut buffer = Vec::new();
    render(root, &mut buffer).expect("writing to an in-memory buffer cannot fail");
    String::from_utf8(buffer).expect("the renderer only writes UTF-8")
}

fn render_node<W: io::Write>(node: &NodeRef, section: &str, out: &mut W) -> io::Result<()> {
    let node = node.borrow();

    match node.kind {
        TokenKind::Text => {
            writeln!(out, "{}\n", node.value)?;
            return Ok(());
        }
        TokenKind::Target | TokenKind::Scope | TokenKind::Example => {
            let header = node.children.first().and_then(|child| {
                let child = child.borrow();
                (child.kind == TokenKind::KeywordText).then(|| child.value.clone())
            });
            match header {
                Some(text) => writeln!(out, "{} {}\n", section, text)?,
                None => writeln!(out, "{}\n", section)?,
            }
        }
        _ => {}
    }

    let mut index = 0;
    for child in &node.children {
        let numbered = matches!(
            child.borrow().kind,
            TokenKind::Scope | TokenKind::Example
        );
        if numbered {
            index += 1;
        }
        render_node(child, &format!("{}.{}", section, index), out)?;
    }

    Ok(())
}
