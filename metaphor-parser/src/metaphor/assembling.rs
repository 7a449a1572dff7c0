//! Paragraph assembly over the parsed tree.
//!
//! The parser leaves one `Text` node per source line. This pass rewrites
//! each node's children in place so prose reads as paragraphs:
//!
//! - Outside fenced regions, consecutive non-empty `Text` children merge
//!   into one node joined by single spaces. An empty `Text` (a blank
//!   source line) is deleted and marks a paragraph break, recorded as a
//!   `"\n\n"` inside the merged value so later text is not glued onto the
//!   previous sentence.
//! - A `Text` whose value starts with a triple-backtick fence opens a
//!   fenced region. Inside it, children merge with newlines and empty
//!   lines are kept, so embedded files survive byte for byte; the closing
//!   fence merges into the same node and ends the region.
//! - Non-`Text` children are recursed into and reset the merge window.
//!
//! The pass is idempotent: an already-assembled tree comes out unchanged,
//! because merged fenced blocks carry their own closing fence and merged
//! paragraphs contain their break markers.

use crate::metaphor::ast::NodeRef;
use crate::metaphor::token::TokenKind;

/// Merge adjacent text fragments throughout the tree, in place.
pub fn simplify(node: &NodeRef) {
    let children = std::mem::take(&mut node.borrow_mut().children);

    let mut merged: Vec<NodeRef> = Vec::new();
    // The Text node currently being extended, if any. It is already in
    // `merged`.
    let mut accumulator: Option<NodeRef> = None;
    let mut in_fence = false;
    let mut paragraph_break = false;

    for child in children {
        let is_text = child.borrow().kind == TokenKind::Text;
        if !is_text {
            simplify(&child);
            merged.push(child);
            accumulator = None;
            in_fence = false;
            paragraph_break = false;
            continue;
        }

        let value = child.borrow().value.clone();

        if in_fence {
            let target = accumulator
                .as_ref()
                .expect("an open fenced window always has an accumulator");
            {
                let mut text = target.borrow_mut();
                text.value.push('\n');
                text.value.push_str(&value);
            }
            if value.starts_with("```") {
                in_fence = false;
                accumulator = None;
            }
            continue;
        }

        if value.is_empty() {
            paragraph_break = true;
            continue;
        }

        if value.starts_with("```") {
            if fence_is_closed(&value) {
                merged.push(child);
                accumulator = None;
            } else {
                merged.push(child.clone());
                accumulator = Some(child);
                in_fence = true;
            }
            paragraph_break = false;
            continue;
        }

        match &accumulator {
            Some(target) => {
                let mut text = target.borrow_mut();
                text.value.push_str(if paragraph_break { "\n\n" } else { " " });
                text.value.push_str(&value);
            }
            None => {
                merged.push(child.clone());
                accumulator = Some(child);
            }
        }
        paragraph_break = false;
    }

    node.borrow_mut().children = merged;
}

/// Whether a fence-opening value already contains its closing fence,
/// which happens once a fenced run has been merged into a single node.
fn fence_is_closed(value: &str) -> bool {
    let mut lines = value.lines();
    lines.next();
    lines.last().is_some_and(|line| line.starts_with("```"))
}
