//! Abstract syntax tree for Metaphor documents.
//!
//! Nodes own their children; each child holds a non-owning back-reference
//! to its parent, set when the child is attached. The back-reference is a
//! `Weak` handle, so the tree never forms an ownership cycle and dropping
//! the root drops the whole document.

use crate::metaphor::token::{Token, TokenKind};
use serde::Serialize;
use std::cell::RefCell;
use std::fmt::Write;
use std::rc::{Rc, Weak};

/// Shared handle to an AST node.
pub type NodeRef = Rc<RefCell<AstNode>>;

/// A node in the AST, carrying the kind, lexeme and position of the token
/// it was built from, plus its ordered children.
#[derive(Debug)]
pub struct AstNode {
    pub kind: TokenKind,
    pub value: String,
    pub line: usize,
    pub column: usize,
    pub parent: Weak<RefCell<AstNode>>,
    pub children: Vec<NodeRef>,
}

impl AstNode {
    /// Create a detached node from a token.
    pub fn new(token: &Token) -> NodeRef {
        Rc::new(RefCell::new(AstNode {
            kind: token.kind,
            value: token.value.clone(),
            line: token.line,
            column: token.column,
            parent: Weak::new(),
            children: Vec::new(),
        }))
    }

    /// Append `child` to `parent`'s children and point the child's
    /// back-reference at its new parent.
    pub fn attach(parent: &NodeRef, child: NodeRef) {
        child.borrow_mut().parent = Rc::downgrade(parent);
        parent.borrow_mut().children.push(child);
    }

    /// The node's parent, if it is attached and the parent is still alive.
    pub fn parent(node: &NodeRef) -> Option<NodeRef> {
        node.borrow().parent.upgrade()
    }
}

/// Structural equality: kind, value and children, ignoring positions and
/// parents. Two documents parse "the same" under this relation even when
/// they came from different files.
pub fn tree_eq(a: &NodeRef, b: &NodeRef) -> bool {
    let (a, b) = (a.borrow(), b.borrow());
    a.kind == b.kind
        && a.value == b.value
        && a.children.len() == b.children.len()
        && a.children
            .iter()
            .zip(b.children.iter())
            .all(|(x, y)| tree_eq(x, y))
}

/// A plain-data, serializable copy of a subtree. Used by tests and
/// tooling to compare and inspect trees without touching `Rc` handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AstSnapshot {
    pub kind: TokenKind,
    pub value: String,
    pub line: usize,
    pub column: usize,
    pub children: Vec<AstSnapshot>,
}

/// Snapshot a subtree rooted at `node`.
pub fn snapshot(node: &NodeRef) -> AstSnapshot {
    let n = node.borrow();
    AstSnapshot {
        kind: n.kind,
        value: n.value.clone(),
        line: n.line,
        column: n.column,
        children: n.children.iter().map(snapshot).collect(),
    }
}

/// Render a subtree as an indented one-line-per-node listing, two spaces
/// per nesting level. Debugging aid only.
pub fn dump_tree(node: &NodeRef) -> String {
    let mut out = String::new();
    dump_level(node, 0, &mut out);
    out
}

fn dump_level(node: &NodeRef, level: usize, out: &mut String) {
    let n = node.borrow();
    let _ = writeln!(out, "{}{:?} {}", "  ".repeat(level), n.kind, n.value);
    for child in &n.children {
        dump_level(child, level + 1, out);
    }
}
