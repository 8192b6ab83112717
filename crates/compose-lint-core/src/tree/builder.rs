//! Event-style construction of a [`SyntaxTree`].
//!
//! An external parser walks its own concrete syntax tree and replays it as
//! `start_node` / `token` / `finish_node` events. Offsets are computed from
//! token text when the tree is finished.
//!
//! ```
//! use compose_lint_core::tree::{FileData, NodeData, NodeKind, TreeBuilder};
//!
//! let mut builder = TreeBuilder::new();
//! builder.start_node(NodeKind::File, NodeData::File(FileData::default()));
//! builder.token("// empty\n");
//! builder.finish_node();
//! let tree = builder.finish().unwrap();
//! assert_eq!(tree.text(), "// empty\n");
//! ```

use super::{Node, NodeData, NodeKind, SyntaxTree};
use crate::error::TreeError;

/// Builds a [`SyntaxTree`] from a stream of node events.
///
/// Errors are sticky: the first misuse is remembered and returned by
/// [`finish`](Self::finish), later events are ignored.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    stack: Vec<Node>,
    root: Option<Node>,
    error: Option<TreeError>,
}

impl TreeBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(&mut self, error: TreeError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Opens a node; following events add children to it.
    pub fn start_node(&mut self, kind: NodeKind, data: NodeData) {
        if self.error.is_some() {
            return;
        }
        if kind == NodeKind::Token || !data.fits(kind) {
            self.fail(TreeError::KindMismatch { kind });
            return;
        }
        if self.stack.is_empty() && self.root.is_some() {
            self.fail(TreeError::MultipleRoots);
            return;
        }
        self.stack.push(Node::new(kind, data));
    }

    /// Adds a token leaf to the innermost open node.
    pub fn token(&mut self, text: impl Into<String>) {
        if self.error.is_some() {
            return;
        }
        let text = text.into();
        match self.stack.last_mut() {
            Some(parent) => parent.push_child(Node::token(text)),
            None => self.fail(TreeError::TokenOutsideNode { text }),
        }
    }

    /// Closes the innermost open node.
    pub fn finish_node(&mut self) {
        if self.error.is_some() {
            return;
        }
        let Some(node) = self.stack.pop() else {
            self.fail(TreeError::UnbalancedFinish);
            return;
        };
        match self.stack.last_mut() {
            Some(parent) => parent.push_child(node),
            None => self.root = Some(node),
        }
    }

    /// Finishes construction and lays out offsets.
    ///
    /// # Errors
    ///
    /// Returns the first [`TreeError`] recorded while building, or an error
    /// if nodes are still open, no root was built, or the root is not a
    /// `File` node.
    pub fn finish(self) -> Result<SyntaxTree, TreeError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if let Some(open) = self.stack.last() {
            return Err(TreeError::UnclosedNode {
                kind: open.kind(),
                open: self.stack.len(),
            });
        }
        let root = self.root.ok_or(TreeError::Empty)?;
        SyntaxTree::new(root)
    }
}
