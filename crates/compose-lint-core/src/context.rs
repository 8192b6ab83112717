//! Input unit of a lint run.

use std::path::{Path, PathBuf};

use crate::tree::SyntaxTree;

/// A parsed source file handed over by the parser collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: PathBuf,
    tree: SyntaxTree,
}

impl SourceFile {
    /// Pairs a path with its parsed tree.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, tree: SyntaxTree) -> Self {
        Self {
            path: path.into(),
            tree,
        }
    }

    /// Path used in reports.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The parsed tree.
    #[must_use]
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    /// Splits into path and tree.
    #[must_use]
    pub fn into_parts(self) -> (PathBuf, SyntaxTree) {
        (self.path, self.tree)
    }
}
