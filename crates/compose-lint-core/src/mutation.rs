//! Scoped, buffered tree edits.
//!
//! A rule never touches the tree directly. It records edits through a
//! [`MutationHandle`] that only accepts targets inside the node under visit;
//! the driver applies them after the hook returns.

use tracing::trace;

use crate::error::RuleError;
use crate::tree::{EditFailure, Node, NodeData, NodeKind, NodePath, NodeRef, ParameterRef, Shift};

/// A recorded edit, with its target path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Edit {
    /// Replace the text of the target's last token.
    ReplaceLastToken { target: NodePath, text: String },
    /// Give the target parameter a default value.
    SetDefaultValue { target: NodePath, expression: String },
    /// Lay the scope copy out one byte late, so the swap is rejected.
    #[cfg(test)]
    Misplace { target: NodePath },
}

impl Edit {
    fn target(&self) -> &NodePath {
        match self {
            Self::ReplaceLastToken { target, .. } | Self::SetDefaultValue { target, .. } => target,
            #[cfg(test)]
            Self::Misplace { target } => target,
        }
    }

    /// Applies the edit to `scope_node`, a copy of the node at `scope`.
    pub(crate) fn apply(self, scope_node: &mut Node, scope: &NodePath) -> Result<Shift, EditFailure> {
        let target = self.target().clone();
        let missing = || RuleError::MissingTarget {
            target: target.as_slice().to_vec(),
        };
        let relative = target.relative_to(scope).ok_or_else(|| {
            EditFailure::Rule(RuleError::OutOfScope {
                scope: scope.as_slice().to_vec(),
                target: target.as_slice().to_vec(),
            })
        })?;
        trace!(target = ?target.as_slice(), edit = ?self, "applying edit");
        match self {
            Self::ReplaceLastToken { text, .. } => scope_node.edit_at(relative, |node| {
                let token = node.last_token_mut().ok_or_else(missing)?;
                if token.set_token_text(text) {
                    Ok(())
                } else {
                    Err(missing())
                }
            }),
            Self::SetDefaultValue { expression, .. } => scope_node.edit_at(relative, |node| {
                if node.kind() != NodeKind::Parameter {
                    return Err(missing());
                }
                let default = default_value_node(expression);
                let children = node.children_mut();
                match children
                    .iter()
                    .position(|child| child.kind() == NodeKind::DefaultValue)
                {
                    Some(index) => children[index] = default,
                    None => children.push(default),
                }
                Ok(())
            }),
            #[cfg(test)]
            Self::Misplace { .. } => {
                let start = scope_node.range().start;
                scope_node.relayout(start + 1);
                Ok(Shift { at: start, delta: 0 })
            }
        }
    }
}

fn default_value_node(expression: String) -> Node {
    let mut node = Node::new(NodeKind::DefaultValue, NodeData::None);
    node.push_child(Node::token(" "));
    node.push_child(Node::token("="));
    node.push_child(Node::token(" "));
    node.push_child(Node::token(expression));
    node
}

/// Write capability handed to a hook when the run permits fixes.
///
/// Only valid for the duration of the hook call. Every edit must target the
/// visited node or one of its descendants.
#[derive(Debug)]
pub struct MutationHandle<'a> {
    scope: &'a NodePath,
    edits: &'a mut Vec<Edit>,
}

impl<'a> MutationHandle<'a> {
    pub(crate) fn new(scope: &'a NodePath, edits: &'a mut Vec<Edit>) -> Self {
        Self { scope, edits }
    }

    /// Path of the node under visit.
    #[must_use]
    pub fn scope(&self) -> &NodePath {
        self.scope
    }

    fn check_scope(&self, target: &NodePath) -> Result<(), RuleError> {
        if target.starts_with(self.scope) {
            Ok(())
        } else {
            Err(RuleError::OutOfScope {
                scope: self.scope.as_slice().to_vec(),
                target: target.as_slice().to_vec(),
            })
        }
    }

    /// Replaces the text of the last token under `node`.
    ///
    /// # Errors
    ///
    /// [`RuleError::OutOfScope`] if `node` is outside the visited subtree.
    pub fn replace_last_token(
        &mut self,
        node: &NodeRef<'_>,
        text: impl Into<String>,
    ) -> Result<(), RuleError> {
        self.check_scope(node.path())?;
        self.edits.push(Edit::ReplaceLastToken {
            target: node.path().clone(),
            text: text.into(),
        });
        Ok(())
    }

    /// Sets `= expression` as the default value of `parameter`, replacing
    /// any existing default.
    ///
    /// # Errors
    ///
    /// [`RuleError::OutOfScope`] if `parameter` is outside the visited
    /// subtree.
    pub fn set_default_value(
        &mut self,
        parameter: &ParameterRef<'_>,
        expression: impl Into<String>,
    ) -> Result<(), RuleError> {
        let target = parameter.node().path();
        self.check_scope(target)?;
        self.edits.push(Edit::SetDefaultValue {
            target: target.clone(),
            expression: expression.into(),
        });
        Ok(())
    }

    /// Queues an edit that leaves the visited subtree misplaced.
    #[cfg(test)]
    pub(crate) fn misplace(&mut self, node: &NodeRef<'_>) -> Result<(), RuleError> {
        self.check_scope(node.path())?;
        self.edits.push(Edit::Misplace {
            target: node.path().clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{FileBuilder, FunctionBuilder, Param};

    fn tree() -> crate::SyntaxTree {
        FileBuilder::new()
            .function(FunctionBuilder::new("A").param(Param::new("modifier", "Modifier")))
            .function(FunctionBuilder::new("B"))
            .build()
            .unwrap()
    }

    #[test]
    fn handle_rejects_targets_outside_scope() {
        let tree = tree();
        let functions = tree.file().expect("file").functions();
        let scope = functions[1].node().path().clone();
        let mut edits = Vec::new();
        let mut handle = MutationHandle::new(&scope, &mut edits);
        let parameter = &functions[0].parameters()[0];
        assert!(matches!(
            handle.set_default_value(parameter, "Modifier"),
            Err(RuleError::OutOfScope { .. })
        ));
        assert!(edits.is_empty());
    }

    #[test]
    fn set_default_value_adds_structural_default() {
        let mut tree = tree();
        let function = tree.file().expect("file").functions().remove(0);
        let scope = function.node().path().clone();
        let parameter = function.parameters().remove(0);
        let mut edits = Vec::new();
        MutationHandle::new(&scope, &mut edits)
            .set_default_value(&parameter, "Modifier")
            .expect("in scope");

        let mut copy = tree.node(&scope).cloned().expect("scope");
        let shift = edits
            .remove(0)
            .apply(&mut copy, &scope)
            .expect("edit applies");
        assert_eq!(shift.delta, " = Modifier".len() as isize);
        tree.swap_subtree(&scope, copy).expect("swap");

        assert!(tree.text().starts_with("fun A(modifier: Modifier = Modifier) {"));
        let parameter = tree.file().expect("file").functions()[0].parameters().remove(0);
        assert!(parameter.has_default_value());
        assert_eq!(parameter.default_value().as_deref(), Some("Modifier"));
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn replace_last_token_rewrites_trailing_text() {
        let mut tree = tree();
        let function = tree.file().expect("file").functions().remove(0);
        let scope = function.node().path().clone();
        let parameter = function.parameters().remove(0);
        let mut edits = Vec::new();
        MutationHandle::new(&scope, &mut edits)
            .replace_last_token(parameter.node(), "Modifier?")
            .expect("in scope");
        let mut copy = tree.node(&scope).cloned().expect("scope");
        for edit in edits {
            edit.apply(&mut copy, &scope).expect("edit applies");
        }
        tree.swap_subtree(&scope, copy).expect("swap");
        assert!(tree.text().starts_with("fun A(modifier: Modifier?) {"));
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn set_default_value_on_non_parameter_is_missing_target() {
        let tree = tree();
        let function = tree.file().expect("file").functions().remove(0);
        let scope = function.node().path().clone();
        let edit = Edit::SetDefaultValue {
            target: scope.clone(),
            expression: "Modifier".into(),
        };
        let mut copy = tree.node(&scope).cloned().expect("scope");
        assert!(matches!(
            edit.apply(&mut copy, &scope),
            Err(EditFailure::Rule(RuleError::MissingTarget { .. }))
        ));
    }
}
