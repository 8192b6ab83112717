//! Single-file traversal: dispatches nodes to rule hooks and applies their
//! edits.
//!
//! The walk is pre-order over child indices. A node's hooks run before its
//! children are visited, and the child count is re-read at every step, so a
//! subtree rewritten by a hook is walked in its rewritten form and nothing
//! already visited is visited again.

use std::any::Any;
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{debug, trace, warn};

use crate::emitter::{Emitter, Finding, Findings};
use crate::error::{RuleError, TraversalError};
use crate::mutation::{Edit, MutationHandle};
use crate::rule::{Hook, Hooks, RuleVisitor};
use crate::tree::{Annotation, EditFailure, NodeData, NodeKind, NodePath, SyntaxTree};

const SUPPRESS_ANNOTATION: &str = "Suppress";

/// Where the driver is in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TraversalState {
    Idle,
    InFile,
    InType,
    InFunction,
    InParameterScope,
    Done,
}

/// A rule prepared for one file.
pub(crate) struct ActiveRule {
    /// Registration index, used for ordering ties.
    pub(crate) index: usize,
    pub(crate) name: &'static str,
    pub(crate) hooks: Hooks,
    pub(crate) visitor: Box<dyn RuleVisitor>,
}

/// What a finished traversal leaves behind.
pub(crate) struct Traversal<'t> {
    pub(crate) tree: Cow<'t, SyntaxTree>,
    pub(crate) findings: Vec<Finding>,
    pub(crate) aborted: Option<TraversalError>,
}

/// Facts about a node read before its hooks run, so no borrow of the tree
/// is held while a hook may rewrite it.
struct Visit {
    kind: NodeKind,
    suppressions: BTreeSet<String>,
    composable: bool,
}

pub(crate) struct Driver<'t> {
    tree: Cow<'t, SyntaxTree>,
    rules: Vec<ActiveRule>,
    findings: Findings,
    fix: bool,
    state: TraversalState,
}

impl<'t> Driver<'t> {
    pub(crate) fn new(tree: Cow<'t, SyntaxTree>, rules: Vec<ActiveRule>, fix: bool) -> Self {
        Self {
            tree,
            rules,
            findings: Findings::default(),
            fix,
            state: TraversalState::Idle,
        }
    }

    pub(crate) fn run(mut self) -> Traversal<'t> {
        let aborted = self.walk().err();
        if let Some(error) = &aborted {
            warn!(%error, "traversal aborted, keeping findings emitted so far");
        }
        self.transition(TraversalState::Done);
        Traversal {
            tree: self.tree,
            findings: self.findings.into_vec(),
            aborted,
        }
    }

    fn transition(&mut self, next: TraversalState) {
        trace!(from = ?self.state, to = ?next, "driver state");
        self.state = next;
    }

    fn walk(&mut self) -> Result<(), TraversalError> {
        let root = NodePath::root();
        let visit = self.inspect(&root)?;
        self.transition(TraversalState::InFile);
        self.dispatch(Hook::File, &root, &visit.suppressions)?;
        self.walk_children(&root, &visit.suppressions)
    }

    fn inspect(&self, path: &NodePath) -> Result<Visit, TraversalError> {
        let node = self.tree.node(path).ok_or_else(|| TraversalError::MissingNode {
            path: path.as_slice().to_vec(),
        })?;
        let annotations: &[Annotation] = match node.data() {
            NodeData::File(data) => &data.annotations,
            NodeData::Type(data) => &data.annotations,
            NodeData::Function(data) => &data.annotations,
            _ => &[],
        };
        let composable = match node.data() {
            NodeData::Function(_) => self
                .tree
                .node_ref(path.clone())
                .and_then(|node| node.as_function())
                .is_some_and(|function| function.is_composable()),
            _ => false,
        };
        Ok(Visit {
            kind: node.kind(),
            suppressions: suppressed_rules(annotations),
            composable,
        })
    }

    fn walk_children(
        &mut self,
        parent: &NodePath,
        suppressed: &BTreeSet<String>,
    ) -> Result<(), TraversalError> {
        let mut index = 0;
        loop {
            let path = parent.child(index);
            index += 1;
            let Some(node) = self.tree.node(&path) else {
                return Ok(());
            };
            match node.kind() {
                NodeKind::Token => {}
                NodeKind::TypeDeclaration | NodeKind::FunctionDeclaration => {
                    self.walk_declaration(&path, suppressed)?;
                }
                NodeKind::ParameterList => {
                    let enclosing = self.state;
                    self.transition(TraversalState::InParameterScope);
                    self.walk_children(&path, suppressed)?;
                    self.transition(enclosing);
                }
                _ => self.walk_children(&path, suppressed)?,
            }
        }
    }

    fn walk_declaration(
        &mut self,
        path: &NodePath,
        outer: &BTreeSet<String>,
    ) -> Result<(), TraversalError> {
        let visit = self.inspect(path)?;
        let mut suppressed = visit.suppressions;
        suppressed.extend(outer.iter().cloned());

        let enclosing = self.state;
        if visit.kind == NodeKind::TypeDeclaration {
            self.transition(TraversalState::InType);
            self.dispatch(Hook::Type, path, &suppressed)?;
        } else {
            self.transition(TraversalState::InFunction);
            self.dispatch(Hook::Function, path, &suppressed)?;
            if visit.composable {
                self.dispatch(Hook::Composable, path, &suppressed)?;
            }
        }
        self.walk_children(path, &suppressed)?;
        self.transition(enclosing);
        Ok(())
    }

    fn dispatch(
        &mut self,
        hook: Hook,
        path: &NodePath,
        suppressed: &BTreeSet<String>,
    ) -> Result<(), TraversalError> {
        for position in 0..self.rules.len() {
            let rule = &self.rules[position];
            if !rule.hooks.contains(hook) {
                continue;
            }
            if suppressed.contains(rule.name) {
                debug!(rule = rule.name, ?hook, path = ?path.as_slice(), "rule suppressed");
                continue;
            }
            self.invoke(position, hook, path)?;
        }
        Ok(())
    }

    fn invoke(
        &mut self,
        position: usize,
        hook: Hook,
        path: &NodePath,
    ) -> Result<(), TraversalError> {
        let tree: &SyntaxTree = &self.tree;
        let node = tree
            .node_ref(path.clone())
            .ok_or_else(|| TraversalError::MissingNode {
                path: path.as_slice().to_vec(),
            })?;
        let offset = node.range().start;
        let rule = &mut self.rules[position];
        let rule_index = rule.index;
        let rule_name = rule.name;
        let from = self.findings.len();
        let mut edits: Vec<Edit> = Vec::new();

        let outcome = {
            let mut emitter = Emitter::new(&mut self.findings, rule_index);
            let mut handle = MutationHandle::new(path, &mut edits);
            let fix = if self.fix { Some(&mut handle) } else { None };
            let visitor = &mut rule.visitor;
            let mismatch = || {
                RuleError::malformed(offset, format!("{hook:?} hook on {:?} node", node.kind()))
            };
            catch_unwind(AssertUnwindSafe(|| match hook {
                Hook::File => match node.as_file() {
                    Some(file) => visitor.visit_file(&file, &mut emitter, fix),
                    None => Err(mismatch()),
                },
                Hook::Type => match node.as_type() {
                    Some(declaration) => visitor.visit_type(&declaration, &mut emitter, fix),
                    None => Err(mismatch()),
                },
                Hook::Function => match node.as_function() {
                    Some(function) => visitor.visit_function(&function, &mut emitter, fix),
                    None => Err(mismatch()),
                },
                Hook::Composable => match node.as_function() {
                    Some(function) => visitor.visit_composable(&function, &mut emitter, fix),
                    None => Err(mismatch()),
                },
            }))
        };

        match outcome {
            Ok(Ok(())) if edits.is_empty() => Ok(()),
            Ok(Ok(())) => self.apply_edits(rule_index, rule_name, path, edits, from),
            Ok(Err(error)) => {
                warn!(rule = rule_name, %error, "rule failed, discarding its edits");
                self.record_failure(rule_index, offset, &error.to_string());
                Ok(())
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(rule = rule_name, panic = %message, "rule panicked, discarding its edits");
                self.record_failure(rule_index, offset, &message);
                Ok(())
            }
        }
    }

    /// Applies one hook's edits to a copy of the visited subtree and swaps
    /// it in. A rejected edit discards all of them.
    fn apply_edits(
        &mut self,
        rule_index: usize,
        rule_name: &str,
        path: &NodePath,
        edits: Vec<Edit>,
        from: usize,
    ) -> Result<(), TraversalError> {
        let Some(scope) = self.tree.node(path) else {
            return Err(TraversalError::MissingNode {
                path: path.as_slice().to_vec(),
            });
        };
        let offset = scope.range().start;
        let mut copy = scope.clone();
        let mut shifts = Vec::with_capacity(edits.len());
        for edit in edits {
            match edit.apply(&mut copy, path) {
                Ok(shift) => shifts.push(shift),
                Err(EditFailure::Rule(error)) => {
                    warn!(rule = rule_name, %error, "edit rejected, discarding the rule's edits");
                    self.record_failure(rule_index, offset, &error.to_string());
                    return Ok(());
                }
                Err(EditFailure::Traversal(error)) => return Err(error),
            }
        }
        self.tree.to_mut().swap_subtree(path, copy)?;
        for shift in &shifts {
            self.findings.shift(shift.at, shift.delta);
        }
        self.findings.mark_fixed(from);
        trace!(rule = rule_name, edits = shifts.len(), path = ?path.as_slice(), "edits applied");
        Ok(())
    }

    fn record_failure(&mut self, rule_index: usize, offset: usize, detail: &str) {
        self.findings
            .push(rule_index, offset, format!("rule-failure: {detail}"), false);
    }
}

/// Rule ids named in `@Suppress(...)` annotations.
fn suppressed_rules(annotations: &[Annotation]) -> BTreeSet<String> {
    annotations
        .iter()
        .filter(|annotation| annotation.simple_name() == SUPPRESS_ANNOTATION)
        .flat_map(|annotation| annotation.arguments.iter().cloned())
        .collect()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "rule panicked".to_string())
}
