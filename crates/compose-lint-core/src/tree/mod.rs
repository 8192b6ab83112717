//! Lossless syntax tree consumed by the rule engine.
//!
//! A [`SyntaxTree`] owns a single `File` root and every [`Node`] owns its
//! children. Leaves are [`NodeKind::Token`] nodes holding their exact source
//! text, so concatenating tokens in pre-order reproduces the file. Ranges
//! are byte offsets into that text.
//!
//! The tree is read-only for rules. The only way to change it is through a
//! [`MutationHandle`](crate::MutationHandle), whose edits the driver applies
//! with [`Node::edit_at`] and [`SyntaxTree::swap_subtree`].

mod builder;
mod line_index;
mod view;

pub use builder::TreeBuilder;
pub use line_index::LineIndex;
pub use view::{CallRef, FileRef, FunctionRef, NodeRef, ParameterRef, TypeRef, Visibility};

use crate::error::{RuleError, TraversalError};

/// Annotation marking a UI-emitting (composable) function.
pub const COMPOSABLE_ANNOTATION: &str = "Composable";

/// Canonical styling-handle type, also used as its empty default value.
pub const MODIFIER_TYPE: &str = "Modifier";

/// Kind of a syntax node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Root of a source file.
    File,
    /// `class`, `interface` or `object` declaration.
    TypeDeclaration,
    /// `fun` declaration.
    FunctionDeclaration,
    /// Parenthesized parameter list of a function.
    ParameterList,
    /// A single value parameter.
    Parameter,
    /// `= expression` part of a parameter.
    DefaultValue,
    /// Block body of a function.
    Body,
    /// Call expression statement.
    Call,
    /// Leaf holding source text.
    Token,
    /// Anything else.
    Other,
}

/// Byte range `[start, end)` in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextRange {
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
}

impl TextRange {
    /// Creates a new range.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in bytes.
    #[must_use]
    pub const fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the range is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start >= self.end
    }

    /// Whether `offset` lies inside the range.
    #[must_use]
    pub const fn contains(self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    fn shifted(self, delta: isize) -> Option<Self> {
        Some(Self {
            start: self.start.checked_add_signed(delta)?,
            end: self.end.checked_add_signed(delta)?,
        })
    }
}

/// An annotation such as `@Composable` or `@Suppress("rule")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Annotation name, possibly package-qualified.
    pub name: String,
    /// String literal arguments, unquoted.
    pub arguments: Vec<String>,
}

impl Annotation {
    /// Creates an annotation without arguments.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// Adds a string argument.
    #[must_use]
    pub fn with_argument(mut self, argument: impl Into<String>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    /// Name without package qualifier.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }
}

/// Argument of a call expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallArgument {
    /// Argument name for named arguments.
    pub name: Option<String>,
    /// Argument expression text.
    pub text: String,
}

impl CallArgument {
    /// Creates a positional argument.
    #[must_use]
    pub fn positional(text: impl Into<String>) -> Self {
        Self {
            name: None,
            text: text.into(),
        }
    }

    /// Creates a named argument.
    #[must_use]
    pub fn named(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            text: text.into(),
        }
    }
}

/// Payload of a `File` node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileData {
    /// `@file:` annotations.
    pub annotations: Vec<Annotation>,
}

/// Payload of a `TypeDeclaration` node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeData {
    /// Declared name.
    pub name: String,
    /// Whether this is an `interface`.
    pub is_interface: bool,
    /// Modifier keywords (`abstract`, `private`, ...).
    pub modifiers: Vec<String>,
    /// Annotations on the declaration.
    pub annotations: Vec<Annotation>,
}

/// Payload of a `FunctionDeclaration` node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FunctionData {
    /// Declared name.
    pub name: String,
    /// Annotations on the declaration.
    pub annotations: Vec<Annotation>,
    /// Modifier keywords (`override`, `internal`, ...).
    pub modifiers: Vec<String>,
    /// Declared return type, if written.
    pub return_type: Option<String>,
}

/// Payload of a `Parameter` node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParameterData {
    /// Parameter name.
    pub name: String,
    /// Declared type as written.
    pub type_name: String,
}

/// Payload of a `Call` node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallData {
    /// Callee expression as written (`Row`, `foundation.layout.Row`).
    pub callee: String,
    /// Arguments inside the parentheses.
    pub arguments: Vec<CallArgument>,
    /// Whether a trailing lambda follows the call.
    pub trailing_lambda: bool,
}

/// Kind-specific node payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// No payload.
    None,
    /// Token text.
    Token(String),
    /// File payload.
    File(FileData),
    /// Type declaration payload.
    Type(TypeData),
    /// Function declaration payload.
    Function(FunctionData),
    /// Parameter payload.
    Parameter(ParameterData),
    /// Call payload.
    Call(CallData),
}

impl NodeData {
    /// Whether this payload may be attached to a node of `kind`.
    #[must_use]
    pub fn fits(&self, kind: NodeKind) -> bool {
        match self {
            Self::None => !matches!(
                kind,
                NodeKind::Token
                    | NodeKind::File
                    | NodeKind::TypeDeclaration
                    | NodeKind::FunctionDeclaration
                    | NodeKind::Parameter
                    | NodeKind::Call
            ),
            Self::Token(_) => kind == NodeKind::Token,
            Self::File(_) => kind == NodeKind::File,
            Self::Type(_) => kind == NodeKind::TypeDeclaration,
            Self::Function(_) => kind == NodeKind::FunctionDeclaration,
            Self::Parameter(_) => kind == NodeKind::Parameter,
            Self::Call(_) => kind == NodeKind::Call,
        }
    }
}

/// A syntax node. Owns its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    kind: NodeKind,
    range: TextRange,
    data: NodeData,
    children: Vec<Node>,
}

impl Node {
    /// Creates an interior node without children.
    #[must_use]
    pub fn new(kind: NodeKind, data: NodeData) -> Self {
        Self {
            kind,
            range: TextRange::default(),
            data,
            children: Vec::new(),
        }
    }

    /// Creates a token leaf.
    #[must_use]
    pub fn token(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Token, NodeData::Token(text.into()))
    }

    /// Node kind.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Byte range of the node.
    #[must_use]
    pub fn range(&self) -> TextRange {
        self.range
    }

    /// Kind-specific payload.
    #[must_use]
    pub fn data(&self) -> &NodeData {
        &self.data
    }

    /// Children in source order.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Text of a token leaf.
    #[must_use]
    pub fn token_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Token(text) => Some(text),
            _ => None,
        }
    }

    /// Source text covered by this node.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::with_capacity(self.range.len());
        self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) {
        match &self.data {
            NodeData::Token(text) => out.push_str(text),
            _ => {
                for child in &self.children {
                    child.write_text(out);
                }
            }
        }
    }

    pub(crate) fn push_child(&mut self, child: Node) {
        self.children.push(child);
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    pub(crate) fn set_token_text(&mut self, text: String) -> bool {
        match &mut self.data {
            NodeData::Token(current) => {
                *current = text;
                true
            }
            _ => false,
        }
    }

    /// Deepest last token of this subtree.
    pub(crate) fn last_token_mut(&mut self) -> Option<&mut Node> {
        if self.kind == NodeKind::Token {
            return Some(self);
        }
        self.children
            .iter_mut()
            .rev()
            .find_map(Node::last_token_mut)
    }

    fn descendant(&self, path: &[usize]) -> Option<&Node> {
        path.iter()
            .try_fold(self, |node, &index| node.children.get(index))
    }

    fn descendant_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        path.iter()
            .try_fold(self, |node, &index| node.children.get_mut(index))
    }

    /// Lays out this subtree starting at `start`; returns the end offset.
    pub(crate) fn relayout(&mut self, start: usize) -> usize {
        let end = match &self.data {
            NodeData::Token(text) => start + text.len(),
            _ => self
                .children
                .iter_mut()
                .fold(start, |position, child| child.relayout(position)),
        };
        self.range = TextRange::new(start, end);
        end
    }

    fn shift(&mut self, delta: isize) -> Result<(), TraversalError> {
        self.range = self
            .range
            .shifted(delta)
            .ok_or(TraversalError::OffsetOverflow {
                at: self.range.start,
            })?;
        for child in &mut self.children {
            child.shift(delta)?;
        }
        Ok(())
    }

    /// Applies `edit` to the descendant at `path` (relative to `self`),
    /// re-lays it out in place and shifts every following node.
    pub(crate) fn edit_at(
        &mut self,
        path: &[usize],
        edit: impl FnOnce(&mut Node) -> Result<(), RuleError>,
    ) -> Result<Shift, EditFailure> {
        let target = self
            .descendant_mut(path)
            .ok_or_else(|| EditFailure::Rule(RuleError::MissingTarget { target: path.to_vec() }))?;
        let old = target.range;
        edit(target).map_err(EditFailure::Rule)?;
        let new_end = target.relayout(old.start);
        let delta = offset_delta(old.end, new_end)?;
        if !path.is_empty() {
            shift_following(self, path, delta)?;
        }
        Ok(Shift { at: old.end, delta })
    }

    /// Checks that children are ordered and contained in this node.
    fn check_children(&self) -> Result<(), TraversalError> {
        let mut previous_end = self.range.start;
        for child in &self.children {
            let range = child.range;
            if range.start < previous_end || range.end < range.start || range.end > self.range.end
            {
                return Err(TraversalError::NonMonotonic {
                    offset: range.start,
                    detail: format!(
                        "{:?} child {}..{} inside {:?} {}..{} after {}",
                        child.kind,
                        range.start,
                        range.end,
                        self.kind,
                        self.range.start,
                        self.range.end,
                        previous_end,
                    ),
                });
            }
            previous_end = range.end;
        }
        Ok(())
    }

    fn check_subtree(&self) -> Result<(), TraversalError> {
        self.check_children()?;
        self.children.iter().try_for_each(Node::check_subtree)
    }
}

/// Offset change caused by one edit: every offset `>= at` moved by `delta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Shift {
    pub(crate) at: usize,
    pub(crate) delta: isize,
}

/// Why an edit could not be applied.
#[derive(Debug)]
pub(crate) enum EditFailure {
    /// The edit itself was invalid; the tree copy is discarded.
    Rule(RuleError),
    /// Offsets became inconsistent.
    Traversal(TraversalError),
}

impl From<TraversalError> for EditFailure {
    fn from(error: TraversalError) -> Self {
        Self::Traversal(error)
    }
}

fn offset_delta(old_end: usize, new_end: usize) -> Result<isize, TraversalError> {
    let overflow = TraversalError::OffsetOverflow { at: old_end };
    let old = isize::try_from(old_end).map_err(|_| overflow.clone())?;
    let new = isize::try_from(new_end).map_err(|_| overflow)?;
    Ok(new - old)
}

/// Grows every ancestor on `path` by `delta` and shifts the siblings that
/// follow the path at each level. The node at the end of `path` is left
/// untouched.
fn shift_following(node: &mut Node, path: &[usize], delta: isize) -> Result<(), TraversalError> {
    let Some((&index, rest)) = path.split_first() else {
        return Ok(());
    };
    node.range.end = node
        .range
        .end
        .checked_add_signed(delta)
        .ok_or(TraversalError::OffsetOverflow { at: node.range.end })?;
    for sibling in node.children.iter_mut().skip(index + 1) {
        sibling.shift(delta)?;
    }
    match node.children.get_mut(index) {
        Some(child) => shift_following(child, rest, delta),
        None => Err(TraversalError::MissingNode {
            path: path.to_vec(),
        }),
    }
}

/// Path of child indices from the root to a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// Path of the root node.
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Path of the `index`-th child of this node.
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Path of the parent node, `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, parent) = self.0.split_last()?;
        Some(Self(parent.to_vec()))
    }

    /// Index of this node among its siblings.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Whether `self` is `ancestor` or lies inside it.
    #[must_use]
    pub fn starts_with(&self, ancestor: &NodePath) -> bool {
        self.0.starts_with(&ancestor.0)
    }

    /// Remaining indices after `ancestor`.
    #[must_use]
    pub fn relative_to(&self, ancestor: &NodePath) -> Option<&[usize]> {
        self.0.strip_prefix(ancestor.0.as_slice())
    }

    /// Raw indices.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub(crate) fn push(&mut self, index: usize) {
        self.0.push(index);
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

/// A parsed source file. Root-owned by whoever drives the traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    root: Node,
}

impl SyntaxTree {
    /// Wraps a `File` node, laying out offsets from 0.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::RootNotFile`](crate::TreeError::RootNotFile) if
    /// `root` is not a `File` node.
    pub fn new(mut root: Node) -> Result<Self, crate::TreeError> {
        if root.kind != NodeKind::File {
            return Err(crate::TreeError::RootNotFile { kind: root.kind });
        }
        root.relayout(0);
        Ok(Self { root })
    }

    /// The `File` root.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Full source text.
    #[must_use]
    pub fn text(&self) -> String {
        self.root.text()
    }

    /// Length of the source text in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.root.range.end
    }

    /// Whether the file is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Node at `path`.
    #[must_use]
    pub fn node(&self, path: &NodePath) -> Option<&Node> {
        self.root.descendant(path.as_slice())
    }

    /// Navigable reference to the node at `path`.
    #[must_use]
    pub fn node_ref(&self, path: NodePath) -> Option<NodeRef<'_>> {
        NodeRef::new(self, path)
    }

    /// Typed view of the root.
    #[must_use]
    pub fn file(&self) -> Option<FileRef<'_>> {
        self.node_ref(NodePath::root())?.as_file()
    }

    /// Replaces the node at `path` with `replacement`, which must already
    /// be laid out from the old node's start offset, then shifts all
    /// following nodes and re-checks ordering around the path.
    pub(crate) fn swap_subtree(
        &mut self,
        path: &NodePath,
        replacement: Node,
    ) -> Result<(), TraversalError> {
        let missing = || TraversalError::MissingNode {
            path: path.as_slice().to_vec(),
        };
        let target = self.root.descendant_mut(path.as_slice()).ok_or_else(missing)?;
        let old = target.range;
        if replacement.range.start != old.start {
            return Err(TraversalError::NonMonotonic {
                offset: old.start,
                detail: format!(
                    "replacement starts at {} instead of {}",
                    replacement.range.start, old.start
                ),
            });
        }
        let delta = offset_delta(old.end, replacement.range.end)?;
        *target = replacement;
        shift_following(&mut self.root, path.as_slice(), delta)?;
        self.check_around(path)
    }

    /// Checks ordering along `path`: every ancestor's children and the
    /// whole subtree at `path`.
    fn check_around(&self, path: &NodePath) -> Result<(), TraversalError> {
        let mut node = &self.root;
        node.check_children()?;
        for &index in path.as_slice() {
            node = node.children.get(index).ok_or_else(|| TraversalError::MissingNode {
                path: path.as_slice().to_vec(),
            })?;
            node.check_children()?;
        }
        node.check_subtree()
    }

    /// Checks offset monotonicity over the whole tree.
    ///
    /// # Errors
    ///
    /// Returns [`TraversalError::NonMonotonic`] at the first inconsistency.
    pub fn validate(&self) -> Result<(), TraversalError> {
        if self.root.range.start != 0 {
            return Err(TraversalError::NonMonotonic {
                offset: self.root.range.start,
                detail: "file does not start at offset 0".to_string(),
            });
        }
        self.root.check_subtree()
    }
}

/// Name without package qualifier: `a.b.Modifier` -> `Modifier`.
#[must_use]
pub fn simple_name(name: &str) -> &str {
    let name = name.trim();
    name.rsplit('.').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parameter(name: &str, ty: &str) -> Node {
        let mut node = Node::new(
            NodeKind::Parameter,
            NodeData::Parameter(ParameterData {
                name: name.into(),
                type_name: ty.into(),
            }),
        );
        for text in [name, ":", " ", ty] {
            node.push_child(Node::token(text));
        }
        node
    }

    fn sample_tree() -> SyntaxTree {
        let mut list = Node::new(NodeKind::ParameterList, NodeData::None);
        list.push_child(Node::token("("));
        list.push_child(parameter("a", "Int"));
        list.push_child(Node::token(", "));
        list.push_child(parameter("m", "Modifier"));
        list.push_child(Node::token(")"));
        let mut function = Node::new(
            NodeKind::FunctionDeclaration,
            NodeData::Function(FunctionData {
                name: "f".into(),
                ..FunctionData::default()
            }),
        );
        for text in ["fun", " ", "f"] {
            function.push_child(Node::token(text));
        }
        function.push_child(list);
        let mut file = Node::new(NodeKind::File, NodeData::File(FileData::default()));
        file.push_child(function);
        file.push_child(Node::token("\n// end\n"));
        SyntaxTree::new(file).expect("file root")
    }

    #[test]
    fn layout_is_lossless_and_monotonic() {
        let tree = sample_tree();
        assert_eq!(tree.text(), "fun f(a: Int, m: Modifier)\n// end\n");
        assert_eq!(tree.len(), tree.text().len());
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn rejects_non_file_root() {
        let result = SyntaxTree::new(Node::token("x"));
        assert!(matches!(
            result,
            Err(crate::TreeError::RootNotFile {
                kind: NodeKind::Token
            })
        ));
    }

    #[test]
    fn edit_shifts_following_siblings_and_ancestors() {
        let mut tree = sample_tree();
        let function_path = NodePath::from(vec![0]);
        let mut copy = tree.node(&function_path).cloned().expect("function");
        // function -> parameter list (3) -> first parameter (1)
        let shift = copy
            .edit_at(&[3, 1], |node| {
                let token = node.last_token_mut().expect("token");
                token.set_token_text("Long".into());
                Ok(())
            })
            .expect("edit applies");
        assert_eq!(shift.delta, 1);
        tree.swap_subtree(&function_path, copy).expect("swap");

        assert_eq!(tree.text(), "fun f(a: Long, m: Modifier)\n// end\n");
        assert!(tree.validate().is_ok());
        let trailer = tree.node(&NodePath::from(vec![1])).expect("trailer");
        assert_eq!(trailer.range().start, "fun f(a: Long, m: Modifier)".len());
        assert_eq!(tree.len(), tree.text().len());
    }

    #[test]
    fn edit_on_missing_target_is_a_rule_error() {
        let tree = sample_tree();
        let mut copy = tree.root().clone();
        let result = copy.edit_at(&[7, 7], |_| Ok(()));
        assert!(matches!(
            result,
            Err(EditFailure::Rule(RuleError::MissingTarget { .. }))
        ));
    }

    #[test]
    fn swap_rejects_misplaced_replacement() {
        let mut tree = sample_tree();
        let mut replacement = tree.node(&NodePath::from(vec![0])).cloned().expect("node");
        replacement.relayout(3);
        let result = tree.swap_subtree(&NodePath::from(vec![0]), replacement);
        assert!(matches!(result, Err(TraversalError::NonMonotonic { .. })));
    }

    #[test]
    fn node_path_navigation() {
        let path = NodePath::root().child(2).child(5);
        assert_eq!(path.index(), Some(5));
        assert_eq!(path.parent(), Some(NodePath::from(vec![2])));
        assert!(path.starts_with(&NodePath::from(vec![2])));
        assert_eq!(path.relative_to(&NodePath::from(vec![2])), Some(&[5][..]));
        assert!(NodePath::root().parent().is_none());
    }

    #[test]
    fn simple_name_strips_qualifier() {
        assert_eq!(simple_name("androidx.compose.ui.Modifier"), "Modifier");
        assert_eq!(simple_name("Modifier"), "Modifier");
    }
}
