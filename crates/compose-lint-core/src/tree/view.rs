//! Read-only navigation and typed views over a [`SyntaxTree`].

use std::collections::BTreeSet;

use super::{
    simple_name, Annotation, CallArgument, CallData, FileData, FunctionData, Node, NodeData,
    NodeKind, NodePath, ParameterData, SyntaxTree, TextRange, TypeData, COMPOSABLE_ANNOTATION,
    MODIFIER_TYPE,
};

/// Declared visibility of a function or type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// No visibility modifier, or `public`.
    Public,
    /// `internal`.
    Internal,
    /// `protected`.
    Protected,
    /// `private`.
    Private,
}

impl Visibility {
    fn from_modifiers(modifiers: &[String]) -> Self {
        modifiers
            .iter()
            .find_map(|modifier| match modifier.as_str() {
                "private" => Some(Self::Private),
                "protected" => Some(Self::Protected),
                "internal" => Some(Self::Internal),
                "public" => Some(Self::Public),
                _ => None,
            })
            .unwrap_or(Self::Public)
    }
}

/// A node together with its position in the tree.
#[derive(Debug, Clone)]
pub struct NodeRef<'t> {
    tree: &'t SyntaxTree,
    node: &'t Node,
    path: NodePath,
}

impl<'t> NodeRef<'t> {
    pub(crate) fn new(tree: &'t SyntaxTree, path: NodePath) -> Option<Self> {
        let node = tree.node(&path)?;
        Some(Self { tree, node, path })
    }

    /// Path from the root to this node.
    #[must_use]
    pub fn path(&self) -> &NodePath {
        &self.path
    }

    /// The underlying node.
    #[must_use]
    pub fn node(&self) -> &'t Node {
        self.node
    }

    /// Node kind.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.node.kind()
    }

    /// Byte range of the node.
    #[must_use]
    pub fn range(&self) -> TextRange {
        self.node.range()
    }

    /// Source text of the node.
    #[must_use]
    pub fn text(&self) -> String {
        self.node.text()
    }

    /// Parent node, `None` for the file root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeRef<'t>> {
        NodeRef::new(self.tree, self.path.parent()?)
    }

    /// All children, tokens included.
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'t>> + 't {
        let tree = self.tree;
        let node: &'t Node = self.node;
        let path = self.path.clone();
        node.children()
            .iter()
            .enumerate()
            .map(move |(index, child)| NodeRef {
                tree,
                node: child,
                path: path.child(index),
            })
    }

    /// Children that are not tokens.
    pub fn child_nodes(&self) -> impl Iterator<Item = NodeRef<'t>> + 't {
        self.children()
            .filter(|child| child.kind() != NodeKind::Token)
    }

    /// First child of the given kind.
    #[must_use]
    pub fn child_of_kind(&self, kind: NodeKind) -> Option<NodeRef<'t>> {
        self.children().find(|child| child.kind() == kind)
    }

    /// Next sibling, tokens included.
    #[must_use]
    pub fn next_sibling(&self) -> Option<NodeRef<'t>> {
        let index = self.path.index()?;
        let parent = self.path.parent()?;
        NodeRef::new(self.tree, parent.child(index + 1))
    }

    /// Previous sibling, tokens included.
    #[must_use]
    pub fn prev_sibling(&self) -> Option<NodeRef<'t>> {
        let index = self.path.index()?.checked_sub(1)?;
        let parent = self.path.parent()?;
        NodeRef::new(self.tree, parent.child(index))
    }

    /// Ancestors from the parent up to the file root.
    pub fn ancestors(&self) -> impl Iterator<Item = NodeRef<'t>> + 't {
        std::iter::successors(self.parent(), NodeRef::parent)
    }

    /// Deepest last token of this subtree.
    #[must_use]
    pub fn last_token(&self) -> Option<NodeRef<'t>> {
        if self.kind() == NodeKind::Token {
            return Some(self.clone());
        }
        let children: Vec<NodeRef<'t>> = self.children().collect();
        children.iter().rev().find_map(NodeRef::last_token)
    }

    /// Text of a token leaf.
    #[must_use]
    pub fn token_text(&self) -> Option<&'t str> {
        self.node.token_text()
    }

    /// Typed view if this is the file root.
    #[must_use]
    pub fn as_file(&self) -> Option<FileRef<'t>> {
        match self.node.data() {
            NodeData::File(data) => Some(FileRef {
                node: self.clone(),
                data,
            }),
            _ => None,
        }
    }

    /// Typed view if this is a type declaration.
    #[must_use]
    pub fn as_type(&self) -> Option<TypeRef<'t>> {
        match self.node.data() {
            NodeData::Type(data) => Some(TypeRef {
                node: self.clone(),
                data,
            }),
            _ => None,
        }
    }

    /// Typed view if this is a function declaration.
    #[must_use]
    pub fn as_function(&self) -> Option<FunctionRef<'t>> {
        match self.node.data() {
            NodeData::Function(data) => Some(FunctionRef {
                node: self.clone(),
                data,
            }),
            _ => None,
        }
    }

    /// Typed view if this is a parameter.
    #[must_use]
    pub fn as_parameter(&self) -> Option<ParameterRef<'t>> {
        match self.node.data() {
            NodeData::Parameter(data) => Some(ParameterRef {
                node: self.clone(),
                data,
            }),
            _ => None,
        }
    }

    /// Typed view if this is a call.
    #[must_use]
    pub fn as_call(&self) -> Option<CallRef<'t>> {
        match self.node.data() {
            NodeData::Call(data) => Some(CallRef {
                node: self.clone(),
                data,
            }),
            _ => None,
        }
    }
}

fn find_annotation<'a>(annotations: &'a [Annotation], name: &str) -> Option<&'a Annotation> {
    annotations
        .iter()
        .find(|annotation| annotation.simple_name() == simple_name(name))
}

/// The file root.
#[derive(Debug, Clone)]
pub struct FileRef<'t> {
    node: NodeRef<'t>,
    data: &'t FileData,
}

impl<'t> FileRef<'t> {
    /// Underlying node.
    #[must_use]
    pub fn node(&self) -> &NodeRef<'t> {
        &self.node
    }

    /// `@file:` annotations.
    #[must_use]
    pub fn annotations(&self) -> &'t [Annotation] {
        &self.data.annotations
    }

    /// Top-level function declarations.
    #[must_use]
    pub fn functions(&self) -> Vec<FunctionRef<'t>> {
        self.node
            .child_nodes()
            .filter_map(|child| child.as_function())
            .collect()
    }

    /// Top-level type declarations.
    #[must_use]
    pub fn types(&self) -> Vec<TypeRef<'t>> {
        self.node
            .child_nodes()
            .filter_map(|child| child.as_type())
            .collect()
    }
}

/// A `class`, `interface` or `object` declaration.
#[derive(Debug, Clone)]
pub struct TypeRef<'t> {
    node: NodeRef<'t>,
    data: &'t TypeData,
}

impl<'t> TypeRef<'t> {
    /// Underlying node.
    #[must_use]
    pub fn node(&self) -> &NodeRef<'t> {
        &self.node
    }

    /// Declared name.
    #[must_use]
    pub fn name(&self) -> &'t str {
        &self.data.name
    }

    /// Whether this is an interface.
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.data.is_interface
    }

    /// Annotations on the declaration.
    #[must_use]
    pub fn annotations(&self) -> &'t [Annotation] {
        &self.data.annotations
    }

    /// Declared visibility.
    #[must_use]
    pub fn visibility(&self) -> Visibility {
        Visibility::from_modifiers(&self.data.modifiers)
    }

    /// Member functions declared directly in the body.
    #[must_use]
    pub fn functions(&self) -> Vec<FunctionRef<'t>> {
        self.node
            .child_nodes()
            .filter_map(|child| child.as_function())
            .collect()
    }
}

/// A function declaration.
#[derive(Debug, Clone)]
pub struct FunctionRef<'t> {
    node: NodeRef<'t>,
    data: &'t FunctionData,
}

impl<'t> FunctionRef<'t> {
    /// Underlying node.
    #[must_use]
    pub fn node(&self) -> &NodeRef<'t> {
        &self.node
    }

    /// Declared name.
    #[must_use]
    pub fn name(&self) -> &'t str {
        &self.data.name
    }

    /// Start offset of the name token, falling back to the node start.
    #[must_use]
    pub fn name_offset(&self) -> usize {
        let tokens: Vec<NodeRef<'t>> = self
            .node
            .children()
            .filter(|child| child.kind() == NodeKind::Token)
            .collect();
        let after_keyword = tokens
            .iter()
            .position(|token| token.token_text() == Some("fun"))
            .map_or(0, |index| index + 1);
        tokens
            .iter()
            .skip(after_keyword)
            .find(|token| token.token_text() == Some(self.name()))
            .map_or(self.node.range().start, |token| token.range().start)
    }

    /// Annotations on the declaration.
    #[must_use]
    pub fn annotations(&self) -> &'t [Annotation] {
        &self.data.annotations
    }

    /// Annotation with the given (simple or qualified) name.
    #[must_use]
    pub fn annotation(&self, name: &str) -> Option<&'t Annotation> {
        find_annotation(&self.data.annotations, name)
    }

    /// Whether the function carries the given annotation.
    #[must_use]
    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotation(name).is_some()
    }

    /// Whether this is a UI-emitting `@Composable` function.
    #[must_use]
    pub fn is_composable(&self) -> bool {
        self.has_annotation(COMPOSABLE_ANNOTATION)
    }

    /// Modifier keywords.
    #[must_use]
    pub fn modifiers(&self) -> &'t [String] {
        &self.data.modifiers
    }

    fn has_modifier(&self, keyword: &str) -> bool {
        self.data.modifiers.iter().any(|modifier| modifier == keyword)
    }

    /// Declared visibility.
    #[must_use]
    pub fn visibility(&self) -> Visibility {
        Visibility::from_modifiers(&self.data.modifiers)
    }

    /// Whether the function is public.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.visibility() == Visibility::Public
    }

    /// Whether the function overrides a supertype member.
    #[must_use]
    pub fn is_override(&self) -> bool {
        self.has_modifier("override")
    }

    /// Whether the function is abstract.
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.has_modifier("abstract")
    }

    /// Whether this is the `actual` side of a multiplatform declaration.
    #[must_use]
    pub fn is_actual(&self) -> bool {
        self.has_modifier("actual")
    }

    /// Whether the function is declared directly inside an interface.
    #[must_use]
    pub fn defined_in_interface(&self) -> bool {
        self.node
            .ancestors()
            .find_map(|ancestor| match ancestor.node().data() {
                NodeData::Type(data) => Some(data.is_interface),
                NodeData::Function(_) => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }

    /// Declared return type, if written.
    #[must_use]
    pub fn return_type(&self) -> Option<&'t str> {
        self.data.return_type.as_deref()
    }

    /// Whether the function returns `Unit`, implicitly or explicitly.
    #[must_use]
    pub fn returns_unit(&self) -> bool {
        self.return_type()
            .map_or(true, |ty| simple_name(ty) == "Unit")
    }

    /// Value parameters in declared order.
    #[must_use]
    pub fn parameters(&self) -> Vec<ParameterRef<'t>> {
        self.parameter_list()
            .map(|list| {
                list.child_nodes()
                    .filter_map(|child| child.as_parameter())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Parameter list node, if present.
    #[must_use]
    pub fn parameter_list(&self) -> Option<NodeRef<'t>> {
        self.node.child_of_kind(NodeKind::ParameterList)
    }

    /// First styling-handle parameter.
    #[must_use]
    pub fn modifier_parameter(&self, aliases: &BTreeSet<String>) -> Option<ParameterRef<'t>> {
        self.parameters()
            .into_iter()
            .find(|parameter| parameter.is_modifier(aliases))
    }

    /// Top-level statements of the block body.
    #[must_use]
    pub fn body_statements(&self) -> Vec<NodeRef<'t>> {
        self.node
            .child_of_kind(NodeKind::Body)
            .map(|body| body.child_nodes().collect())
            .unwrap_or_default()
    }
}

/// A value parameter.
#[derive(Debug, Clone)]
pub struct ParameterRef<'t> {
    node: NodeRef<'t>,
    data: &'t ParameterData,
}

impl<'t> ParameterRef<'t> {
    /// Underlying node.
    #[must_use]
    pub fn node(&self) -> &NodeRef<'t> {
        &self.node
    }

    /// Parameter name.
    #[must_use]
    pub fn name(&self) -> &'t str {
        &self.data.name
    }

    /// Declared type as written.
    #[must_use]
    pub fn type_name(&self) -> &'t str {
        &self.data.type_name
    }

    /// Whether the parameter declares a default value.
    #[must_use]
    pub fn has_default_value(&self) -> bool {
        self.default_value_node().is_some()
    }

    /// `= expression` node, if any.
    #[must_use]
    pub fn default_value_node(&self) -> Option<NodeRef<'t>> {
        self.node.child_of_kind(NodeKind::DefaultValue)
    }

    /// Default value expression without the `=`.
    #[must_use]
    pub fn default_value(&self) -> Option<String> {
        let node = self.default_value_node()?;
        let text = node.text();
        let expression = text.trim_start().strip_prefix('=').unwrap_or(&text);
        Some(expression.trim().to_string())
    }

    /// Declared type with nullability, type arguments and qualifier removed.
    #[must_use]
    pub fn simple_type_name(&self) -> &'t str {
        let ty = self.data.type_name.trim();
        let ty = ty.strip_suffix('?').unwrap_or(ty);
        let ty = ty.split('<').next().unwrap_or(ty);
        simple_name(ty)
    }

    /// Whether the declared type is the styling handle or one of `aliases`.
    #[must_use]
    pub fn is_modifier(&self, aliases: &BTreeSet<String>) -> bool {
        let ty = self.simple_type_name();
        ty == MODIFIER_TYPE || aliases.iter().any(|alias| simple_name(alias) == ty)
    }

    /// Whether the declared type is a function type (`() -> Unit`).
    #[must_use]
    pub fn is_function_type(&self) -> bool {
        self.data.type_name.contains("->")
    }
}

/// A call expression statement.
#[derive(Debug, Clone)]
pub struct CallRef<'t> {
    node: NodeRef<'t>,
    data: &'t CallData,
}

impl<'t> CallRef<'t> {
    /// Underlying node.
    #[must_use]
    pub fn node(&self) -> &NodeRef<'t> {
        &self.node
    }

    /// Callee name without receiver or package qualifier.
    #[must_use]
    pub fn callee(&self) -> &'t str {
        simple_name(&self.data.callee)
    }

    /// Arguments inside the parentheses.
    #[must_use]
    pub fn arguments(&self) -> &'t [CallArgument] {
        &self.data.arguments
    }

    /// Whether a trailing lambda follows the call.
    #[must_use]
    pub fn has_trailing_lambda(&self) -> bool {
        self.data.trailing_lambda
    }
}
