//! Builders that render Kotlin-shaped source together with its tree.
//!
//! Parser adapters and tests use these to produce trees with the same
//! layout a real parse would give, without depending on a grammar.
//!
//! ```
//! use compose_lint_core::fixture::{FileBuilder, FunctionBuilder, Param, Statement};
//!
//! let tree = FileBuilder::new()
//!     .function(
//!         FunctionBuilder::new("Greeting")
//!             .composable()
//!             .param(Param::new("modifier", "Modifier").default_value("Modifier"))
//!             .statement(Statement::call("Text").arg("\"hi\"")),
//!     )
//!     .build()?;
//! assert_eq!(
//!     tree.text(),
//!     "@Composable\nfun Greeting(modifier: Modifier = Modifier) {\n    Text(\"hi\")\n}\n"
//! );
//! # Ok::<(), compose_lint_core::TreeError>(())
//! ```

use std::path::PathBuf;

use crate::context::SourceFile;
use crate::error::TreeError;
use crate::tree::{
    Annotation, CallArgument, CallData, FileData, FunctionData, NodeData, NodeKind, ParameterData,
    SyntaxTree, TreeBuilder, TypeData, COMPOSABLE_ANNOTATION,
};

const INDENT: &str = "    ";

fn render_annotation(prefix: &str, annotation: &Annotation) -> String {
    if annotation.arguments.is_empty() {
        format!("@{prefix}{}", annotation.name)
    } else {
        let arguments = annotation
            .arguments
            .iter()
            .map(|argument| format!("\"{argument}\""))
            .collect::<Vec<_>>()
            .join(", ");
        format!("@{prefix}{}({arguments})", annotation.name)
    }
}

/// Top-level declaration of a file.
#[derive(Debug, Clone)]
enum Item {
    Function(FunctionBuilder),
    Type(TypeBuilder),
}

/// Builds a whole source file.
#[derive(Debug, Clone, Default)]
pub struct FileBuilder {
    annotations: Vec<Annotation>,
    items: Vec<Item>,
}

impl FileBuilder {
    /// Creates an empty file.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `@file:Suppress("<rule>")`.
    #[must_use]
    pub fn suppress(mut self, rule: impl Into<String>) -> Self {
        self.annotations
            .push(Annotation::new("Suppress").with_argument(rule));
        self
    }

    /// Adds a top-level function.
    #[must_use]
    pub fn function(mut self, function: FunctionBuilder) -> Self {
        self.items.push(Item::Function(function));
        self
    }

    /// Adds a top-level type declaration.
    #[must_use]
    pub fn type_decl(mut self, declaration: TypeBuilder) -> Self {
        self.items.push(Item::Type(declaration));
        self
    }

    /// Renders the tree.
    ///
    /// # Errors
    ///
    /// Returns the [`TreeError`] reported by the underlying [`TreeBuilder`].
    pub fn build(self) -> Result<SyntaxTree, TreeError> {
        let mut builder = TreeBuilder::new();
        builder.start_node(
            NodeKind::File,
            NodeData::File(FileData {
                annotations: self.annotations.clone(),
            }),
        );
        for annotation in &self.annotations {
            builder.token(render_annotation("file:", annotation));
            builder.token("\n");
        }
        if !self.annotations.is_empty() {
            builder.token("\n");
        }
        for item in &self.items {
            match item {
                Item::Function(function) => function.emit(&mut builder, ""),
                Item::Type(declaration) => declaration.emit(&mut builder),
            }
            builder.token("\n");
        }
        builder.finish_node();
        builder.finish()
    }

    /// Renders the tree as a [`SourceFile`] at `path`.
    ///
    /// # Errors
    ///
    /// Same as [`FileBuilder::build`].
    pub fn source(self, path: impl Into<PathBuf>) -> Result<SourceFile, TreeError> {
        Ok(SourceFile::new(path, self.build()?))
    }
}

/// Builds a `class` or `interface` declaration.
#[derive(Debug, Clone)]
pub struct TypeBuilder {
    data: TypeData,
    functions: Vec<FunctionBuilder>,
}

impl TypeBuilder {
    /// A `class` declaration.
    #[must_use]
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            data: TypeData {
                name: name.into(),
                ..TypeData::default()
            },
            functions: Vec::new(),
        }
    }

    /// An `interface` declaration.
    #[must_use]
    pub fn interface(name: impl Into<String>) -> Self {
        let mut builder = Self::class(name);
        builder.data.is_interface = true;
        builder
    }

    /// Adds an annotation.
    #[must_use]
    pub fn annotation(mut self, name: impl Into<String>) -> Self {
        self.data.annotations.push(Annotation::new(name));
        self
    }

    /// Adds `@Suppress("<rule>")`.
    #[must_use]
    pub fn suppress(mut self, rule: impl Into<String>) -> Self {
        self.data
            .annotations
            .push(Annotation::new("Suppress").with_argument(rule));
        self
    }

    /// Adds a modifier keyword.
    #[must_use]
    pub fn modifier(mut self, keyword: impl Into<String>) -> Self {
        self.data.modifiers.push(keyword.into());
        self
    }

    /// Adds a member function.
    #[must_use]
    pub fn function(mut self, function: FunctionBuilder) -> Self {
        self.functions.push(function);
        self
    }

    fn emit(&self, builder: &mut TreeBuilder) {
        builder.start_node(NodeKind::TypeDeclaration, NodeData::Type(self.data.clone()));
        for annotation in &self.data.annotations {
            builder.token(render_annotation("", annotation));
            builder.token("\n");
        }
        for modifier in &self.data.modifiers {
            builder.token(modifier.clone());
            builder.token(" ");
        }
        builder.token(if self.data.is_interface {
            "interface"
        } else {
            "class"
        });
        builder.token(" ");
        builder.token(self.data.name.clone());
        builder.token(" ");
        builder.token("{");
        builder.token("\n");
        for function in &self.functions {
            builder.token(INDENT);
            function.emit(builder, INDENT);
            builder.token("\n");
        }
        builder.token("}");
        builder.finish_node();
    }
}

/// A value parameter.
#[derive(Debug, Clone)]
pub struct Param {
    name: String,
    type_name: String,
    default_value: Option<String>,
}

impl Param {
    /// A parameter without default value.
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            default_value: None,
        }
    }

    /// Sets the default value expression.
    #[must_use]
    pub fn default_value(mut self, expression: impl Into<String>) -> Self {
        self.default_value = Some(expression.into());
        self
    }

    fn emit(&self, builder: &mut TreeBuilder) {
        builder.start_node(
            NodeKind::Parameter,
            NodeData::Parameter(ParameterData {
                name: self.name.clone(),
                type_name: self.type_name.clone(),
            }),
        );
        builder.token(self.name.clone());
        builder.token(":");
        builder.token(" ");
        builder.token(self.type_name.clone());
        if let Some(expression) = &self.default_value {
            builder.start_node(NodeKind::DefaultValue, NodeData::None);
            builder.token(" ");
            builder.token("=");
            builder.token(" ");
            builder.token(expression.clone());
            builder.finish_node();
        }
        builder.finish_node();
    }
}

/// A top-level body statement.
#[derive(Debug, Clone)]
pub enum Statement {
    /// Call expression.
    Call {
        /// Callee and arguments.
        data: CallData,
        /// Text inside the trailing lambda braces.
        lambda_body: Option<String>,
    },
    /// Local function declaration.
    Function(Box<FunctionBuilder>),
    /// Any other statement, kept as text.
    Other(String),
}

impl Statement {
    /// A call to `callee` with no arguments.
    #[must_use]
    pub fn call(callee: impl Into<String>) -> Self {
        Self::Call {
            data: CallData {
                callee: callee.into(),
                ..CallData::default()
            },
            lambda_body: None,
        }
    }

    /// A local function.
    #[must_use]
    pub fn function(function: FunctionBuilder) -> Self {
        Self::Function(Box::new(function))
    }

    /// A statement that is not a call.
    #[must_use]
    pub fn other(text: impl Into<String>) -> Self {
        Self::Other(text.into())
    }

    fn with_call(mut self, update: impl FnOnce(&mut CallData, &mut Option<String>)) -> Self {
        if let Self::Call { data, lambda_body } = &mut self {
            update(data, lambda_body);
        }
        self
    }

    /// Adds a positional argument to a call.
    #[must_use]
    pub fn arg(self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.with_call(|data, _| data.arguments.push(CallArgument::positional(text)))
    }

    /// Adds a named argument to a call.
    #[must_use]
    pub fn named_arg(self, name: impl Into<String>, text: impl Into<String>) -> Self {
        let argument = CallArgument::named(name, text);
        self.with_call(|data, _| data.arguments.push(argument))
    }

    /// Adds an empty trailing lambda to a call.
    #[must_use]
    pub fn trailing_lambda(self) -> Self {
        self.with_call(|data, _| data.trailing_lambda = true)
    }

    /// Adds a trailing lambda with the given body text.
    #[must_use]
    pub fn trailing_lambda_body(self, body: impl Into<String>) -> Self {
        let body = body.into();
        self.with_call(|data, lambda_body| {
            data.trailing_lambda = true;
            *lambda_body = Some(body);
        })
    }

    fn emit(&self, builder: &mut TreeBuilder, indent: &str) {
        match self {
            Self::Call { data, lambda_body } => {
                builder.start_node(NodeKind::Call, NodeData::Call(data.clone()));
                builder.token(data.callee.clone());
                if !data.arguments.is_empty() || !data.trailing_lambda {
                    let arguments = data
                        .arguments
                        .iter()
                        .map(|argument| match &argument.name {
                            Some(name) => format!("{name} = {}", argument.text),
                            None => argument.text.clone(),
                        })
                        .collect::<Vec<_>>()
                        .join(", ");
                    builder.token(format!("({arguments})"));
                }
                if data.trailing_lambda {
                    builder.token(" ");
                    match lambda_body {
                        Some(body) => builder.token(format!("{{ {body} }}")),
                        None => builder.token("{}"),
                    }
                }
                builder.finish_node();
            }
            Self::Function(function) => function.emit(builder, indent),
            Self::Other(text) => {
                builder.start_node(NodeKind::Other, NodeData::None);
                builder.token(text.clone());
                builder.finish_node();
            }
        }
    }
}

/// Builds a function declaration.
#[derive(Debug, Clone)]
pub struct FunctionBuilder {
    data: FunctionData,
    params: Vec<Param>,
    statements: Vec<Statement>,
}

impl FunctionBuilder {
    /// A function without annotations, parameters or statements.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            data: FunctionData {
                name: name.into(),
                ..FunctionData::default()
            },
            params: Vec::new(),
            statements: Vec::new(),
        }
    }

    /// Adds `@Composable`.
    #[must_use]
    pub fn composable(self) -> Self {
        self.annotation(COMPOSABLE_ANNOTATION)
    }

    /// Adds an annotation without arguments.
    #[must_use]
    pub fn annotation(mut self, name: impl Into<String>) -> Self {
        self.data.annotations.push(Annotation::new(name));
        self
    }

    /// Adds an annotation with string arguments.
    #[must_use]
    pub fn annotation_with(mut self, annotation: Annotation) -> Self {
        self.data.annotations.push(annotation);
        self
    }

    /// Adds `@Suppress("<rule>")`.
    #[must_use]
    pub fn suppress(self, rule: impl Into<String>) -> Self {
        self.annotation_with(Annotation::new("Suppress").with_argument(rule))
    }

    /// Adds a modifier keyword such as `private` or `override`.
    #[must_use]
    pub fn modifier(mut self, keyword: impl Into<String>) -> Self {
        self.data.modifiers.push(keyword.into());
        self
    }

    /// Adds a parameter.
    #[must_use]
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Declares the return type.
    #[must_use]
    pub fn returns(mut self, type_name: impl Into<String>) -> Self {
        self.data.return_type = Some(type_name.into());
        self
    }

    /// Adds a body statement.
    #[must_use]
    pub fn statement(mut self, statement: Statement) -> Self {
        self.statements.push(statement);
        self
    }

    fn emit(&self, builder: &mut TreeBuilder, indent: &str) {
        builder.start_node(
            NodeKind::FunctionDeclaration,
            NodeData::Function(self.data.clone()),
        );
        for annotation in &self.data.annotations {
            builder.token(render_annotation("", annotation));
            builder.token("\n");
            builder.token(indent.to_string());
        }
        for modifier in &self.data.modifiers {
            builder.token(modifier.clone());
            builder.token(" ");
        }
        builder.token("fun");
        builder.token(" ");
        builder.token(self.data.name.clone());

        builder.start_node(NodeKind::ParameterList, NodeData::None);
        builder.token("(");
        for (index, param) in self.params.iter().enumerate() {
            if index > 0 {
                builder.token(", ");
            }
            param.emit(builder);
        }
        builder.token(")");
        builder.finish_node();

        if let Some(return_type) = &self.data.return_type {
            builder.token(":");
            builder.token(" ");
            builder.token(return_type.clone());
        }

        builder.token(" ");
        builder.start_node(NodeKind::Body, NodeData::None);
        builder.token("{");
        builder.token("\n");
        let inner = format!("{indent}{INDENT}");
        for statement in &self.statements {
            builder.token(inner.clone());
            statement.emit(builder, &inner);
            builder.token("\n");
        }
        builder.token(format!("{indent}}}"));
        builder.finish_node();
        builder.finish_node();
    }
}
