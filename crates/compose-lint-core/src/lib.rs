//! # compose-lint-core
//!
//! Rule engine for linting declarative UI code: the syntax tree model rules
//! inspect, the option schema that parameterizes them, and the driver that
//! walks each file once and applies rule fixes safely.
//!
//! This crate provides:
//!
//! - [`SyntaxTree`] with typed views ([`FunctionRef`], [`ParameterRef`], ...)
//!   and a [`TreeBuilder`] for parser adapters
//! - [`Rule`] and [`RuleVisitor`] traits for pluggable rules
//! - [`resolve`] for typed, validated rule options
//! - [`Linter`] for running rules over one or many files
//! - [`Violation`] for representing lint findings
//!
//! Parsing, file discovery and rendering are left to the caller.
//!
//! ## Example
//!
//! ```ignore
//! use compose_lint_core::{Config, Linter};
//!
//! let linter = Linter::builder()
//!     .rule(MyRule::new())
//!     .config(Config::parse(&toml)?)
//!     .build()?;
//!
//! let report = linter.lint(&source_file)?;
//! for violation in &report.violations {
//!     println!("{violation}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod context;
mod driver;
mod emitter;
mod error;
mod linter;
mod mutation;
mod options;
mod rule;
mod types;

pub mod fixture;
pub mod tree;

pub use config::{Config, LinterConfig, ProjectSettings, RawValue, RuleConfig};
pub use context::SourceFile;
pub use emitter::{Anchor, Emitter};
pub use error::{ConfigError, LintError, RuleError, TraversalError, TreeError};
pub use linter::{Linter, LinterBuilder};
pub use mutation::MutationHandle;
pub use options::{resolve, Configuration, OptionKind, OptionSpec, Value};
pub use rule::{Hook, Hooks, Rule, RuleBox, RuleVisitor};
pub use tree::{
    Annotation, CallRef, FileRef, FunctionRef, LineIndex, Node, NodeKind, NodePath, NodeRef,
    ParameterRef, SyntaxTree, TextRange, TreeBuilder, TypeRef, Visibility,
};
pub use types::{
    FileFailure, FileReport, FixedFile, LintResult, Location, Severity, Violation,
    ViolationDiagnostic,
};
