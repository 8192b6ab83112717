//! Rule traits for defining lint rules.

use crate::emitter::Emitter;
use crate::error::{ConfigError, RuleError};
use crate::mutation::MutationHandle;
use crate::options::{Configuration, OptionSpec};
use crate::tree::{FileRef, FunctionRef, TypeRef};
use crate::types::Severity;

/// Traversal hook a rule can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    /// Once per file, before its declarations.
    File,
    /// Every type declaration.
    Type,
    /// Every function declaration.
    Function,
    /// Every `@Composable` function, after all function hooks ran for it.
    Composable,
}

impl Hook {
    const fn bit(self) -> u8 {
        match self {
            Self::File => 1,
            Self::Type => 1 << 1,
            Self::Function => 1 << 2,
            Self::Composable => 1 << 3,
        }
    }
}

/// Set of hooks a rule subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hooks(u8);

impl Hooks {
    /// No hook.
    pub const EMPTY: Self = Self(0);
    /// Every hook.
    pub const ALL: Self = Self(0b1111);

    /// Adds `hook`.
    #[must_use]
    pub const fn with(self, hook: Hook) -> Self {
        Self(self.0 | hook.bit())
    }

    /// Whether `hook` is in the set.
    #[must_use]
    pub const fn contains(self, hook: Hook) -> bool {
        self.0 & hook.bit() != 0
    }
}

/// A lint rule over the syntax tree.
///
/// A rule is shared by all files and threads. Per-file state lives in the
/// [`RuleVisitor`] returned by [`start_file`](Rule::start_file), which is
/// dropped when the file's traversal ends.
///
/// # Example
///
/// ```
/// use compose_lint_core::{
///     ConfigError, Configuration, Emitter, FunctionRef, Hook, Hooks, MutationHandle, Rule,
///     RuleError, RuleVisitor,
/// };
///
/// pub struct NoEmptyName;
///
/// struct Visitor;
///
/// impl RuleVisitor for Visitor {
///     fn visit_function(
///         &mut self,
///         function: &FunctionRef<'_>,
///         emitter: &mut Emitter<'_>,
///         _fix: Option<&mut MutationHandle<'_>>,
///     ) -> Result<(), RuleError> {
///         if function.name().is_empty() {
///             emitter.report(function, "Function has no name.", false);
///         }
///         Ok(())
///     }
/// }
///
/// impl Rule for NoEmptyName {
///     fn name(&self) -> &'static str { "example:no-empty-name" }
///     fn code(&self) -> &'static str { "EX001" }
///     fn hooks(&self) -> Hooks { Hooks::EMPTY.with(Hook::Function) }
///     fn start_file(&self, _: &Configuration) -> Result<Box<dyn RuleVisitor>, ConfigError> {
///         Ok(Box::new(Visitor))
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Rule id used in reports, config tables and `@Suppress`
    /// (e.g., "compose:modifier-missing-check").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "CM001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    /// Options the rule reads. Resolved once per file.
    fn options(&self) -> &'static [OptionSpec] {
        &[]
    }

    /// Hooks the driver should call.
    fn hooks(&self) -> Hooks {
        Hooks::ALL
    }

    /// Creates fresh per-file state from the resolved options.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a required option is missing or
    /// mistyped; the file is then not linted.
    fn start_file(&self, config: &Configuration) -> Result<Box<dyn RuleVisitor>, ConfigError>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

/// Per-file rule state receiving traversal callbacks.
///
/// Every hook gets an [`Emitter`] bound to the rule and, only when the run
/// permits fixes, a [`MutationHandle`] scoped to the visited node. Returning
/// `Err` turns into a diagnostic violation; traversal continues.
#[allow(unused_variables)]
pub trait RuleVisitor {
    /// Called once for the file root.
    ///
    /// # Errors
    ///
    /// A [`RuleError`] if the node cannot be inspected.
    fn visit_file(
        &mut self,
        file: &FileRef<'_>,
        emitter: &mut Emitter<'_>,
        fix: Option<&mut MutationHandle<'_>>,
    ) -> Result<(), RuleError> {
        Ok(())
    }

    /// Called for every type declaration.
    ///
    /// # Errors
    ///
    /// A [`RuleError`] if the node cannot be inspected.
    fn visit_type(
        &mut self,
        declaration: &TypeRef<'_>,
        emitter: &mut Emitter<'_>,
        fix: Option<&mut MutationHandle<'_>>,
    ) -> Result<(), RuleError> {
        Ok(())
    }

    /// Called for every function declaration.
    ///
    /// # Errors
    ///
    /// A [`RuleError`] if the node cannot be inspected.
    fn visit_function(
        &mut self,
        function: &FunctionRef<'_>,
        emitter: &mut Emitter<'_>,
        fix: Option<&mut MutationHandle<'_>>,
    ) -> Result<(), RuleError> {
        Ok(())
    }

    /// Called for every `@Composable` function after the function hooks.
    ///
    /// # Errors
    ///
    /// A [`RuleError`] if the node cannot be inspected.
    fn visit_composable(
        &mut self,
        function: &FunctionRef<'_>,
        emitter: &mut Emitter<'_>,
        fix: Option<&mut MutationHandle<'_>>,
    ) -> Result<(), RuleError> {
        Ok(())
    }
}
