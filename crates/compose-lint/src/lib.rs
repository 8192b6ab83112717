//! # compose-lint
//!
//! Convention linter for declarative UI functions.
//!
//! This is the main facade crate that re-exports the engine and the built-in
//! rules. A parser adapter turns each source file into a [`SyntaxTree`]; this
//! crate lints it and, on request, rewrites it.
//!
//! ## Quick Start
//!
//! ```
//! use compose_lint::fixture::{FileBuilder, FunctionBuilder, Param, Statement};
//! use compose_lint::rules::Preset;
//! use compose_lint::Config;
//!
//! let file = FileBuilder::new()
//!     .function(
//!         FunctionBuilder::new("Greeting")
//!             .composable()
//!             .param(Param::new("modifier", "Modifier"))
//!             .statement(Statement::call("Text").arg("\"hi\"")),
//!     )
//!     .source("Greeting.kt")
//!     .unwrap();
//!
//! let linter = compose_lint::linter(Preset::Recommended, Config::new()).unwrap();
//! let fixed = linter.lint_and_fix(file).unwrap();
//! assert!(fixed.source.contains("modifier: Modifier = Modifier"));
//! ```
//!
//! ## Configuration
//!
//! ```toml
//! [settings]
//! checkModifiersForVisibility = "public_and_internal"
//! stylingHandleTypeAliases = ["Modifier", "StyleHandle"]
//!
//! [rules."compose:param-order-check"]
//! severity = "error"
//!
//! [linter]
//! parallelism = 4
//! ```
//!
//! ## Suppression
//!
//! `@Suppress("compose:modifier-missing-check")` on a declaration, or
//! `@file:Suppress(...)` on the file, silences a rule for everything inside.

#![forbid(unsafe_code)]

// Re-export core types and traits
pub use compose_lint_core::*;

/// Built-in rules and presets.
pub mod rules {
    pub use compose_lint_rules::*;
}

/// Builds a linter running `preset` with `config`.
///
/// # Errors
///
/// Returns [`LintError::ThreadPool`] if `config` asks for a dedicated worker
/// pool that cannot be created.
pub fn linter(preset: rules::Preset, config: Config) -> Result<Linter, LintError> {
    Linter::builder().rules(preset.rules()).config(config).build()
}

