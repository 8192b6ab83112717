//! Rule requiring styling-handle parameters to have a default value.
//!
//! # Rationale
//!
//! Callers of a UI function should not have to pass a styling handle just to
//! get the default look. Every styling-handle parameter defaults to the empty
//! `Modifier` so it can be omitted.
//!
//! # Exemptions
//!
//! - Functions declared in an interface
//! - `override`, `abstract` and `actual` functions, whose signature is
//!   dictated elsewhere
//! - Functions whose visibility is outside `checkModifiersForVisibility`
//!
//! # Configuration
//!
//! - `checkModifiersForVisibility`: visibilities to inspect
//! - `stylingHandleTypeAliases`: extra styling-handle type names
//!
//! # Fix
//!
//! Appends ` = Modifier` to the parameter.
//!
//! A handle declared before other required parameters, as in
//! `f(modifier: Modifier, title: String)`, counts as required until it has a
//! default. After the fix it belongs after them, so
//! `compose:param-order-check` reports it on the next run.

use std::collections::BTreeSet;

use compose_lint_core::tree::MODIFIER_TYPE;
use compose_lint_core::{
    ConfigError, Configuration, Emitter, FunctionRef, Hook, Hooks, MutationHandle, OptionSpec,
    Rule, RuleError, RuleVisitor, Severity,
};
use tracing::trace;

use crate::options::{aliases, VisibilityScope, STYLING_HANDLE_ALIASES, VISIBILITY};

/// Rule code for modifier-without-default-check.
pub const CODE: &str = "CM001";

/// Rule name for modifier-without-default-check.
pub const NAME: &str = "compose:modifier-without-default-check";

const MESSAGE: &str = "UI function has a styling-handle parameter without a default value.";

const OPTIONS: &[OptionSpec] = &[VISIBILITY, STYLING_HANDLE_ALIASES];

/// Requires styling-handle parameters to default to `Modifier`.
#[derive(Debug, Clone)]
pub struct ModifierWithoutDefault {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for ModifierWithoutDefault {
    fn default() -> Self {
        Self::new()
    }
}

impl ModifierWithoutDefault {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Warning,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for ModifierWithoutDefault {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Styling-handle parameters must have a default value"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn options(&self) -> &'static [OptionSpec] {
        OPTIONS
    }

    fn hooks(&self) -> Hooks {
        Hooks::EMPTY.with(Hook::Composable)
    }

    fn start_file(&self, config: &Configuration) -> Result<Box<dyn RuleVisitor>, ConfigError> {
        Ok(Box::new(Visitor {
            scope: VisibilityScope::from_config(config)?,
            aliases: aliases(config)?,
        }))
    }
}

struct Visitor {
    scope: VisibilityScope,
    aliases: BTreeSet<String>,
}

impl Visitor {
    fn is_exempt(&self, function: &FunctionRef<'_>) -> bool {
        function.defined_in_interface()
            || function.is_actual()
            || function.is_override()
            || function.is_abstract()
            || !self.scope.includes(function.visibility())
    }
}

impl RuleVisitor for Visitor {
    fn visit_composable(
        &mut self,
        function: &FunctionRef<'_>,
        emitter: &mut Emitter<'_>,
        mut fix: Option<&mut MutationHandle<'_>>,
    ) -> Result<(), RuleError> {
        if self.is_exempt(function) {
            trace!(function = function.name(), "exempt from {NAME}");
            return Ok(());
        }
        let missing = function
            .parameters()
            .into_iter()
            .filter(|parameter| parameter.is_modifier(&self.aliases))
            .filter(|parameter| !parameter.has_default_value());
        for parameter in missing {
            emitter.report(&parameter, MESSAGE, true);
            if let Some(handle) = fix.as_deref_mut() {
                handle.set_default_value(&parameter, MODIFIER_TYPE)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compose_lint_core::fixture::{FileBuilder, FunctionBuilder, Param, TypeBuilder};
    use compose_lint_core::{Config, Linter, ProjectSettings, SourceFile};

    fn linter(settings: ProjectSettings) -> Linter {
        Linter::builder()
            .rule(ModifierWithoutDefault::new())
            .config(Config::with_settings(settings))
            .build()
            .unwrap()
    }

    fn check(file: FileBuilder) -> Vec<(usize, usize)> {
        linter(ProjectSettings::new())
            .lint(&file.source("Test.kt").unwrap())
            .unwrap()
            .violations
            .iter()
            .map(|v| (v.location.line, v.location.column))
            .collect()
    }

    fn greeting(modifier: Param) -> FunctionBuilder {
        FunctionBuilder::new("Greeting")
            .composable()
            .param(Param::new("text", "String"))
            .param(modifier)
    }

    #[test]
    fn test_reports_modifier_without_default() {
        let file = FileBuilder::new().function(greeting(Param::new("modifier", "Modifier")));
        // @Composable\nfun Greeting(text: String, modifier: Modifier) {
        assert_eq!(check(file), [(2, 28)]);
    }

    #[test]
    fn test_allows_modifier_with_default() {
        let file = FileBuilder::new()
            .function(greeting(Param::new("modifier", "Modifier").default_value("Modifier")));
        assert!(check(file).is_empty());
    }

    #[test]
    fn test_ignores_non_composable_functions() {
        let file = FileBuilder::new().function(
            FunctionBuilder::new("style").param(Param::new("modifier", "Modifier")),
        );
        assert!(check(file).is_empty());
    }

    #[test]
    fn test_exempts_overrides_and_interfaces() {
        let file = FileBuilder::new()
            .function(greeting(Param::new("modifier", "Modifier")).modifier("override"))
            .function(greeting(Param::new("modifier", "Modifier")).modifier("actual"))
            .type_decl(
                TypeBuilder::interface("Screen")
                    .function(greeting(Param::new("modifier", "Modifier"))),
            )
            .type_decl(
                TypeBuilder::class("Base").modifier("abstract").function(
                    greeting(Param::new("modifier", "Modifier")).modifier("abstract"),
                ),
            );
        assert!(check(file).is_empty());
    }

    #[test]
    fn test_private_functions_need_visibility_all() {
        let file = || {
            FileBuilder::new()
                .function(greeting(Param::new("modifier", "Modifier")).modifier("private"))
                .source("Test.kt")
                .unwrap()
        };
        let public_only = linter(ProjectSettings::new()).lint(&file()).unwrap();
        assert!(public_only.violations.is_empty());

        let all = linter(ProjectSettings::new().with(VISIBILITY.name, "all"))
            .lint(&file())
            .unwrap();
        assert_eq!(all.violations.len(), 1);
    }

    #[test]
    fn test_fix_appends_default() {
        let file = FileBuilder::new()
            .function(greeting(Param::new("styling", "StyleHandle")))
            .source("Test.kt")
            .unwrap();
        let settings =
            ProjectSettings::new().with(STYLING_HANDLE_ALIASES.name, vec!["StyleHandle".to_string()]);
        let fixed = linter(settings).lint_and_fix(file).unwrap();
        assert_eq!(
            fixed.source,
            "@Composable\nfun Greeting(text: String, styling: StyleHandle = Modifier) {\n}\n"
        );
        assert_eq!(fixed.report.violations.len(), 1);
        assert!(fixed.report.violations[0].auto_fixed);
        assert_eq!(fixed.report.violations[0].code, CODE);
    }

    #[test]
    fn test_unfixed_run_leaves_flag_clear() {
        let file = FileBuilder::new().function(greeting(Param::new("modifier", "Modifier")));
        let report = linter(ProjectSettings::new())
            .lint(&SourceFile::new("Test.kt", file.build().unwrap()))
            .unwrap();
        assert!(report.violations[0].fixable);
        assert!(!report.violations[0].auto_fixed);
    }
}
