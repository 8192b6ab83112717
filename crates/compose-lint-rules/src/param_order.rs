//! Rule enforcing a canonical parameter order.
//!
//! # Rationale
//!
//! Callers read UI function signatures left to right. Putting required
//! parameters first, the styling handle right after them and the content
//! lambda last keeps call sites uniform and lets the lambda trail the call.
//!
//! # Expected Order
//!
//! 1. Parameters without a default value
//! 2. The styling-handle parameter, when it has a default
//! 3. Other parameters with a default value
//! 4. A trailing lambda: the last parameter, when it has a function type
//!
//! Parameters keep their relative order inside each group.
//!
//! # Configuration
//!
//! - `stylingHandleTypeAliases`: extra styling-handle type names

use std::collections::BTreeSet;

use compose_lint_core::{
    ConfigError, Configuration, Emitter, FunctionRef, Hook, Hooks, MutationHandle, OptionSpec,
    ParameterRef, Rule, RuleError, RuleVisitor, Severity,
};

use crate::options::{aliases, STYLING_HANDLE_ALIASES};

/// Rule code for param-order-check.
pub const CODE: &str = "CM003";

/// Rule name for param-order-check.
pub const NAME: &str = "compose:param-order-check";

const OPTIONS: &[OptionSpec] = &[STYLING_HANDLE_ALIASES];

/// Requires parameters in canonical order.
#[derive(Debug, Clone)]
pub struct ParamOrder {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for ParamOrder {
    fn default() -> Self {
        Self::new()
    }
}

impl ParamOrder {
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

impl Rule for ParamOrder {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Parameters follow required, styling handle, defaulted, trailing lambda order"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn options(&self) -> &'static [OptionSpec] {
        OPTIONS
    }

    fn hooks(&self) -> Hooks {
        Hooks::EMPTY.with(Hook::Function)
    }

    fn start_file(&self, config: &Configuration) -> Result<Box<dyn RuleVisitor>, ConfigError> {
        Ok(Box::new(Visitor {
            aliases: aliases(config)?,
        }))
    }
}

/// Position group of a parameter, in expected order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Group {
    Required,
    StylingHandle,
    Defaulted,
    TrailingLambda,
}

struct Visitor {
    aliases: BTreeSet<String>,
}

impl Visitor {
    fn group(&self, parameter: &ParameterRef<'_>, is_last: bool) -> Group {
        let is_modifier = parameter.is_modifier(&self.aliases);
        if is_last && parameter.is_function_type() && !is_modifier {
            Group::TrailingLambda
        } else if !parameter.has_default_value() {
            Group::Required
        } else if is_modifier {
            Group::StylingHandle
        } else {
            Group::Defaulted
        }
    }
}

fn names(parameters: &[&ParameterRef<'_>]) -> String {
    parameters
        .iter()
        .map(|parameter| parameter.name())
        .collect::<Vec<_>>()
        .join(", ")
}

impl RuleVisitor for Visitor {
    fn visit_function(
        &mut self,
        function: &FunctionRef<'_>,
        emitter: &mut Emitter<'_>,
        _fix: Option<&mut MutationHandle<'_>>,
    ) -> Result<(), RuleError> {
        let parameters = function.parameters();
        let last = parameters.len().saturating_sub(1);
        let grouped: Vec<(Group, &ParameterRef<'_>)> = parameters
            .iter()
            .enumerate()
            .map(|(index, parameter)| (self.group(parameter, index == last), parameter))
            .collect();

        let current: Vec<_> = grouped.iter().map(|(_, parameter)| *parameter).collect();
        let mut expected = grouped.clone();
        expected.sort_by_key(|(group, _)| *group);
        let expected: Vec<_> = expected.into_iter().map(|(_, parameter)| parameter).collect();

        let in_order = current
            .iter()
            .zip(&expected)
            .all(|(a, b)| a.node().path() == b.node().path());
        if !in_order {
            emitter.report(
                function,
                format!(
                    "Parameters should be ordered: required parameters, the styling handle, \
                     parameters with defaults, then a trailing lambda. \
                     Current order is ({}) but should be ({}).",
                    names(&current),
                    names(&expected)
                ),
                false,
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compose_lint_core::fixture::{FileBuilder, FunctionBuilder, Param};
    use compose_lint_core::{Config, Linter, ProjectSettings, Violation};

    fn check(function: FunctionBuilder) -> Vec<Violation> {
        Linter::builder()
            .rule(ParamOrder::new())
            .config(Config::with_settings(ProjectSettings::new()))
            .build()
            .unwrap()
            .lint(&FileBuilder::new().function(function).source("Test.kt").unwrap())
            .unwrap()
            .violations
    }

    fn modifier() -> Param {
        Param::new("modifier", "Modifier").default_value("Modifier")
    }

    fn content() -> Param {
        Param::new("content", "@Composable () -> Unit")
    }

    #[test]
    fn test_accepts_canonical_order() {
        let function = FunctionBuilder::new("Card")
            .composable()
            .param(Param::new("title", "String"))
            .param(modifier())
            .param(Param::new("elevated", "Boolean").default_value("false"))
            .param(content());
        assert!(check(function).is_empty());
    }

    #[test]
    fn test_reports_modifier_before_required() {
        let function = FunctionBuilder::new("Card")
            .param(modifier())
            .param(Param::new("title", "String"));
        let violations = check(function);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, CODE);
        // fun Card
        assert_eq!(
            (violations[0].location.line, violations[0].location.column),
            (1, 5)
        );
        assert!(violations[0]
            .message
            .ends_with("Current order is (modifier, title) but should be (title, modifier)."));
    }

    #[test]
    fn test_reports_defaulted_before_modifier() {
        let function = FunctionBuilder::new("Card")
            .param(Param::new("elevated", "Boolean").default_value("false"))
            .param(modifier());
        assert_eq!(check(function).len(), 1);
    }

    #[test]
    fn test_trailing_lambda_may_follow_defaults() {
        let function = FunctionBuilder::new("Card")
            .param(modifier())
            .param(Param::new("onClick", "() -> Unit").default_value("{}"))
            .param(content());
        assert!(check(function).is_empty());
    }

    #[test]
    fn test_lambda_not_last_is_a_regular_parameter() {
        let function = FunctionBuilder::new("Card")
            .param(content())
            .param(Param::new("title", "String"));
        assert!(check(function).is_empty());

        let function = FunctionBuilder::new("Card")
            .param(modifier())
            .param(content())
            .param(Param::new("title", "String").default_value("\"\""));
        let violations = check(function);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("should be (content, modifier, title)"));
    }

    #[test]
    fn test_modifier_without_default_counts_as_required() {
        let function = FunctionBuilder::new("Card")
            .param(Param::new("modifier", "Modifier"))
            .param(Param::new("title", "String").default_value("\"\""));
        assert!(check(function).is_empty());
    }

    #[test]
    fn test_applies_to_plain_functions() {
        let function = FunctionBuilder::new("helper")
            .param(Param::new("flag", "Boolean").default_value("true"))
            .param(Param::new("name", "String"));
        assert_eq!(check(function).len(), 1);
    }
}
