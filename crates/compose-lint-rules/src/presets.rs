//! Rule presets for common configurations.

use crate::{ModifierMissing, ModifierWithoutDefault, ParamOrder};
use compose_lint_core::{RuleBox, Severity};

/// Preset configurations for compose-lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Every rule with its default severity.
    Recommended,
    /// Every rule, reporting errors instead of warnings.
    Strict,
    /// Only the fixable rule, for gradual adoption.
    Minimal,
}

impl Preset {
    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::Recommended => recommended_rules(),
            Self::Strict => strict_rules(),
            Self::Minimal => minimal_rules(),
        }
    }
}

/// Returns the recommended set of rules.
///
/// Includes:
/// - `compose:modifier-without-default-check` (CM001)
/// - `compose:modifier-missing-check` (CM002)
/// - `compose:param-order-check` (CM003)
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    vec![
        Box::new(ModifierWithoutDefault::new()),
        Box::new(ModifierMissing::new()),
        Box::new(ParamOrder::new()),
    ]
}

fn strict_rules() -> Vec<RuleBox> {
    vec![
        Box::new(ModifierWithoutDefault::new().severity(Severity::Error)),
        Box::new(ModifierMissing::new().severity(Severity::Error)),
        Box::new(ParamOrder::new().severity(Severity::Error)),
    ]
}

/// Returns the minimal set of rules.
///
/// Only `compose:modifier-without-default-check`, whose violations can be
/// fixed automatically.
#[must_use]
pub fn minimal_rules() -> Vec<RuleBox> {
    vec![Box::new(ModifierWithoutDefault::new())]
}

/// Returns all available rules.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![
        Box::new(ModifierWithoutDefault::new()),
        Box::new(ModifierMissing::new()),
        Box::new(ParamOrder::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_rules() {
        assert_eq!(Preset::Recommended.rules().len(), 3);
        assert_eq!(Preset::Minimal.rules().len(), 1);
        assert!(Preset::Strict
            .rules()
            .iter()
            .all(|rule| rule.default_severity() == Severity::Error));
    }

    #[test]
    fn test_all_rules_covers_every_code() {
        let codes: Vec<_> = all_rules().iter().map(|rule| rule.code()).collect();
        assert_eq!(
            codes,
            [
                crate::modifier_without_default::CODE,
                crate::modifier_missing::CODE,
                crate::param_order::CODE,
            ]
        );
    }

    #[test]
    fn test_rule_names_are_unique() {
        let mut names: Vec<_> = all_rules().iter().map(|rule| rule.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), all_rules().len());
    }
}
