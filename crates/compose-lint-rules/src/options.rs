//! Options shared by the built-in rules.

use std::collections::BTreeSet;

use compose_lint_core::{ConfigError, Configuration, OptionSpec, Visibility};

/// Which function visibilities the styling-handle rules inspect.
pub const VISIBILITY: OptionSpec = OptionSpec::enumeration(
    "checkModifiersForVisibility",
    &["public", "public_and_internal", "all"],
    "public",
    "Function visibilities the styling-handle rules inspect.",
);

/// Type names, besides `Modifier`, that count as a styling handle.
pub const STYLING_HANDLE_ALIASES: OptionSpec = OptionSpec::string_set(
    "stylingHandleTypeAliases",
    &["Modifier"],
    "Type names that count as a styling-handle parameter.",
);

/// Annotations marking preview-only functions.
pub const PREVIEW_MARKERS: OptionSpec = OptionSpec::string_set(
    "contentEmittingMarkerAnnotations",
    &["Preview"],
    "Annotations marking preview functions, which are exempt.",
);

/// Extra callees treated as content emitters.
pub const CONTENT_EMITTERS: OptionSpec = OptionSpec::string_set(
    "contentEmitters",
    &[],
    "Additional UI functions that emit content.",
);

/// Resolved value of [`VISIBILITY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityScope {
    /// Public functions only.
    #[default]
    Public,
    /// Public and internal functions.
    PublicAndInternal,
    /// Every function.
    All,
}

impl VisibilityScope {
    /// Reads the scope from a resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if [`VISIBILITY`] was not declared by the
    /// calling rule.
    pub fn from_config(config: &Configuration) -> Result<Self, ConfigError> {
        Ok(match config.require_enum(VISIBILITY.name)? {
            "all" => Self::All,
            "public_and_internal" => Self::PublicAndInternal,
            _ => Self::Public,
        })
    }

    /// Whether functions of `visibility` are inspected.
    #[must_use]
    pub fn includes(self, visibility: Visibility) -> bool {
        matches!(
            (self, visibility),
            (_, Visibility::Public)
                | (Self::All, _)
                | (Self::PublicAndInternal, Visibility::Internal)
        )
    }
}

pub(crate) fn aliases(config: &Configuration) -> Result<BTreeSet<String>, ConfigError> {
    config.require_set(STYLING_HANDLE_ALIASES.name).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use compose_lint_core::{resolve, ProjectSettings};
    use rstest::rstest;

    #[rstest]
    #[case::public_only("public", [true, false, false, false])]
    #[case::with_internal("public_and_internal", [true, true, false, false])]
    #[case::everything("all", [true, true, true, true])]
    fn scope_gates_visibilities(#[case] setting: &str, #[case] expected: [bool; 4]) {
        let settings = ProjectSettings::new().with(VISIBILITY.name, setting);
        let config = resolve(&[VISIBILITY], &settings).unwrap();
        let scope = VisibilityScope::from_config(&config).unwrap();
        let actual = [
            Visibility::Public,
            Visibility::Internal,
            Visibility::Protected,
            Visibility::Private,
        ]
        .map(|visibility| scope.includes(visibility));
        assert_eq!(actual, expected);
    }

    #[test]
    fn undeclared_scope_is_an_error() {
        let config = resolve(&[], &ProjectSettings::new()).unwrap();
        assert!(matches!(
            VisibilityScope::from_config(&config),
            Err(ConfigError::MissingOption { .. })
        ));
    }

    #[test]
    fn aliases_default_to_modifier() {
        let config = resolve(&[STYLING_HANDLE_ALIASES], &ProjectSettings::new()).unwrap();
        assert_eq!(
            aliases(&config).unwrap().into_iter().collect::<Vec<_>>(),
            ["Modifier"]
        );
    }
}
