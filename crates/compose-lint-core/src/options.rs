//! Declared rule options and their resolution against project settings.
//!
//! Each rule declares a closed set of [`OptionSpec`]s. [`resolve`] overlays
//! the project's raw settings on the declared defaults and coerces every
//! value once, so rules read typed values and never see a malformed one.
//!
//! ```
//! use compose_lint_core::{resolve, OptionSpec, ProjectSettings};
//!
//! const VISIBILITY: OptionSpec = OptionSpec::enumeration(
//!     "checkModifiersForVisibility",
//!     &["public", "public_and_internal", "all"],
//!     "public",
//!     "Function visibilities to inspect.",
//! );
//!
//! let settings = ProjectSettings::new().with("checkModifiersForVisibility", "all");
//! let config = resolve(&[VISIBILITY], &settings).unwrap();
//! assert_eq!(config.require_enum("checkModifiersForVisibility").unwrap(), "all");
//! ```

use std::collections::{BTreeMap, BTreeSet};

use crate::config::{ProjectSettings, RawValue};
use crate::error::ConfigError;

/// Type and default value of a declared option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Free-form string.
    String {
        /// Default value.
        default: &'static str,
    },
    /// Boolean flag.
    Bool {
        /// Default value.
        default: bool,
    },
    /// Set of strings.
    StringSet {
        /// Default members.
        default: &'static [&'static str],
    },
    /// One value out of a closed list.
    Enum {
        /// Accepted values.
        choices: &'static [&'static str],
        /// Default value, one of `choices`.
        default: &'static str,
    },
}

/// An option a rule declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSpec {
    /// Option name as written in the project settings.
    pub name: &'static str,
    /// Type and default.
    pub kind: OptionKind,
    /// Human-readable description.
    pub description: &'static str,
}

impl OptionSpec {
    /// Declares a string option.
    #[must_use]
    pub const fn string(
        name: &'static str,
        default: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            kind: OptionKind::String { default },
            description,
        }
    }

    /// Declares a boolean option.
    #[must_use]
    pub const fn boolean(name: &'static str, default: bool, description: &'static str) -> Self {
        Self {
            name,
            kind: OptionKind::Bool { default },
            description,
        }
    }

    /// Declares a set-of-strings option.
    #[must_use]
    pub const fn string_set(
        name: &'static str,
        default: &'static [&'static str],
        description: &'static str,
    ) -> Self {
        Self {
            name,
            kind: OptionKind::StringSet { default },
            description,
        }
    }

    /// Declares an enumerated option.
    #[must_use]
    pub const fn enumeration(
        name: &'static str,
        choices: &'static [&'static str],
        default: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            kind: OptionKind::Enum { choices, default },
            description,
        }
    }

    fn default_value(&self) -> Value {
        match self.kind {
            OptionKind::String { default } => Value::String(default.to_string()),
            OptionKind::Bool { default } => Value::Bool(default),
            OptionKind::StringSet { default } => {
                Value::Set(default.iter().map(|item| (*item).to_string()).collect())
            }
            OptionKind::Enum { default, .. } => Value::Enum(default),
        }
    }

    fn invalid(&self, raw: &RawValue, expected: String) -> ConfigError {
        ConfigError::InvalidValue {
            key: self.name.to_string(),
            value: raw.to_string(),
            expected,
        }
    }

    fn coerce(&self, raw: &RawValue) -> Result<Value, ConfigError> {
        match (self.kind, raw) {
            (OptionKind::String { .. }, RawValue::String(value)) => {
                Ok(Value::String(value.clone()))
            }
            (OptionKind::String { .. }, _) => Err(self.invalid(raw, "a string".into())),

            (OptionKind::Bool { .. }, RawValue::Bool(value)) => Ok(Value::Bool(*value)),
            (OptionKind::Bool { .. }, RawValue::String(value)) => {
                match value.trim().to_ascii_lowercase().as_str() {
                    "true" => Ok(Value::Bool(true)),
                    "false" => Ok(Value::Bool(false)),
                    _ => Err(self.invalid(raw, "true or false".into())),
                }
            }
            (OptionKind::Bool { .. }, _) => Err(self.invalid(raw, "true or false".into())),

            (OptionKind::StringSet { .. }, RawValue::List(items)) => Ok(Value::Set(
                items
                    .iter()
                    .map(|item| item.trim())
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect(),
            )),
            (OptionKind::StringSet { .. }, RawValue::String(value)) => Ok(Value::Set(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect(),
            )),
            (OptionKind::StringSet { .. }, _) => Err(self.invalid(
                raw,
                "a list of strings or a comma-separated string".into(),
            )),

            (OptionKind::Enum { choices, .. }, RawValue::String(value)) => choices
                .iter()
                .find(|choice| **choice == value.trim())
                .map(|choice| Value::Enum(*choice))
                .ok_or_else(|| self.invalid(raw, format!("one of {}", choices.join(", ")))),
            (OptionKind::Enum { choices, .. }, _) => {
                Err(self.invalid(raw, format!("one of {}", choices.join(", "))))
            }
        }
    }
}

/// A resolved, typed option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// String value.
    String(String),
    /// Boolean value.
    Bool(bool),
    /// Set of strings.
    Set(BTreeSet<String>),
    /// Enumerated value, always one of the declared choices.
    Enum(&'static str),
}

/// Immutable, resolved option values for one rule and one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    values: BTreeMap<&'static str, Value>,
}

impl Configuration {
    /// Resolved value of `name`, if declared.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    fn require(&self, name: &str) -> Result<&Value, ConfigError> {
        self.get(name).ok_or_else(|| ConfigError::MissingOption {
            key: name.to_string(),
        })
    }

    fn mismatch(name: &str, value: &Value, expected: &str) -> ConfigError {
        ConfigError::InvalidValue {
            key: name.to_string(),
            value: format!("{value:?}"),
            expected: expected.to_string(),
        }
    }

    /// String value of `name`.
    #[must_use]
    pub fn string(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            Value::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Boolean value of `name`.
    #[must_use]
    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Set value of `name`.
    #[must_use]
    pub fn set(&self, name: &str) -> Option<&BTreeSet<String>> {
        match self.get(name)? {
            Value::Set(value) => Some(value),
            _ => None,
        }
    }

    /// Enumerated value of `name`.
    #[must_use]
    pub fn enumeration(&self, name: &str) -> Option<&'static str> {
        match self.get(name)? {
            Value::Enum(value) => Some(*value),
            _ => None,
        }
    }

    /// Boolean value of a declared option.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingOption`] if `name` was not declared,
    /// [`ConfigError::InvalidValue`] if it is not a boolean option.
    pub fn require_bool(&self, name: &str) -> Result<bool, ConfigError> {
        match self.require(name)? {
            Value::Bool(value) => Ok(*value),
            other => Err(Self::mismatch(name, other, "a boolean option")),
        }
    }

    /// String value of a declared option.
    ///
    /// # Errors
    ///
    /// See [`require_bool`](Self::require_bool).
    pub fn require_string(&self, name: &str) -> Result<&str, ConfigError> {
        match self.require(name)? {
            Value::String(value) => Ok(value.as_str()),
            other => Err(Self::mismatch(name, other, "a string option")),
        }
    }

    /// Set value of a declared option.
    ///
    /// # Errors
    ///
    /// See [`require_bool`](Self::require_bool).
    pub fn require_set(&self, name: &str) -> Result<&BTreeSet<String>, ConfigError> {
        match self.require(name)? {
            Value::Set(value) => Ok(value),
            other => Err(Self::mismatch(name, other, "a set option")),
        }
    }

    /// Enumerated value of a declared option.
    ///
    /// # Errors
    ///
    /// See [`require_bool`](Self::require_bool).
    pub fn require_enum(&self, name: &str) -> Result<&'static str, ConfigError> {
        match self.require(name)? {
            Value::Enum(value) => Ok(*value),
            other => Err(Self::mismatch(name, other, "an enumerated option")),
        }
    }
}

/// Resolves declared options against project settings.
///
/// Pure: the same specs and settings always give the same configuration.
/// Settings that no spec declares are ignored; declared options missing
/// from the settings take their default.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] for the first setting that cannot
/// be coerced to its declared kind.
pub fn resolve(
    specs: &[OptionSpec],
    settings: &ProjectSettings,
) -> Result<Configuration, ConfigError> {
    let mut values = BTreeMap::new();
    for spec in specs {
        let value = match settings.get(spec.name) {
            Some(raw) => spec.coerce(raw)?,
            None => spec.default_value(),
        };
        values.insert(spec.name, value);
    }
    Ok(Configuration { values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const VISIBILITY: OptionSpec = OptionSpec::enumeration(
        "checkModifiersForVisibility",
        &["public", "public_and_internal", "all"],
        "public",
        "",
    );
    const ALIASES: OptionSpec =
        OptionSpec::string_set("stylingHandleTypeAliases", &["Modifier"], "");
    const STRICT: OptionSpec = OptionSpec::boolean("strict", false, "");
    const PREFIX: OptionSpec = OptionSpec::string("prefix", "ui", "");

    const ALL: &[OptionSpec] = &[VISIBILITY, ALIASES, STRICT, PREFIX];

    #[test]
    fn defaults_apply_when_settings_are_empty() {
        let config = resolve(ALL, &ProjectSettings::new()).expect("resolves");
        assert_eq!(config.enumeration("checkModifiersForVisibility"), Some("public"));
        assert_eq!(
            config.set("stylingHandleTypeAliases").map(|s| s.len()),
            Some(1)
        );
        assert_eq!(config.boolean("strict"), Some(false));
        assert_eq!(config.string("prefix"), Some("ui"));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let settings = ProjectSettings::new().with("somethingElse", 42_i64);
        let config = resolve(ALL, &settings).expect("resolves");
        assert!(config.get("somethingElse").is_none());
    }

    #[rstest]
    #[case::list(RawValue::from(&["A", "B"][..]))]
    #[case::comma_separated(RawValue::from("A, B,"))]
    fn sets_accept_lists_and_comma_separated_strings(#[case] raw: RawValue) {
        let settings = ProjectSettings::new().with("stylingHandleTypeAliases", raw);
        let config = resolve(ALL, &settings).expect("resolves");
        let set = config.require_set("stylingHandleTypeAliases").expect("set");
        assert_eq!(set.iter().map(String::as_str).collect::<Vec<_>>(), ["A", "B"]);
    }

    #[rstest]
    #[case::bool(RawValue::Bool(true), true)]
    #[case::string(RawValue::from("FALSE"), false)]
    fn booleans_accept_strings(#[case] raw: RawValue, #[case] expected: bool) {
        let settings = ProjectSettings::new().with("strict", raw);
        let config = resolve(ALL, &settings).expect("resolves");
        assert_eq!(config.require_bool("strict"), Ok(expected));
    }

    #[rstest]
    #[case::enum_out_of_range("checkModifiersForVisibility", RawValue::from("everything"))]
    #[case::enum_wrong_type("checkModifiersForVisibility", RawValue::Bool(true))]
    #[case::bool_garbage("strict", RawValue::from("maybe"))]
    #[case::set_integer("stylingHandleTypeAliases", RawValue::Integer(1))]
    #[case::string_list("prefix", RawValue::from(&["a"][..]))]
    fn invalid_values_fail_with_key_and_value(#[case] key: &str, #[case] raw: RawValue) {
        let rendered = raw.to_string();
        let settings = ProjectSettings::new().with(key, raw);
        match resolve(ALL, &settings) {
            Err(ConfigError::InvalidValue {
                key: failed, value, ..
            }) => {
                assert_eq!(failed, key);
                assert_eq!(value, rendered);
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn resolution_is_pure() {
        let settings = ProjectSettings::new().with("checkModifiersForVisibility", "all");
        assert_eq!(resolve(ALL, &settings), resolve(ALL, &settings));
    }

    #[test]
    fn require_reports_undeclared_and_mistyped_options() {
        let config = resolve(&[STRICT], &ProjectSettings::new()).expect("resolves");
        assert_eq!(
            config.require_set("stylingHandleTypeAliases"),
            Err(ConfigError::MissingOption {
                key: "stylingHandleTypeAliases".into()
            })
        );
        assert!(matches!(
            config.require_string("strict"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
