//! Error types for tree construction, configuration, rules and traversal.

use miette::Diagnostic;
use thiserror::Error;

use crate::tree::NodeKind;

/// Errors raised while assembling a [`SyntaxTree`](crate::SyntaxTree).
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum TreeError {
    /// `finish` was called with no root node.
    #[error("tree has no root node")]
    Empty,

    /// The root node is not a `File`.
    #[error("tree root must be a File node, found {kind:?}")]
    RootNotFile {
        /// Kind of the offending root.
        kind: NodeKind,
    },

    /// A second root was started after the first one was finished.
    #[error("tree already has a finished root node")]
    MultipleRoots,

    /// A token was added while no node was open.
    #[error("token {text:?} added outside of any node")]
    TokenOutsideNode {
        /// Text of the stray token.
        text: String,
    },

    /// `finish_node` was called with no open node.
    #[error("finish_node called without a matching start_node")]
    UnbalancedFinish,

    /// `finish` was called while nodes were still open.
    #[error("{open} node(s) left open, innermost is {kind:?}")]
    UnclosedNode {
        /// Kind of the innermost open node.
        kind: NodeKind,
        /// Number of open nodes.
        open: usize,
    },

    /// The payload does not belong to the node kind.
    #[error("payload does not fit a {kind:?} node")]
    KindMismatch {
        /// Kind the payload was attached to.
        kind: NodeKind,
    },
}

/// Configuration errors.
///
/// An invalid option value is fatal for the file being linted: traversal
/// never starts.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ConfigError {
    /// A project setting could not be coerced to the declared option type.
    #[error("invalid value {value:?} for option `{key}`: expected {expected}")]
    #[diagnostic(
        code(compose_lint::config::invalid_value),
        help("check the `[settings]` table of your configuration")
    )]
    InvalidValue {
        /// Option name.
        key: String,
        /// Raw value as written in the settings.
        value: String,
        /// Human-readable description of accepted values.
        expected: String,
    },

    /// A rule read an option it never declared.
    #[error("option `{key}` was not declared by the rule")]
    #[diagnostic(code(compose_lint::config::missing_option))]
    MissingOption {
        /// Option name.
        key: String,
    },

    /// Parse error in a configuration document.
    #[error("failed to parse config: {message}")]
    #[diagnostic(code(compose_lint::config::parse))]
    Parse {
        /// Parse error message.
        message: String,
    },
}

/// Errors returned by rule hooks.
///
/// The driver turns these into diagnostic violations tagged with the
/// failing rule; traversal then continues.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum RuleError {
    /// The visited node does not have the expected shape.
    #[error("malformed node at byte {offset}: {message}")]
    Malformed {
        /// Start offset of the node.
        offset: usize,
        /// What was wrong with it.
        message: String,
    },

    /// An edit targeted a node outside the subtree under visit.
    #[error("edit target {target:?} lies outside the visited node {scope:?}")]
    OutOfScope {
        /// Path of the visited node.
        scope: Vec<usize>,
        /// Path of the edit target.
        target: Vec<usize>,
    },

    /// An edit targeted a node that no longer exists or cannot take the edit.
    #[error("edit target {target:?} is missing or cannot be edited")]
    MissingTarget {
        /// Path of the edit target.
        target: Vec<usize>,
    },
}

impl RuleError {
    /// Creates a [`RuleError::Malformed`] error.
    #[must_use]
    pub fn malformed(offset: usize, message: impl Into<String>) -> Self {
        Self::Malformed {
            offset,
            message: message.into(),
        }
    }
}

/// Internal defect detected after a mutation: node offsets no longer
/// increase monotonically.
///
/// Aborts the rest of the file's traversal; violations already emitted are
/// kept.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum TraversalError {
    /// Shifting offsets after an edit over- or underflowed.
    #[error("offset overflow while shifting nodes after byte {at}")]
    #[diagnostic(code(compose_lint::traversal::overflow))]
    OffsetOverflow {
        /// Offset the shift started from.
        at: usize,
    },

    /// Sibling or child ranges are out of order.
    #[error("node offsets out of order at byte {offset}: {detail}")]
    #[diagnostic(code(compose_lint::traversal::non_monotonic))]
    NonMonotonic {
        /// Offset where the inconsistency was found.
        offset: usize,
        /// Description of the inconsistency.
        detail: String,
    },

    /// A node path stopped resolving mid-traversal.
    #[error("no node at path {path:?}")]
    #[diagnostic(code(compose_lint::traversal::missing_node))]
    MissingNode {
        /// The unresolved path.
        path: Vec<usize>,
    },
}

/// Errors that stop a file from being linted.
#[derive(Debug, Error, Diagnostic)]
pub enum LintError {
    /// A rule's options could not be resolved.
    #[error("invalid configuration for rule {rule}")]
    Config {
        /// Rule whose options failed to resolve.
        rule: String,
        /// Underlying error.
        #[source]
        #[diagnostic_source]
        source: ConfigError,
    },

    /// The dedicated thread pool could not be created.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_value_names_key_and_value() {
        let error = ConfigError::InvalidValue {
            key: "checkModifiersForVisibility".into(),
            value: "everything".into(),
            expected: "one of public, public_and_internal, all".into(),
        };
        let message = error.to_string();
        assert!(message.contains("checkModifiersForVisibility"));
        assert!(message.contains("everything"));
        assert!(message.contains("public_and_internal"));
    }

    #[test]
    fn lint_error_exposes_config_source() {
        let error = LintError::Config {
            rule: "compose:modifier-missing-check".into(),
            source: ConfigError::MissingOption { key: "x".into() },
        };
        assert!(error.to_string().contains("compose:modifier-missing-check"));
        let source = std::error::Error::source(&error).map(ToString::to_string);
        assert_eq!(
            source.as_deref(),
            Some("option `x` was not declared by the rule")
        );
    }
}
